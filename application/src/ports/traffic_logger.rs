//! Port for structured traffic logging.
//!
//! Defines the [`TrafficLogger`] trait for recording every event that crosses
//! the shared connection to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the full
//! event transcript in a machine-readable format (JSONL).

use serde_json::Value;

/// Which way an event travelled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Client → peer
    Outbound,
    /// Peer → client
    Inbound,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Outbound => "out",
            Direction::Inbound => "in",
        }
    }
}

/// One event seen on the connection.
pub struct TrafficEvent<'a> {
    pub direction: Direction,
    /// Event name
    pub event: &'a str,
    pub payload: &'a Value,
}

impl<'a> TrafficEvent<'a> {
    pub fn outbound(event: &'a str, payload: &'a Value) -> Self {
        Self {
            direction: Direction::Outbound,
            event,
            payload,
        }
    }

    pub fn inbound(event: &'a str, payload: &'a Value) -> Self {
        Self {
            direction: Direction::Inbound,
            event,
            payload,
        }
    }
}

/// Port for logging connection traffic.
///
/// The `log` method is synchronous and non-fallible so that logging never
/// disturbs delivery; implementations swallow their own failures.
pub trait TrafficLogger: Send + Sync {
    /// Record one event.
    fn log(&self, event: TrafficEvent<'_>);
}

/// No-op implementation for tests and when traffic logging is disabled.
pub struct NoTrafficLogger;

impl TrafficLogger for NoTrafficLogger {
    fn log(&self, _event: TrafficEvent<'_>) {}
}
