//! Logging infrastructure: structured traffic logging.
//!
//! Provides [`JsonlTrafficLogger`], a JSONL file writer that implements
//! the [`TrafficLogger`](inbox_application::TrafficLogger) port.

mod jsonl_traffic;

pub use jsonl_traffic::JsonlTrafficLogger;
