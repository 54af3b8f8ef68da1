//! Bridge parameters: request settlement control.
//!
//! [`BridgeConfig`] groups the knobs that decide when an outstanding request
//! gives up: on transport loss, and after an optional deadline. These are
//! application-layer concerns, not wire protocol.

use std::time::Duration;

/// Request settlement parameters.
///
/// Used by [`RequestBridge`](crate::use_cases::request_bridge::RequestBridge).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Reject every outstanding request when the transport disconnects or
    /// fails to connect. When off, such requests stay pending.
    pub reject_on_disconnect: bool,
    /// Deadline applied by [`RequestBridge::call`](crate::use_cases::request_bridge::RequestBridge::call).
    pub request_timeout: Option<Duration>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            reject_on_disconnect: true,
            request_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl BridgeConfig {
    // ==================== Builder Methods ====================

    pub fn with_reject_on_disconnect(mut self, reject: bool) -> Self {
        self.reject_on_disconnect = reject;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();
        assert!(config.reject_on_disconnect);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_builders() {
        let config = BridgeConfig::default()
            .with_reject_on_disconnect(false)
            .with_request_timeout(None);
        assert!(!config.reject_on_disconnect);
        assert!(config.request_timeout.is_none());
    }
}
