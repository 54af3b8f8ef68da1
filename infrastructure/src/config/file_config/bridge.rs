//! Bridge configuration from TOML (`[bridge]` section)

use inbox_application::BridgeConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw request bridge configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBridgeConfig {
    /// Reject outstanding requests when the connection is lost
    pub reject_on_disconnect: bool,
    /// Per-request deadline in seconds (absent = wait forever)
    pub request_timeout_seconds: Option<u64>,
}

impl Default for FileBridgeConfig {
    fn default() -> Self {
        Self {
            reject_on_disconnect: true,
            request_timeout_seconds: Some(30),
        }
    }
}

impl FileBridgeConfig {
    pub fn to_bridge_config(&self) -> BridgeConfig {
        BridgeConfig::default()
            .with_reject_on_disconnect(self.reject_on_disconnect)
            .with_request_timeout(self.request_timeout_seconds.map(Duration::from_secs))
    }
}
