//! Application-level configuration.
//!
//! - [`BridgeConfig`]: how the request bridge settles outstanding requests

pub mod bridge_config;

pub use bridge_config::BridgeConfig;
