//! Use cases
//!
//! Application-level operations built on the shared connection.

pub mod bridge_auth;
pub mod inbox_api;
pub mod request_bridge;
pub mod session_manager;
pub mod subscriptions;
