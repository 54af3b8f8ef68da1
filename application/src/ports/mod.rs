//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod auth_gateway;
pub mod connection;
pub mod token_store;
pub mod traffic_logger;
