//! Shared connection plumbing.
//!
//! - [`provider::ConnectionProvider`]: lazily creates and owns the one connection
//! - [`listener_table::ListenerTable`]: per-event handler registry used by adapters

pub mod listener_table;
pub mod provider;

pub use listener_table::ListenerTable;
pub use provider::ConnectionProvider;
