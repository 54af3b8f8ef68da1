//! Wire contracts spoken over the shared connection.
//!
//! - [`events`]: every event name the client emits or listens to
//! - [`command::Command`]: typed request/response pairing for one operation

pub mod command;
pub mod events;
