//! Session domain.
//!
//! - [`state::SessionState`]: who is logged in, with which token

pub mod state;
