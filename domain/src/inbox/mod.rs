//! Support inbox records exchanged with the peer.

pub mod entities;
