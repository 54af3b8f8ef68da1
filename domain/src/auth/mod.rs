//! Identity records and credentials.

pub mod entities;
