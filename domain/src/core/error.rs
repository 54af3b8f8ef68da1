//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("Reply text cannot be empty")]
    EmptyReply,

    #[error("Invalid conversation id: {0}")]
    InvalidConversationId(String),

    #[error("Unknown OAuth provider: {0}")]
    UnknownOAuthProvider(String),

    #[error("Reserved event name cannot be emitted: {0}")]
    ReservedEvent(String),
}
