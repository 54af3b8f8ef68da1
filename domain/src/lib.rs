//! Domain layer for inbox-link
//!
//! This crate contains the wire contracts, records and value objects shared
//! by every other layer. It has no I/O and no async runtime.
//!
//! # Core Concepts
//!
//! ## Commands
//!
//! Every request/response operation is a [`Command`]: the payload type names
//! the outbound event, the events that settle it, and the decoded response.
//!
//! ## Events
//!
//! [`events`] lists the names used on the wire, including the reserved
//! lifecycle names (`connect`, `disconnect`, `connect_error`) that the
//! transport raises locally.

pub mod auth;
pub mod core;
pub mod inbox;
pub mod protocol;
pub mod session;

// Re-export commonly used types
pub use auth::entities::{AuthToken, AuthUser, LoginPayload, OAuthProvider, SignupPayload};
pub use core::{error::DomainError, reply_text::ReplyText};
pub use inbox::entities::{Conversation, ConversationId, Message, ReplyAck};
pub use protocol::command::{Command, GetConversations, GetCurrentUser, GetMessages, SendReply};
pub use protocol::events;
pub use session::state::SessionState;
