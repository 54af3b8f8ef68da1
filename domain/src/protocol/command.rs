//! Typed commands.
//!
//! A [`Command`] ties an outbound event and its payload to the inbound events
//! that settle it and to the shape of the successful response.

use crate::auth::entities::{AuthToken, AuthUser, LoginPayload, SignupPayload};
use crate::core::reply_text::ReplyText;
use crate::inbox::entities::{Conversation, ConversationId, Message, ReplyAck};
use crate::protocol::events;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A request/response operation over the shared connection.
///
/// The implementing type is the payload. Unit structs serialize to `null`,
/// which the transport sends as an event without arguments.
pub trait Command: Serialize {
    /// Decoded payload of the success event
    type Response: DeserializeOwned;

    /// Outbound event name
    const NAME: &'static str;

    /// Inbound event that fulfils the request
    const SUCCESS_EVENT: &'static str;

    /// Inbound event that rejects the request
    const ERROR_EVENT: &'static str = events::ERROR;
}

/// List every conversation visible to the current user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetConversations;

impl Command for GetConversations {
    type Response = Vec<Conversation>;
    const NAME: &'static str = events::GET_CONVERSATIONS;
    const SUCCESS_EVENT: &'static str = events::CONVERSATIONS;
}

/// List the messages of one conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetMessages {
    pub conversation_id: ConversationId,
}

impl Command for GetMessages {
    type Response = Vec<Message>;
    const NAME: &'static str = events::GET_MESSAGES;
    const SUCCESS_EVENT: &'static str = events::MESSAGES;
}

/// Post a reply into a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendReply {
    pub conversation_id: ConversationId,
    pub text: ReplyText,
}

impl Command for SendReply {
    type Response = ReplyAck;
    const NAME: &'static str = events::SEND_REPLY;
    const SUCCESS_EVENT: &'static str = events::REPLY_SENT;
}

impl Command for LoginPayload {
    type Response = AuthToken;
    const NAME: &'static str = events::LOGIN;
    const SUCCESS_EVENT: &'static str = events::LOGIN_SUCCESS;
    const ERROR_EVENT: &'static str = events::AUTH_ERROR;
}

impl Command for SignupPayload {
    type Response = AuthToken;
    const NAME: &'static str = events::SIGNUP;
    const SUCCESS_EVENT: &'static str = events::SIGNUP_SUCCESS;
    const ERROR_EVENT: &'static str = events::AUTH_ERROR;
}

/// Resolve the user that owns a token (identity check).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetCurrentUser {
    pub token: String,
}

impl Command for GetCurrentUser {
    type Response = AuthUser;
    const NAME: &'static str = events::GET_CURRENT_USER;
    const SUCCESS_EVENT: &'static str = events::CURRENT_USER;
    const ERROR_EVENT: &'static str = events::AUTH_ERROR;
}
