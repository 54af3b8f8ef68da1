//! Output formatter trait

use inbox_domain::{AuthUser, Conversation, ConversationId, Message, ReplyAck};

/// Trait for formatting command results
///
/// Implementations are shared with subscription handlers, hence `Send + Sync`.
pub trait OutputFormatter: Send + Sync {
    fn conversations(&self, conversations: &[Conversation]) -> String;

    fn messages(&self, conversation_id: ConversationId, messages: &[Message]) -> String;

    fn reply_ack(&self, conversation_id: ConversationId, ack: &ReplyAck) -> String;

    /// The current user, or the anonymous state when `None`
    fn user(&self, user: Option<&AuthUser>) -> String;

    /// A `newMessage` push event
    fn new_message(&self, message: &Message) -> String;

    /// A `newConversation` push event
    fn new_conversation(&self, conversation: &Conversation) -> String;

    /// A one-line status notice (logout, connection loss)
    fn notice(&self, text: &str) -> String;
}
