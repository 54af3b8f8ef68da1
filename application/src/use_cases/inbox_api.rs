//! Typed inbox operations.
//!
//! Thin layer over [`RequestBridge`] and the subscription helpers that pins
//! each operation to its command, reply events and record types.

use crate::use_cases::request_bridge::{PendingReply, RequestBridge};
use crate::use_cases::subscriptions::{Subscription, subscribe_typed};
use inbox_domain::{
    Conversation, ConversationId, GetConversations, GetMessages, Message, ReplyAck, ReplyText,
    SendReply, events,
};
use std::sync::Arc;

/// Inbox operations on the shared connection
#[derive(Clone)]
pub struct InboxApi {
    bridge: Arc<RequestBridge>,
}

impl InboxApi {
    pub fn new(bridge: Arc<RequestBridge>) -> Self {
        Self { bridge }
    }

    pub fn bridge(&self) -> &Arc<RequestBridge> {
        &self.bridge
    }

    /// `getConversations` → `conversations`
    pub fn list_conversations(&self) -> PendingReply<Vec<Conversation>> {
        self.bridge.request(&GetConversations)
    }

    /// `getMessages { conversationId }` → `messages`
    pub fn list_messages(&self, conversation_id: ConversationId) -> PendingReply<Vec<Message>> {
        self.bridge.request(&GetMessages { conversation_id })
    }

    /// `sendReply { conversationId, text }` → `replySent`
    pub fn send_reply(&self, conversation_id: ConversationId, text: ReplyText) -> PendingReply<ReplyAck> {
        self.bridge.request(&SendReply {
            conversation_id,
            text,
        })
    }

    /// Call `handler` for every `newMessage` push
    pub fn subscribe_new_message<F>(&self, handler: F) -> Subscription
    where
        F: Fn(Message) + Send + Sync + 'static,
    {
        subscribe_typed(&self.bridge.connection(), events::NEW_MESSAGE, handler)
    }

    /// Call `handler` for every `newConversation` push
    pub fn subscribe_new_conversation<F>(&self, handler: F) -> Subscription
    where
        F: Fn(Conversation) + Send + Sync + 'static,
    {
        subscribe_typed(&self.bridge.connection(), events::NEW_CONVERSATION, handler)
    }
}
