//! JSON output formatter
//!
//! Results are pretty-printed; push events are one compact object per line
//! so `watch` output can be piped into line-oriented tools.

use crate::output::formatter::OutputFormatter;
use inbox_domain::{AuthUser, Conversation, ConversationId, Message, ReplyAck, events};
use serde::Serialize;
use serde_json::json;

pub struct JsonFormatter;

impl JsonFormatter {
    fn pretty<T: Serialize + ?Sized>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    fn line<T: Serialize>(event: &str, data: &T) -> String {
        serde_json::to_string(&json!({ "event": event, "data": data }))
            .unwrap_or_else(|_| "{}".to_string())
    }
}

impl OutputFormatter for JsonFormatter {
    fn conversations(&self, conversations: &[Conversation]) -> String {
        Self::pretty(conversations)
    }

    fn messages(&self, _conversation_id: ConversationId, messages: &[Message]) -> String {
        Self::pretty(messages)
    }

    fn reply_ack(&self, conversation_id: ConversationId, ack: &ReplyAck) -> String {
        Self::pretty(&json!({ "conversationId": conversation_id, "success": ack.success }))
    }

    fn user(&self, user: Option<&AuthUser>) -> String {
        Self::pretty(&json!({ "authenticated": user.is_some(), "user": user }))
    }

    fn new_message(&self, message: &Message) -> String {
        Self::line(events::NEW_MESSAGE, message)
    }

    fn new_conversation(&self, conversation: &Conversation) -> String {
        Self::line(events::NEW_CONVERSATION, conversation)
    }

    fn notice(&self, text: &str) -> String {
        serde_json::to_string(&json!({ "notice": text })).unwrap_or_else(|_| "{}".to_string())
    }
}
