//! Inbox entities
//!
//! The peer owns these shapes; only the fields the client reads are typed.
//! Everything else is kept in `extra` so nothing is lost on the way through.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Conversation identifier assigned by the peer
pub type ConversationId = i64;

/// A conversation in the inbox (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: ConversationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Conversation {
    /// Human-readable label: title, then participant, then the id
    pub fn label(&self) -> String {
        self.title
            .clone()
            .or_else(|| self.participant.clone())
            .unwrap_or_else(|| format!("Conversation #{}", self.id))
    }
}

/// A single message inside a conversation (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<ConversationId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Acknowledgement for a posted reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyAck {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_conversation_keeps_unknown_fields() {
        let conversation: Conversation = serde_json::from_value(json!({
            "id": 12,
            "title": "Billing question",
            "lastMessage": "Any update?",
            "channel": "slack"
        }))
        .unwrap();

        assert_eq!(conversation.id, 12);
        assert_eq!(conversation.last_message.as_deref(), Some("Any update?"));
        assert_eq!(conversation.extra.get("channel"), Some(&json!("slack")));
    }

    #[test]
    fn test_conversation_label_fallbacks() {
        let bare: Conversation = serde_json::from_value(json!({ "id": 4 })).unwrap();
        assert_eq!(bare.label(), "Conversation #4");

        let named: Conversation =
            serde_json::from_value(json!({ "id": 4, "participant": "Ana" })).unwrap();
        assert_eq!(named.label(), "Ana");
    }

    #[test]
    fn test_message_defaults_missing_text() {
        let message: Message =
            serde_json::from_value(json!({ "id": 1, "conversationId": 9 })).unwrap();
        assert_eq!(message.text, "");
        assert_eq!(message.conversation_id, Some(9));
    }

    #[test]
    fn test_reply_ack() {
        let ack: ReplyAck = serde_json::from_value(json!({ "success": true })).unwrap();
        assert!(ack.success);
    }
}
