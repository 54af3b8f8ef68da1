//! Reply text value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Text of a reply posted to a conversation (Value Object)
///
/// Guaranteed to contain at least one non-whitespace character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReplyText {
    content: String,
}

impl ReplyText {
    /// Create a new reply text, rejecting empty or whitespace-only input
    pub fn new(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            Err(DomainError::EmptyReply)
        } else {
            Ok(Self { content })
        }
    }

    /// Get the reply content
    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// Consume and return the inner content
    pub fn into_content(self) -> String {
        self.content
    }
}

impl std::fmt::Display for ReplyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl TryFrom<String> for ReplyText {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        ReplyText::new(s)
    }
}

impl From<ReplyText> for String {
    fn from(text: ReplyText) -> Self {
        text.content
    }
}
