//! Console output formatter for inbox data

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use inbox_domain::core::string::{single_line, truncate};
use inbox_domain::{AuthUser, Conversation, ConversationId, Message, ReplyAck};

/// Longest preview shown in a conversation listing
const PREVIEW_LEN: usize = 60;

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn timestamp(value: Option<&str>) -> String {
        value.map(|t| format!(" {}", t.dimmed())).unwrap_or_default()
    }

    fn message_line(message: &Message) -> String {
        let sender = message.sender.as_deref().unwrap_or("unknown");
        format!(
            "{}{}\n{}",
            sender.yellow().bold(),
            Self::timestamp(message.created_at.as_deref()),
            Self::indent(&message.text, "  ")
        )
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn conversations(&self, conversations: &[Conversation]) -> String {
        if conversations.is_empty() {
            return "No conversations.".dimmed().to_string();
        }

        let mut output = Self::header("Conversations");
        output.push('\n');
        for conversation in conversations {
            output.push_str(&format!(
                "{} {}{}\n",
                format!("#{:<6}", conversation.id).cyan(),
                conversation.label().bold(),
                Self::timestamp(conversation.updated_at.as_deref())
            ));
            if let Some(last) = &conversation.last_message {
                output.push_str(&format!(
                    "        {}\n",
                    truncate(&single_line(last), PREVIEW_LEN)
                ));
            }
        }
        output
    }

    fn messages(&self, conversation_id: ConversationId, messages: &[Message]) -> String {
        let mut output = Self::header(&format!("Conversation #{}", conversation_id));
        output.push('\n');
        if messages.is_empty() {
            output.push_str(&format!("{}\n", "No messages.".dimmed()));
        }
        for message in messages {
            output.push_str(&Self::message_line(message));
            output.push_str("\n\n");
        }
        output
    }

    fn reply_ack(&self, conversation_id: ConversationId, ack: &ReplyAck) -> String {
        if ack.success {
            format!("{} Reply sent to #{}", "v".green(), conversation_id)
        } else {
            format!(
                "{} Server did not accept the reply to #{}",
                "x".red(),
                conversation_id
            )
        }
    }

    fn user(&self, user: Option<&AuthUser>) -> String {
        match user {
            Some(user) if user.name.is_some() => format!(
                "{} {} <{}>",
                "Logged in as".green(),
                user.display_name().bold(),
                user.email
            ),
            Some(user) => format!("{} {}", "Logged in as".green(), user.email.bold()),
            None => "Not logged in.".yellow().to_string(),
        }
    }

    fn new_message(&self, message: &Message) -> String {
        let target = message
            .conversation_id
            .map(|id| format!("#{} ", id))
            .unwrap_or_default();
        format!(
            "{} {}{}",
            "[message]".green().bold(),
            target.cyan(),
            Self::message_line(message)
        )
    }

    fn new_conversation(&self, conversation: &Conversation) -> String {
        format!(
            "{} {} {}",
            "[conversation]".magenta().bold(),
            format!("#{}", conversation.id).cyan(),
            conversation.label().bold()
        )
    }

    fn notice(&self, text: &str) -> String {
        format!("{} {}", "->".cyan(), text)
    }
}
