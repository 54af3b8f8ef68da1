//! Core domain concepts shared across all subdomains.
//!
//! - [`reply_text::ReplyText`]: validated text of an outgoing reply
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod reply_text;
pub mod string;
