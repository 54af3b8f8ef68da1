//! Presentation layer for inbox-link
//!
//! This crate contains CLI definitions, output formatters
//! and the request spinner.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use output::formatter::OutputFormatter;
pub use output::json::JsonFormatter;
pub use progress::spinner::{RequestSpinner, with_spinner};

use std::sync::Arc;

/// Formatter for the requested output format
pub fn formatter_for(format: OutputFormat) -> Arc<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Arc::new(ConsoleFormatter),
        OutputFormat::Json => Arc::new(JsonFormatter),
    }
}
