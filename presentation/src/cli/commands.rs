//! CLI command definitions

use clap::{Parser, Subcommand};
use inbox_domain::{ConversationId, OAuthProvider};
use std::path::PathBuf;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Colored, human-readable text
    Text,
    /// Pretty-printed JSON (one compact object per line for `watch`)
    Json,
}

/// CLI arguments for inbox-link
#[derive(Parser, Debug)]
#[command(name = "inbox-link")]
#[command(author, version, about = "Terminal client for a Socket.IO inbox server")]
#[command(long_about = r#"
inbox-link talks to an inbox server over a single shared Socket.IO connection.
Requests are matched to responses by event name; push events can be watched live.

Configuration files are loaded from (in priority order):
1. INBOX_WS_URL and INBOX_* environment variables
2. --config <path>     Explicit config file
3. ./inbox.toml        Project-level config
4. ~/.config/inbox-link/config.toml   Global config

Example:
  inbox-link login --email ana@example.com --password hunter2
  inbox-link conversations
  inbox-link reply 12 "On it, thanks!"
  inbox-link --json watch
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Server URL (overrides configuration)
    #[arg(long, global = true, value_name = "URL")]
    pub url: Option<String>,

    /// Write diagnostic logs to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Append every event on the connection to this JSONL file
    #[arg(long, global = true, value_name = "PATH")]
    pub traffic_log: Option<PathBuf>,

    /// Keep the auth token in memory only
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and the effective configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }

    /// Spinners only make sense for interactive text output
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.json
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List conversations
    Conversations,

    /// Show the messages of a conversation
    Messages {
        /// Conversation id
        id: ConversationId,
    },

    /// Post a reply to a conversation
    Reply {
        /// Conversation id
        id: ConversationId,
        /// Reply text
        text: String,
    },

    /// Print new messages and conversations as they arrive (Ctrl-C to stop)
    Watch,

    /// Log in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Create an account and log in
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: Option<String>,
    },

    /// Forget the stored token
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Print the URL that starts a browser-based login
    OauthUrl {
        /// Identity provider (google, slack)
        provider: OAuthProvider,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_reply_with_global_flags() {
        let cli = Cli::try_parse_from([
            "inbox-link",
            "reply",
            "12",
            "On it",
            "--json",
            "--url",
            "http://localhost:4000",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Some(Command::Reply {
                id: 12,
                text: "On it".into()
            })
        );
        assert_eq!(cli.output_format(), OutputFormat::Json);
        assert_eq!(cli.url.as_deref(), Some("http://localhost:4000"));
        assert!(!cli.show_progress());
    }

    #[test]
    fn test_parse_oauth_provider() {
        let cli = Cli::try_parse_from(["inbox-link", "oauth-url", "slack"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::OauthUrl {
                provider: OAuthProvider::Slack
            })
        );

        assert!(Cli::try_parse_from(["inbox-link", "oauth-url", "github"]).is_err());
    }

    #[test]
    fn test_verbosity_counts() {
        let cli = Cli::try_parse_from(["inbox-link", "-vv", "whoami"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output_format(), OutputFormat::Text);
        assert!(cli.show_progress());
    }

    #[test]
    fn test_show_config_needs_no_subcommand() {
        let cli = Cli::try_parse_from(["inbox-link", "--show-config"]).unwrap();
        assert!(cli.show_config);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_message_id_must_be_numeric() {
        assert!(Cli::try_parse_from(["inbox-link", "messages", "abc"]).is_err());
    }
}
