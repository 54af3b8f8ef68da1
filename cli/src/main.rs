//! CLI entrypoint for inbox-link
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use inbox_application::{
    BridgeAuthGateway, BridgeError, InboxApi, MemoryTokenStore, NoTrafficLogger, PendingReply,
    RequestBridge, SessionManager, TokenStore, TrafficLogger, subscribe,
};
use inbox_domain::{LoginPayload, ReplyText, SignupPayload, events};
use inbox_infrastructure::{
    ConfigLoader, FileConfig, FileTokenStore, JsonlTrafficLogger, shared_provider,
};
use inbox_presentation::{Cli, Command, OutputFormatter, formatter_for, with_spinner};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting inbox-link");

    let config = load_config(&cli)?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        println!();
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let Some(command) = cli.command.clone() else {
        bail!("A command is required. Run with --help to see them.");
    };

    // === Dependency Injection ===
    let tokens = token_store(&cli, &config);
    let traffic = traffic_logger(&config);

    let provider = shared_provider(config.server.to_socket_config(), Arc::clone(&tokens), traffic);
    let bridge = Arc::new(RequestBridge::new(provider, config.bridge.to_bridge_config()));
    let api = InboxApi::new(Arc::clone(&bridge));
    let session = SessionManager::new(
        Arc::new(BridgeAuthGateway::new(Arc::clone(&bridge))),
        tokens,
        config.server.auth_base_url(),
    );

    let formatter = formatter_for(cli.output_format());
    let progress = cli.show_progress();
    let timeout = bridge.config().request_timeout;

    match command {
        Command::Conversations => {
            let conversations = with_spinner(
                "Fetching conversations",
                progress,
                settle(api.list_conversations(), timeout),
            )
            .await?;
            println!("{}", formatter.conversations(&conversations));
        }
        Command::Messages { id } => {
            let messages = with_spinner(
                "Fetching messages",
                progress,
                settle(api.list_messages(id), timeout),
            )
            .await?;
            println!("{}", formatter.messages(id, &messages));
        }
        Command::Reply { id, text } => {
            let text = ReplyText::new(text)?;
            let ack = with_spinner(
                "Sending reply",
                progress,
                settle(api.send_reply(id, text), timeout),
            )
            .await?;
            println!("{}", formatter.reply_ack(id, &ack));
            if !ack.success {
                bail!("reply to conversation {} was not accepted", id);
            }
        }
        Command::Watch => watch(&api, formatter).await?,
        Command::Login { email, password } => {
            let user = with_spinner(
                "Logging in",
                progress,
                session.login(&LoginPayload { email, password }),
            )
            .await?;
            println!("{}", formatter.user(Some(&user)));
        }
        Command::Signup {
            email,
            password,
            name,
        } => {
            let payload = SignupPayload {
                email,
                password,
                name,
            };
            let user = with_spinner("Creating account", progress, session.signup(&payload)).await?;
            println!("{}", formatter.user(Some(&user)));
        }
        Command::Logout => {
            session.logout()?;
            println!("{}", formatter.notice("Logged out."));
        }
        Command::Whoami => {
            with_spinner("Checking session", progress, session.initialize()).await;
            let state = session.state();
            println!("{}", formatter.user(state.user.as_ref()));
        }
        Command::OauthUrl { provider } => {
            println!("{}", session.oauth_start_url(provider));
        }
    }

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("--log-file must name a file: {}", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}

/// Load configuration files, then apply command-line overrides
fn load_config(cli: &Cli) -> Result<FileConfig> {
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow!("invalid configuration: {}", e))?
    };

    if let Some(url) = &cli.url {
        config.server.url = url.clone();
    }
    if let Some(path) = &cli.traffic_log {
        config.logging.traffic_log = Some(path.display().to_string());
    }

    config.validate()?;
    debug!("Effective server URL: {}", config.server.url);
    Ok(config)
}

fn token_store(cli: &Cli, config: &FileConfig) -> Arc<dyn TokenStore> {
    if cli.ephemeral {
        return Arc::new(MemoryTokenStore::new());
    }
    match config.session.token_path() {
        Some(path) => Arc::new(FileTokenStore::new(path)),
        None => {
            warn!("No data directory available; the token will not persist");
            Arc::new(MemoryTokenStore::new())
        }
    }
}

fn traffic_logger(config: &FileConfig) -> Arc<dyn TrafficLogger> {
    match config
        .logging
        .traffic_log
        .as_deref()
        .and_then(|path| JsonlTrafficLogger::new(path))
    {
        Some(logger) => {
            info!("Traffic log: {}", logger.path().display());
            Arc::new(logger)
        }
        None => Arc::new(NoTrafficLogger),
    }
}

/// Await a reply under the configured request deadline
async fn settle<R: DeserializeOwned>(
    reply: PendingReply<R>,
    timeout: Option<Duration>,
) -> Result<R, BridgeError> {
    match timeout {
        Some(timeout) => reply.timeout(timeout).await,
        None => reply.await,
    }
}

/// Print push events until Ctrl-C
async fn watch(api: &InboxApi, formatter: Arc<dyn OutputFormatter>) -> Result<()> {
    let on_message = Arc::clone(&formatter);
    let messages = api.subscribe_new_message(move |message| {
        println!("{}", on_message.new_message(&message));
    });

    let on_conversation = Arc::clone(&formatter);
    let conversations = api.subscribe_new_conversation(move |conversation| {
        println!("{}", on_conversation.new_conversation(&conversation));
    });

    let connection = api.bridge().connection();
    let on_disconnect = Arc::clone(&formatter);
    let disconnects = subscribe(&connection, events::DISCONNECT, move |reason| {
        let reason = reason.as_str().unwrap_or("unknown reason");
        eprintln!("{}", on_disconnect.notice(&format!("Disconnected: {}", reason)));
    });

    let on_error = Arc::clone(&formatter);
    let connect_errors = subscribe(&connection, events::CONNECT_ERROR, move |reason| {
        let reason = reason.as_str().unwrap_or("unknown reason");
        eprintln!("{}", on_error.notice(&format!("Connection failed: {}", reason)));
    });

    eprintln!("{}", formatter.notice("Watching for new messages (Ctrl-C to stop)"));
    tokio::signal::ctrl_c()
        .await
        .context("waiting for Ctrl-C")?;

    for subscription in [messages, conversations, disconnects, connect_errors] {
        subscription.dispose();
    }
    Ok(())
}
