//! # Chatdesk Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! Entry point of the `chatdesk` binary. It:
//! - parses the command line with clap (global connection flags + a command)
//! - sets up logging from the `-v` count or `RUST_LOG`
//! - builds the `AppContext` (config, session, navigator, API client)
//! - routes to the command handler and reports any error
//!
//! ## Examples
//!
//! ```bash
//! chatdesk login -u alice
//! chatdesk -v chat send --conversation 3 "hello"
//! chatdesk --base-url http://chat.internal:8000 admin overview
//! ```
//!
//! Command processing flow:
//! 1. Parse command-line args via clap
//! 2. Configure logging based on verbosity level
//! 3. Load configuration and build the context
//! 4. Route to the command handler
//! 5. Print any error and exit with status 1
//!
use chatdesk::commands;
use chatdesk::core::config::Overrides;
use chatdesk::core::context::AppContext;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "chatdesk",
    about = "Chatdesk: terminal client for the chatbot system",
    long_about = "Log in, chat with the bot and administer users and conversations\n\
                  through the chatbot backend's REST API.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Backend base URL.
    #[arg(long, env = "CHATDESK_BASE_URL", global = true, value_name = "URL")]
    base_url: Option<String>,

    /// Where the login session is stored.
    #[arg(long, env = "CHATDESK_SESSION_FILE", global = true, value_name = "PATH")]
    session_file: Option<PathBuf>,

    /// Request timeout in seconds.
    #[arg(long = "timeout", env = "CHATDESK_TIMEOUT", global = true, value_name = "SECS")]
    timeout_secs: Option<u64>,
}

#[derive(Parser, Debug)]
enum Commands {
    Login(commands::login::LoginArgs),
    Logout(commands::logout::LogoutArgs),
    Whoami(commands::whoami::WhoamiArgs),
    /// Conversations and messaging.
    #[command(alias = "c")]
    Chat(commands::chat::ChatArgs),
    /// Administration (admin accounts only).
    #[command(alias = "a")]
    Admin(commands::admin::AdminArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let overrides = Overrides {
        base_url: cli.base_url,
        session_file: cli.session_file,
        timeout_secs: cli.timeout_secs,
    };
    let command_result = match AppContext::load(&overrides) {
        Ok(ctx) => match cli.command {
            Commands::Login(args) => commands::login::handle_login(args, &ctx).await,
            Commands::Logout(args) => commands::logout::handle_logout(args, &ctx).await,
            Commands::Whoami(args) => commands::whoami::handle_whoami(args, &ctx).await,
            Commands::Chat(args) => commands::chat::handle_chat(args, &ctx).await,
            Commands::Admin(args) => commands::admin::handle_admin(args, &ctx).await,
        },
        Err(e) => Err(e),
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
