//! # Chatline Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for the Chatline CLI, a terminal
//! chat widget for HTTP chatbot services. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the appropriate command handler
//!
//! ## Architecture
//!
//! - `widget`: the chat widget (transcript, input, chat service client)
//! - `commands`: one module per subcommand (`chat`, `send`, `serve`)
//! - `core`: configuration and error types
//!
//! Logs go to stderr so they never interleave with the transcript on stdout.
//!
//! ## Examples
//!
//! ```bash
//! # Start an interactive session against the default endpoint
//! chatline
//!
//! # Send one message with debug logging
//! chatline -vv send "Hello"
//!
//! # Run the local development chat service
//! chatline serve --port 5001
//! ```
//!
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod core;
mod widget;

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "chatline",
    about = "💬 Chatline: a terminal chat widget for HTTP chatbot services",
    long_about = "Chat with a remote chatbot service from the terminal.\n\
                  Each message is POSTed as JSON to the configured endpoint and the reply is shown in the transcript.",
    propagate_version = true,
    version
)]
struct Cli {
    /// Defaults to `chat` when omitted.
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file to use instead of the user config file.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Enum defining all available top-level commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive chat session (default).
    #[command(alias = "c")]
    Chat(commands::chat::ChatArgs),
    /// Send a single message and print the exchange.
    #[command(alias = "s")]
    Send(commands::send::SendArgs),
    /// Run a local development chat service.
    Serve(commands::serve::ServeArgs),
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

    let config_path = cli.config.as_deref();
    let command = cli
        .command
        .unwrap_or_else(|| Commands::Chat(commands::chat::ChatArgs::parse_from(["chat"])));

    let command_result = match command {
        Commands::Chat(args) => commands::chat::handle_chat(args, config_path).await,
        Commands::Send(args) => commands::send::handle_send(args, config_path).await,
        Commands::Serve(args) => commands::serve::handle_serve(args, config_path).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
