//! # Chatline One-Shot Send
//!
//! File: cli/src/commands/send.rs
//!
//! ## Overview
//!
//! Implements `chatline send <text>...`: the words are joined into one
//! message, typed into the widget's input and sent with one send cycle.
//! The user message and the bot's answer are printed to stdout.
//!
//! Failed exchanges show up as bot messages in the transcript, so the command
//! exits successfully whatever the chat service does. Blank text prints
//! nothing and sends nothing.
//!
//! ## Examples
//!
//! ```bash
//! chatline send What procedures do you offer?
//! chatline send --endpoint http://localhost:8080/chat "Hello there"
//! ```
//!
use super::ConnectionArgs;
use crate::core::error::Result;
use crate::widget::{ChatClient, ChatWidget, InputField, LineInput, SendOutcome, TerminalSurface};
use clap::Parser;
use std::path::Path;
use tracing::{debug, info};

#[derive(Parser, Debug, Clone)]
pub struct SendArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Message text. Multiple words are joined with single spaces.
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

/// # Handle Send Command (`handle_send`)
///
/// Resolves the connection settings, types the joined words into a fresh
/// widget and runs one send cycle, printing the exchange to stdout.
///
/// ## Arguments
///
/// * `args` - Parsed `send` arguments.
/// * `config_path` - The global `--config` file, if one was given.
///
/// ## Errors
///
/// Only configuration problems are returned. A failed exchange is reported
/// in the transcript and still returns `Ok(())`.
pub async fn handle_send(args: SendArgs, config_path: Option<&Path>) -> Result<()> {
    let cfg = args.connection.resolve(config_path)?;
    let client = ChatClient::new(&cfg.endpoint)?;
    info!("Sending one message to {}", client.endpoint());

    let widget = ChatWidget::new(
        TerminalSurface::stdout(cfg.display),
        LineInput::default(),
        client,
    );
    widget.input_mut().set_value(&args.text.join(" "));

    match widget.send_message().await {
        SendOutcome::Skipped => debug!("Nothing to send: message is blank."),
        outcome => debug!("Exchange finished: {:?}", outcome),
    }
    Ok(())
}
