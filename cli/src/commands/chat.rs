//! # Chatline Interactive Session
//!
//! File: cli/src/commands/chat.rs
//!
//! ## Overview
//!
//! Implements `chatline chat`, the default command. Each line read from stdin
//! is typed into the widget's input field and followed by an Enter key press.
//! Replies are printed as they arrive; typing continues while earlier
//! messages are still waiting for an answer.
//!
//! The session ends on `/quit` or end of input, once every outstanding send
//! has settled.
//!
//! ## Examples
//!
//! ```bash
//! # Talk to the default endpoint (http://127.0.0.1:5001/chat)
//! chatline
//!
//! # Talk to another service, with a greeting and no timestamps
//! chatline chat --endpoint https://bot.example.com/chat --no-timestamps \
//!     --greeting "Hello! How can I help you today?"
//! ```
//!
use super::ConnectionArgs;
use crate::core::error::Result;
use crate::widget::{
    ChatClient, ChatWidget, InputField, Key, LineInput, Sender, TerminalSurface,
    TranscriptSurface, UiEvent,
};
use anyhow::Context;
use clap::Parser;
use futures_util::stream::{FuturesUnordered, StreamExt};
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info};

/// Line that ends the session instead of being sent.
const QUIT_COMMAND: &str = "/quit";

#[derive(Parser, Debug, Clone, Default)]
pub struct ChatArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Bot message shown before the first prompt.
    #[arg(long)]
    pub greeting: Option<String>,
}

/// # Handle Chat Command (`handle_chat`)
///
/// Prints a connection banner and runs an interactive session on stdin and
/// stdout until `/quit` or end of input.
///
/// ## Errors
///
/// Returns configuration problems, or a failure to read stdin.
pub async fn handle_chat(args: ChatArgs, config_path: Option<&Path>) -> Result<()> {
    let cfg = args.connection.resolve(config_path)?;
    let client = ChatClient::new(&cfg.endpoint)?;
    info!("Starting chat session against {}", client.endpoint());

    println!(
        "Connected to {}. Type a message and press Enter ({} to exit).",
        client.endpoint(),
        QUIT_COMMAND
    );
    let widget = ChatWidget::new(
        TerminalSurface::stdout(cfg.display),
        LineInput::default(),
        client,
    );

    let sent = run_session(
        &widget,
        BufReader::new(tokio::io::stdin()),
        args.greeting.as_deref(),
    )
    .await?;
    info!("Chat session finished after {} message(s).", sent);
    Ok(())
}

/// Drives `widget` from `reader` until `/quit` or EOF and all sends have
/// settled. Returns the number of sends that were issued.
pub async fn run_session<S, I, R>(
    widget: &ChatWidget<S, I>,
    reader: R,
    greeting: Option<&str>,
) -> Result<usize>
where
    S: TranscriptSurface,
    I: InputField,
    R: AsyncBufRead + Unpin,
{
    if let Some(greeting) = greeting {
        widget.append_message(greeting, Sender::Bot);
    }

    let mut lines = reader.lines();
    let mut in_flight = FuturesUnordered::new();
    let mut reading = true;
    let mut settled = 0;

    loop {
        tokio::select! {
            line = lines.next_line(), if reading => {
                match line.context("Failed to read input")? {
                    Some(line) if line.trim() == QUIT_COMMAND => reading = false,
                    Some(line) => {
                        widget.input_mut().set_value(&line);
                        if let Some(pending) = widget.handle_event(UiEvent::KeyPress(Key::ENTER)) {
                            in_flight.push(pending);
                        }
                    }
                    None => reading = false,
                }
            }
            Some(outcome) = in_flight.next(), if !in_flight.is_empty() => {
                settled += 1;
                debug!("Send {} settled: {:?} ({} still in flight)", settled, outcome, in_flight.len());
            }
            else => break,
        }
    }

    Ok(settled)
}
