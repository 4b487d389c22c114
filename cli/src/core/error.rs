//! # Chatline Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout Chatline. Two layers
//! are involved:
//! - `ChatError`: a `thiserror` enum naming the domain failures (bad
//!   configuration, a chat service that answered with a failure status, a
//!   request that never completed, a listener that could not bind).
//! - `Result<T>`: an alias for `anyhow::Result<T>` used by command handlers so
//!   context can be attached with `.context(...)`.
//!
//! Exchange failures (`HttpStatus`, `Transport`, `MalformedReply`) never reach `main`: the chat
//! widget turns them into transcript messages. Only configuration and start-up
//! errors propagate to the top level.
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! if endpoint.is_empty() {
//!     return Err(ChatError::Config("endpoint must not be empty".into()))?;
//! }
//!
//! // Check what kind of exchange failure occurred
//! match err {
//!     ChatError::HttpStatus { status, .. } => println!("status {}", status),
//!     ChatError::Transport(e) => println!("no connection: {}", e),
//!     _ => {}
//! }
//! ```
//!
use thiserror::Error;

/// Custom error type for the Chatline application.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid chat endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// The chat service answered, but with a non-success status.
    #[error("Chat service responded with status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The request could not be completed: connect/DNS failure, body read
    /// failure or an undecodable reply.
    #[error("Chat service request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A success body that decoded as JSON but cannot be read as a reply.
    #[error("Chat service sent an unreadable reply: {0}")]
    MalformedReply(String),

    #[error("Could not bind chat service to {addr}: {reason}")]
    BindFailed { addr: String, reason: String },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
