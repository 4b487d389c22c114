//! # Chatline Chat Widget
//!
//! File: cli/src/widget/mod.rs
//!
//! ## Overview
//!
//! The chat widget reads text from an input field, shows the conversation on
//! a transcript surface and forwards each message to a remote chat service.
//!
//! ## Architecture
//!
//! - `message`: `Message`, `Sender`, the append-only `Transcript` and the JSON
//!   bodies exchanged with the service
//! - `surface`: the injected UI handles (`TranscriptSurface`, `InputField`)
//!   and the `UiEvent`s that trigger a send
//! - `client`: the HTTP exchange with the chat service
//! - `controller`: `ChatWidget`, which ties the pieces together
//! - `terminal`: the stdout-backed transcript surface used by the CLI
//!
//! ## Usage
//!
//! ```rust
//! let client = ChatClient::new("http://127.0.0.1:5001/chat")?;
//! let widget = ChatWidget::new(TerminalSurface::stdout(display), LineInput::default(), client);
//! widget.input_mut().set_value("Hello");
//! if let Some(pending) = widget.handle_event(UiEvent::KeyPress(Key::ENTER)) {
//!     pending.await;
//! }
//! ```
//!
pub mod client;
pub mod controller;
pub mod message;
pub mod surface;
pub mod terminal;

pub use client::ChatClient;
pub use controller::{ChatWidget, SendOutcome};
pub use message::Sender;
pub use surface::{InputField, Key, LineInput, TranscriptSurface, UiEvent};
pub use terminal::TerminalSurface;
