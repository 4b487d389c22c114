//! # Chat Widget Controller
//!
//! File: cli/src/widget/controller.rs
//!
//! ## Overview
//!
//! `ChatWidget` mediates between the input field, the transcript surface and
//! the chat service. It owns the append-only `Transcript` and the injected UI
//! handles for the whole session.
//!
//! ## Send cycle
//!
//! 1. Read the input and trim it. Empty text ends the cycle with no effect.
//! 2. Append the text as a `user` message and clear the input.
//! 3. POST it to the chat service and wait for the exchange to settle.
//! 4. Append exactly one `bot` message: the reply, an empty-reply notice, or
//!    an error notice.
//!
//! Steps 1 and 2 happen synchronously when the send is triggered, so input
//! typed afterwards cannot leak into an earlier send. Step 3 is the only
//! suspension point.
//!
//! ## Concurrency
//!
//! The widget is meant to be driven from a single task. Several sends may be
//! outstanding at once; nothing serializes them, so bot messages land in the
//! order responses arrive. Interior state sits behind `RefCell`s and no borrow
//! is held across an `.await`.
//!
use super::client::ChatClient;
use super::message::{Message, Sender, Transcript};
use super::surface::{InputField, TranscriptSurface, UiEvent};
use crate::core::error::ChatError;
#[cfg(test)]
use std::cell::Ref;
use std::cell::{RefCell, RefMut};
use std::future::Future;
use tracing::{debug, error};

pub const EMPTY_REPLY_TEXT: &str = "Received an empty reply from the bot.";
pub const NETWORK_ERROR_TEXT: &str = "Error: Could not connect to the chatbot service.";

/// Text shown when the service answers with a non-success status.
pub fn http_error_text(status: u16) -> String {
    format!("Error: Could not reach the bot (Status: {})", status)
}

/// How a single send settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Input was empty after trimming; nothing was sent.
    Skipped,
    Replied,
    EmptyReply,
    HttpError { status: u16 },
    NetworkError,
}

pub struct ChatWidget<S, I> {
    surface: RefCell<S>,
    input: RefCell<I>,
    transcript: RefCell<Transcript>,
    client: ChatClient,
}

impl<S: TranscriptSurface, I: InputField> ChatWidget<S, I> {
    pub fn new(surface: S, input: I, client: ChatClient) -> Self {
        Self {
            surface: RefCell::new(surface),
            input: RefCell::new(input),
            transcript: RefCell::new(Transcript::new()),
            client,
        }
    }

    /// # Append Message (`append_message`)
    ///
    /// Records a message in the transcript, renders it as the last element of
    /// the surface and scrolls the surface to the bottom.
    ///
    /// ## Arguments
    ///
    /// * `text` - Displayed exactly as given, empty or not. No markup is
    ///   interpreted.
    /// * `sender` - Selects the element's style class (`user-message` or
    ///   `bot-message`).
    pub fn append_message(&self, text: &str, sender: Sender) {
        let mut transcript = self.transcript.borrow_mut();
        debug!("Appending {} message #{}", sender, transcript.len() + 1);
        let message = transcript.push(Message::new(text, sender));

        let mut surface = self.surface.borrow_mut();
        surface.append_element(message);
        let previous = surface.scroll_top();
        let bottom = surface.scroll_height();
        surface.set_scroll_top(bottom);
        debug!("Scrolled transcript from {} to {}", previous, surface.scroll_top());
    }

    /// # Send Message (`send_message`)
    ///
    /// Activates the send control and runs one full send cycle for the
    /// current input. The user message is appended and the input cleared,
    /// the text is POSTed to the chat service, and exactly one bot message is
    /// appended once the exchange settles.
    ///
    /// ## Returns
    ///
    /// * `SendOutcome::Skipped` - The trimmed input was empty. Nothing was
    ///   appended or sent and the input was left as it was.
    /// * Any other variant - How the exchange settled. Failures never escape
    ///   as errors; they are already shown in the transcript.
    pub async fn send_message(&self) -> SendOutcome {
        match self.handle_event(UiEvent::SendActivated) {
            Some(pending) => pending.await,
            None => SendOutcome::Skipped,
        }
    }

    /// # Handle UI Event (`handle_event`)
    ///
    /// Reacts to a user interaction. Only `UiEvent::SendActivated` and an
    /// Enter key press start a send.
    ///
    /// ## Arguments
    ///
    /// * `event` - The interaction delivered by the front-end.
    ///
    /// ## Returns
    ///
    /// * `None` - The event does not trigger a send, or the input is blank.
    /// * `Some(future)` - The user message is already appended and the input
    ///   cleared. Awaiting the future completes the exchange. Several of these
    ///   futures may be outstanding at once.
    pub fn handle_event(&self, event: UiEvent) -> Option<impl Future<Output = SendOutcome> + '_> {
        if !event.triggers_send() {
            return None;
        }
        let text = self.take_input()?;
        Some(self.deliver(text))
    }

    #[cfg(test)]
    pub fn transcript(&self) -> Ref<'_, Transcript> {
        self.transcript.borrow()
    }

    #[cfg(test)]
    pub fn surface(&self) -> Ref<'_, S> {
        self.surface.borrow()
    }

    #[cfg(test)]
    pub fn input(&self) -> Ref<'_, I> {
        self.input.borrow()
    }

    pub fn input_mut(&self) -> RefMut<'_, I> {
        self.input.borrow_mut()
    }

    /// Synchronous half of a send: trims the input, appends the user message
    /// and clears the field. `None` leaves everything untouched.
    fn take_input(&self) -> Option<String> {
        let text = self.input.borrow().value().trim().to_string();
        if text.is_empty() {
            return None;
        }
        self.append_message(&text, Sender::User);
        self.input.borrow_mut().clear();
        Some(text)
    }

    async fn deliver(&self, text: String) -> SendOutcome {
        let result = self.client.exchange(&text).await;
        let outcome = match result {
            Ok(reply) => match reply.text() {
                Some(reply) => {
                    self.append_message(&reply, Sender::Bot);
                    SendOutcome::Replied
                }
                None => {
                    self.append_message(EMPTY_REPLY_TEXT, Sender::Bot);
                    SendOutcome::EmptyReply
                }
            },
            Err(ChatError::HttpStatus { status, body }) => {
                error!(status, body = %body, "Error from chat service");
                self.append_message(&http_error_text(status), Sender::Bot);
                SendOutcome::HttpError { status }
            }
            Err(e) => {
                error!("Network error: {:?}", e);
                self.append_message(NETWORK_ERROR_TEXT, Sender::Bot);
                SendOutcome::NetworkError
            }
        };
        debug!("Send settled: {:?}", outcome);
        outcome
    }
}
