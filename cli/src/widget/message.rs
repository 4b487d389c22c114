//! # Transcript Messages
//!
//! File: cli/src/widget/message.rs
//!
//! ## Overview
//!
//! The data carried by the chat widget:
//! - `Sender`: who authored a message (`user` or `bot`).
//! - `Message`: one immutable entry in the conversation.
//! - `Transcript`: the append-only, ordered list of messages.
//! - `OutboundRequest` / `InboundReply`: the JSON bodies exchanged with the
//!   chat service.
//!
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Author of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    /// Style class attached to the rendered element, next to the shared
    /// `message` class.
    pub fn style_class(self) -> &'static str {
        match self {
            Sender::User => "user-message",
            Sender::Bot => "bot-message",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}

/// One displayed unit of conversation. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    text: String,
    sender: Sender,
    created_at: DateTime<Local>,
}

impl Message {
    pub fn new(text: impl Into<String>, sender: Sender) -> Self {
        Self {
            text: text.into(),
            sender,
            created_at: Local::now(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    /// Classes for the rendered element, e.g. `["message", "user-message"]`.
    pub fn style_classes(&self) -> [&'static str; 2] {
        ["message", self.sender.style_class()]
    }
}

/// Append-only conversation history for one session.
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    #[cfg(test)]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[cfg(test)]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// Body POSTed to the chat service.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutboundRequest {
    pub message: String,
}

/// Body returned by the chat service on success. Only `reply` is read;
/// any other field is ignored.
#[derive(Debug, Default)]
pub struct InboundReply {
    pub reply: Option<serde_json::Value>,
}

impl From<serde_json::Value> for InboundReply {
    /// A body that is not a JSON object carries no `reply`.
    fn from(body: serde_json::Value) -> Self {
        Self {
            reply: body.get("reply").cloned(),
        }
    }
}

impl InboundReply {
    /// The reply text when the `reply` field is truthy. `None` for a missing,
    /// `null`, empty-string, `false` or zero reply.
    ///
    /// Truthy non-string values are converted the way a browser would put
    /// them into an element's text: numbers and booleans print as-is, arrays
    /// join their items with `,` (so `[]` becomes an empty message) and
    /// objects become `[object Object]`.
    pub fn text(&self) -> Option<String> {
        use serde_json::Value;
        match self.reply.as_ref()? {
            Value::Null | Value::Bool(false) => None,
            Value::String(s) if s.is_empty() => None,
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            other => Some(display_text(other)),
        }
    }
}

fn display_text(value: &serde_json::Value) -> String {
    use serde_json::Value;
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{:.0}", f),
            _ => n.to_string(),
        },
        Value::Array(items) => items
            .iter()
            .map(display_text)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}
