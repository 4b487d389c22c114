//! # Widget UI Handles
//!
//! File: cli/src/widget/surface.rs
//!
//! ## Overview
//!
//! The chat widget never looks up its UI elements itself. It is constructed
//! with three handles:
//! - a `TranscriptSurface` that displays messages and can be scrolled,
//! - an `InputField` holding the text the user is typing,
//! - a send trigger, modelled as the `UiEvent`s that are fed to the widget.
//!
//! The terminal front-end implements these in `terminal.rs`; tests use the
//! recording implementations from the `testing` submodule.
//!
use super::message::Message;

/// A scrollable display that shows one element per appended message.
pub trait TranscriptSurface {
    /// Renders `message` as a new element after every existing one.
    fn append_element(&mut self, message: &Message);

    /// Total scrollable extent of the rendered content.
    fn scroll_height(&self) -> usize;

    /// Current scroll offset.
    fn scroll_top(&self) -> usize;

    fn set_scroll_top(&mut self, offset: usize);
}

/// Single-line text input.
pub trait InputField {
    fn value(&self) -> String;

    fn set_value(&mut self, value: &str);

    fn clear(&mut self) {
        self.set_value("");
    }
}

/// A key press, identified by its key name (`"Enter"`, `"a"`, `"Escape"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key(pub &'static str);

impl Key {
    pub const ENTER: Key = Key("Enter");
}

/// User interactions delivered to the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    /// The send control was activated (clicked).
    SendActivated,
    /// A key was pressed while the input field had focus.
    KeyPress(Key),
}

impl UiEvent {
    pub fn triggers_send(&self) -> bool {
        matches!(self, UiEvent::SendActivated | UiEvent::KeyPress(Key::ENTER))
    }
}

/// Plain in-memory input buffer. The terminal front-end types each line read
/// from stdin into it before pressing Enter.
#[derive(Debug, Default, Clone)]
pub struct LineInput {
    value: String,
}

impl InputField for LineInput {
    fn value(&self) -> String {
        self.value.clone()
    }

    fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
    }
}
