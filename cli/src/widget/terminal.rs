//! # Terminal Transcript
//!
//! File: cli/src/widget/terminal.rs
//!
//! ## Overview
//!
//! `TerminalSurface` renders transcript messages as lines on any `Write`
//! sink (stdout in the CLI, a `Vec<u8>` in tests):
//!
//! ```text
//! [14:02:11] you: Hello
//! [14:02:12] bot: Hi there
//! ```
//!
//! Multi-line messages are indented under their label. The terminal scrolls
//! by itself; the surface tracks the row count so the widget's
//! scroll-to-bottom bookkeeping behaves like any other surface.
//!
use super::message::{Message, Sender};
use super::surface::TranscriptSurface;
use crate::core::config::DisplayConfig;
use std::io::{self, Write};
use tracing::{trace, warn};

pub struct TerminalSurface<W: Write> {
    out: W,
    display: DisplayConfig,
    rows: usize,
    scroll_top: usize,
}

impl TerminalSurface<io::Stdout> {
    pub fn stdout(display: DisplayConfig) -> Self {
        Self::new(io::stdout(), display)
    }
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, display: DisplayConfig) -> Self {
        Self {
            out,
            display,
            rows: 0,
            scroll_top: 0,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Formats `message` exactly as it is written to the terminal, without the
    /// trailing newline.
    pub fn render(&self, message: &Message) -> String {
        let label = match message.sender() {
            Sender::User => &self.display.user_label,
            Sender::Bot => &self.display.bot_label,
        };
        let prefix = if self.display.show_timestamps {
            format!("[{}] {}: ", message.created_at().format("%H:%M:%S"), label)
        } else {
            format!("{}: ", label)
        };
        let indent = " ".repeat(prefix.chars().count());

        let mut rendered = prefix;
        for (i, line) in message.text().split('\n').enumerate() {
            if i > 0 {
                rendered.push('\n');
                rendered.push_str(&indent);
            }
            rendered.push_str(line);
        }
        rendered
    }
}

impl<W: Write> TranscriptSurface for TerminalSurface<W> {
    fn append_element(&mut self, message: &Message) {
        trace!(classes = ?message.style_classes(), "Rendering transcript element");
        let rendered = self.render(message);
        self.rows += rendered.split('\n').count();
        // Appending never fails from the widget's point of view.
        if let Err(e) = writeln!(self.out, "{}", rendered).and_then(|_| self.out.flush()) {
            warn!("Failed to write message to terminal: {}", e);
        }
    }

    fn scroll_height(&self) -> usize {
        self.rows
    }

    fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    fn set_scroll_top(&mut self, offset: usize) {
        self.scroll_top = offset.min(self.rows);
    }
}
