//! Terminal capability detection and utilities

use owo_colors::{OwoColorize, colors::css};

/// Widest horizontal rule drawn above the menu.
const MAX_RULE_WIDTH: usize = 48;

/// Detects whether colored output should be enabled
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Detects terminal width, returning None if not available
pub fn terminal_width() -> Option<u16> {
    terminal_size::terminal_size().map(|(w, _)| w.0)
}

/// A horizontal rule that fits the terminal.
pub fn rule() -> String {
    let width = terminal_width().map_or(MAX_RULE_WIDTH, |w| usize::from(w).min(MAX_RULE_WIDTH));
    "-".repeat(width)
}

/// Applies `style` to `text` when the terminal supports color.
fn paint(text: &str, style: impl FnOnce(&str) -> String) -> String {
    if supports_color() {
        style(text)
    } else {
        text.to_string()
    }
}

/// Extension trait for colorizing output
pub trait Colorize: AsRef<str> {
    /// Color as success (green)
    fn success(&self) -> String {
        paint(self.as_ref(), |s| s.fg::<css::Green>().to_string())
    }

    /// Color as warning (amber)
    fn warning(&self) -> String {
        paint(self.as_ref(), |s| s.fg::<css::Orange>().to_string())
    }

    /// Color as an error (red)
    fn error(&self) -> String {
        paint(self.as_ref(), |s| s.fg::<css::Crimson>().to_string())
    }

    /// Color as info (blue)
    fn info(&self) -> String {
        paint(self.as_ref(), |s| s.fg::<css::LightBlue>().to_string())
    }

    /// Dim the text
    fn dim(&self) -> String {
        paint(self.as_ref(), |s| s.dimmed().to_string())
    }
}

impl Colorize for str {}

impl Colorize for String {}
