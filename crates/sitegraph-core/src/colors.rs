//! ANSI styling for terminal output.

use std::fmt;

const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const GREEN: &str = "\x1b[32m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Styles text by role. Disabled colors pass text through unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Colors {
    enabled: bool,
}

impl Colors {
    pub const ON: Self = Self { enabled: true };
    pub const OFF: Self = Self { enabled: false };

    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Warning labels and conflicting shapes.
    pub fn warning<T: fmt::Display>(&self, text: T) -> Painted<T> {
        self.paint(YELLOW, text)
    }

    /// Type names and field paths.
    pub fn name<T: fmt::Display>(&self, text: T) -> Painted<T> {
        self.paint(BLUE, text)
    }

    pub fn value<T: fmt::Display>(&self, text: T) -> Painted<T> {
        self.paint(GREEN, text)
    }

    /// Node ids and file paths.
    pub fn muted<T: fmt::Display>(&self, text: T) -> Painted<T> {
        self.paint(DIM, text)
    }

    fn paint<T: fmt::Display>(&self, style: &'static str, text: T) -> Painted<T> {
        Painted {
            style: if self.enabled { style } else { "" },
            text,
        }
    }
}

/// Text wrapped in a style, reset after.
pub struct Painted<T> {
    style: &'static str,
    text: T,
}

impl<T: fmt::Display> fmt::Display for Painted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.style.is_empty() {
            return write!(f, "{}", self.text);
        }
        write!(f, "{}{}{RESET}", self.style, self.text)
    }
}
