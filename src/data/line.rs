// src/data/line.rs

//! Implements a [`LogLine`] struct.
//!
//! [`LogLine`]: crate::data::line::LogLine

use crate::common::LineIndex;

use std::fmt;

// -------
// LogLine

/// A `LogLine` is one line of text from one log source and its 0-based
/// position within that source.
///
/// Immutable once read. Smart-meter diagnostic logs are small (a modem
/// session transcript) so whole lines are stored, not byte ranges.
#[derive(Clone, Eq, PartialEq)]
pub struct LogLine {
    /// The line text, without the trailing newline.
    text: String,
    /// 0-based position of this line within the log source.
    li: LineIndex,
}

/// Sequence of [`LogLine`], the in-memory form of one log source.
pub type LogLines = Vec<LogLine>;

impl fmt::Debug for LogLine {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("LogLine")
            .field("li", &self.li)
            .field("len", &self.text.len())
            .field("text", &self.text)
            .finish()
    }
}

impl LogLine {
    pub fn new(
        text: String,
        li: LineIndex,
    ) -> LogLine {
        LogLine { text, li }
    }

    /// Return a reference to the line text.
    pub fn text(self: &LogLine) -> &str {
        &self.text
    }

    /// Return the 0-based position of this line within the log source.
    pub fn li(self: &LogLine) -> LineIndex {
        self.li
    }

    /// Length of the line text in bytes.
    pub fn len(self: &LogLine) -> usize {
        self.text.len()
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn is_empty(self: &LogLine) -> bool {
        self.text.is_empty()
    }
}
