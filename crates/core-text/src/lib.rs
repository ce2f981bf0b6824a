//! Rope-backed text buffer abstraction.
//!
//! All offsets exposed here are *character* offsets (Unicode scalar values),
//! never byte offsets: the REPL host addresses its buffer as a list of
//! characters and the cursor is an index into that list.
//!
//! Line breaks are `\n` only. Two line views exist:
//! * `lines()` / `line_count()`: the buffer split on `\n` retaining
//!   terminators, with no phantom empty line after a trailing `\n`.
//! * `line_content()` / `raw_line_count()`: every `\n` starts a new line,
//!   so a buffer ending in `\n` has an empty final line. Cursor positions
//!   decompose against this view (a cursor after the final `\n` sits on the
//!   phantom line).

use ropey::Rope;

/// A text buffer backed by a `ropey::Rope`.
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    rope: Rope,
}

/// A cursor offset decomposed into (line index, column), both in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

pub mod dedent;
pub mod motion;

pub use dedent::{Dedented, dedent};

impl Buffer {
    /// Construct a buffer from an in-memory string slice.
    pub fn from_text(content: &str) -> Self {
        Self {
            rope: Rope::from_str(content),
        }
    }

    /// Number of characters in the buffer.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Whole buffer content as an owned `String`.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Replace the entire content.
    pub fn replace(&mut self, content: &str) {
        self.rope = Rope::from_str(content);
    }

    /// Insert `text` at character offset `at` (clamped to the buffer end).
    /// Returns the number of characters inserted.
    pub fn insert(&mut self, at: usize, text: &str) -> usize {
        let at = at.min(self.rope.len_chars());
        self.rope.insert(at, text);
        text.chars().count()
    }

    /// Index of the line holding `offset`: the number of `\n` before it.
    pub fn line_index(&self, offset: usize) -> usize {
        self.rope.char_to_line(offset.min(self.rope.len_chars()))
    }

    /// Offset of the first character of `line` (phantom line included).
    /// Lines past the end clamp to the buffer length.
    pub fn line_start(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        self.rope.line_to_char(line)
    }

    /// Decompose an offset into (line, column).
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.rope.len_chars());
        let line = self.line_index(offset);
        Position {
            line,
            column: offset - self.line_start(line),
        }
    }

    /// Inverse of `position`, clamping the column to the line length.
    pub fn offset_of(&self, pos: Position) -> usize {
        let line = pos.line.min(self.raw_line_count().saturating_sub(1));
        let start = self.line_start(line);
        start + pos.column.min(self.line_len(line))
    }

    /// Number of lines counting a phantom empty line after a trailing `\n`.
    pub fn raw_line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Number of lines as produced by `lines()`.
    pub fn line_count(&self) -> usize {
        let raw = self.rope.len_lines();
        if self.rope.line(raw - 1).len_chars() == 0 {
            raw - 1
        } else {
            raw
        }
    }

    /// All lines, terminators retained, no phantom trailing line.
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self.rope.lines().map(|l| l.to_string()).collect();
        if lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        lines
    }

    /// Line content without its terminator. Includes the phantom line;
    /// out-of-range indices yield an empty string.
    pub fn line_content(&self, idx: usize) -> String {
        if idx >= self.rope.len_lines() {
            return String::new();
        }
        let mut s = self.rope.line(idx).to_string();
        if s.ends_with('\n') {
            s.pop();
        }
        s
    }

    /// Character length of a line excluding its terminator.
    pub fn line_len(&self, idx: usize) -> usize {
        if idx >= self.rope.len_lines() {
            return 0;
        }
        let line = self.rope.line(idx);
        let len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }
}

/// True when a line (terminator ignored) holds nothing but whitespace.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Join lines that already carry their terminators.
pub fn join_lines(lines: &[String]) -> String {
    lines.concat()
}
