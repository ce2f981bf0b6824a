//! Reader state: the host-side buffer, cursor and refresh bookkeeping that
//! editing commands operate on.
//!
//! The `Reader` trait is the seam between the command engine and whatever REPL
//! hosts it. Commands only ever see `&mut dyn Reader`; `ReaderState` is the
//! in-crate implementation used by the model layer, the binary and tests.
//!
//! Invariants:
//! * The cursor never exceeds the buffer length. `set_cursor` clamps.
//! * Any structural buffer change must call `mark_dirty` and
//!   `invalidate_render_cache` so the host redraws from scratch.

use core_text::{Buffer, Position};
use std::fmt;
use tracing::trace;

/// Soft boundary signal for the host status line. Not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notice {
    StartOfBuffer,
    EndOfBuffer,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::StartOfBuffer => f.write_str("start of buffer"),
            Notice::EndOfBuffer => f.write_str("end of buffer"),
        }
    }
}

/// Mutable buffer/cursor abstraction provided by the host REPL.
pub trait Reader {
    fn buffer(&self) -> &Buffer;
    fn buffer_mut(&mut self) -> &mut Buffer;
    fn cursor(&self) -> usize;
    /// Set the cursor, clamping to the buffer length.
    fn set_cursor(&mut self, cursor: usize);
    fn mark_dirty(&mut self);
    fn invalidate_render_cache(&mut self);
    fn is_dirty(&self) -> bool;
    fn render_cache_invalidated(&self) -> bool;

    /// Either refresh flag is set: the host owes a redraw.
    fn needs_redraw(&self) -> bool {
        self.is_dirty() || self.render_cache_invalidated()
    }

    /// Whole buffer content.
    fn text(&self) -> String {
        self.buffer().text()
    }

    /// Cursor decomposed into (line, column).
    fn position(&self) -> Position {
        self.buffer().position(self.cursor())
    }

    /// Offset of the start of the cursor's line.
    fn line_start(&self) -> usize {
        let buf = self.buffer();
        buf.line_start(buf.line_index(self.cursor()))
    }

    /// Replace the buffer wholesale and flag a full redraw. The cursor is
    /// re-clamped but otherwise left for the caller to reposition.
    fn replace_text(&mut self, text: &str) {
        self.buffer_mut().replace(text);
        let cursor = self.cursor();
        self.set_cursor(cursor);
        self.invalidate_render_cache();
        self.mark_dirty();
    }

    /// Insert text at the cursor and advance past it.
    fn insert(&mut self, text: &str) {
        let cursor = self.cursor();
        let inserted = self.buffer_mut().insert(cursor, text);
        self.set_cursor(cursor + inserted);
        self.mark_dirty();
    }
}

/// Render cache bookkeeping owned by the host.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RefreshCache {
    pub invalidated: bool,
}

/// Concrete reader: one buffer, a cursor and the refresh flags.
#[derive(Debug, Clone, Default)]
pub struct ReaderState {
    buffer: Buffer,
    cursor: usize,
    pub dirty: bool,
    pub last_refresh_cache: RefreshCache,
}

impl ReaderState {
    /// Create a reader with the cursor at the end of `text`.
    pub fn new(text: &str) -> Self {
        let buffer = Buffer::from_text(text);
        let cursor = buffer.len_chars();
        Self {
            buffer,
            cursor,
            dirty: false,
            last_refresh_cache: RefreshCache::default(),
        }
    }

    /// Create a reader with an explicit (clamped) cursor.
    pub fn with_cursor(text: &str, cursor: usize) -> Self {
        let mut state = Self::new(text);
        state.cursor = cursor.min(state.buffer.len_chars());
        state
    }

    /// Create a reader from raw file/stdin content, normalizing line endings
    /// to LF first. `cursor` is an offset into `raw`.
    pub fn from_source(raw: &str, cursor: Option<usize>) -> (Self, NormalizedText) {
        let norm = normalize_line_endings(raw);
        let state = match cursor {
            Some(c) => Self::with_cursor(&norm.normalized, norm.to_normalized(c)),
            None => Self::new(&norm.normalized),
        };
        (state, norm)
    }

    /// Clear the dirty and cache flags after the host has redrawn.
    pub fn mark_refreshed(&mut self) {
        self.dirty = false;
        self.last_refresh_cache.invalidated = false;
    }
}

impl Reader for ReaderState {
    fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn set_cursor(&mut self, cursor: usize) {
        let len = self.buffer.len_chars();
        if cursor > len {
            trace!(target: "state.cursor", requested = cursor, len, "cursor_clamped");
        }
        self.cursor = cursor.min(len);
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn invalidate_render_cache(&mut self) {
        self.last_refresh_cache.invalidated = true;
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn render_cache_invalidated(&self) -> bool {
        self.last_refresh_cache.invalidated
    }
}

/// Line ending style detected from source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    Cr,
    Crlf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Cr => "\r",
            LineEnding::Crlf => "\r\n",
        }
    }
}

/// LF-only text together with what is needed to write it back out in the
/// style it was read in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    pub normalized: String,
    /// Majority style of the input; `restore` writes every break in it.
    pub original: LineEnding,
    pub mixed: bool,
    /// Raw char offsets of the `\r\n` pairs folded into a single `\n`.
    folded: Vec<usize>,
}

impl NormalizedText {
    /// Convert LF-only text back to the original line ending style.
    pub fn restore(&self, text: &str) -> String {
        match self.original {
            LineEnding::Lf => text.to_string(),
            other => text.replace('\n', other.as_str()),
        }
    }

    /// Map a char offset in the raw input to one in `normalized`. An offset
    /// between the two halves of a `\r\n` lands on the line break.
    pub fn to_normalized(&self, raw: usize) -> usize {
        raw - self.folded.partition_point(|&at| at < raw)
    }

    /// Map a char offset in LF-only `text` to the same place in
    /// `restore(text)`.
    pub fn to_restored(&self, text: &str, offset: usize) -> usize {
        let extra = self.original.as_str().chars().count() - 1;
        if extra == 0 {
            return offset;
        }
        let breaks = text.chars().take(offset).filter(|&c| c == '\n').count();
        offset + extra * breaks
    }
}

/// Fold every line break of `input` to `\n`.
///
/// `original` is the most frequent style; ties go to CRLF, then LF, then CR.
pub fn normalize_line_endings(input: &str) -> NormalizedText {
    let mut normalized = String::with_capacity(input.len());
    let mut folded = Vec::new();
    let mut seen = [
        (LineEnding::Crlf, 0usize),
        (LineEnding::Lf, 0),
        (LineEnding::Cr, 0),
    ];
    let mut chars = input.chars().enumerate().peekable();
    while let Some((at, c)) = chars.next() {
        let ending = match c {
            '\n' => LineEnding::Lf,
            '\r' => match chars.next_if(|&(_, next)| next == '\n') {
                Some(_) => {
                    folded.push(at);
                    LineEnding::Crlf
                }
                None => LineEnding::Cr,
            },
            _ => {
                normalized.push(c);
                continue;
            }
        };
        normalized.push('\n');
        if let Some(slot) = seen.iter_mut().find(|(style, _)| *style == ending) {
            slot.1 += 1;
        }
    }
    let present = seen.iter().filter(|(_, count)| *count > 0);
    // `max_by_key` keeps the last maximum, so walk in reverse to favor the
    // earlier style on ties.
    let original = present
        .clone()
        .rev()
        .max_by_key(|(_, count)| *count)
        .map_or(LineEnding::Lf, |(style, _)| *style);
    NormalizedText {
        normalized,
        original,
        mixed: present.count() > 1,
        folded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_places_cursor_at_end() {
        let r = ReaderState::new("abc\nde");
        assert_eq!(r.cursor(), 6);
        assert!(!r.dirty);
        assert!(!r.last_refresh_cache.invalidated);
    }

    #[test]
    fn cursor_is_clamped() {
        let mut r = ReaderState::with_cursor("test", 10);
        assert_eq!(r.cursor(), 4);
        r.set_cursor(99);
        assert_eq!(r.cursor(), 4);
    }

    #[test]
    fn position_and_line_start() {
        let r = ReaderState::with_cursor("line1\n    line2", 12);
        assert_eq!(r.position(), Position::new(1, 6));
        assert_eq!(r.line_start(), 6);
    }

    #[test]
    fn insert_advances_cursor_and_marks_dirty() {
        let mut r = ReaderState::with_cursor("ab", 1);
        r.insert("XY");
        assert_eq!(r.text(), "aXYb");
        assert_eq!(r.cursor(), 3);
        assert!(r.dirty);
    }

    #[test]
    fn replace_text_invalidates_and_reclamps() {
        let mut r = ReaderState::with_cursor("long text", 8);
        r.replace_text("ab");
        assert_eq!(r.cursor(), 2);
        assert!(r.dirty);
        assert!(r.last_refresh_cache.invalidated);
        r.mark_refreshed();
        assert!(!r.dirty);
        assert!(!r.last_refresh_cache.invalidated);
    }

    #[test]
    fn notice_display() {
        assert_eq!(Notice::StartOfBuffer.to_string(), "start of buffer");
        assert_eq!(Notice::EndOfBuffer.to_string(), "end of buffer");
    }

    #[test]
    fn normalizes_crlf_and_restores() {
        let norm = normalize_line_endings("a\r\nb\r\n");
        assert_eq!(norm.normalized, "a\nb\n");
        assert_eq!(norm.original, LineEnding::Crlf);
        assert!(!norm.mixed);
        assert_eq!(norm.restore("b\na\n"), "b\r\na\r\n");
    }

    #[test]
    fn mixed_line_endings_flagged() {
        let norm = normalize_line_endings("a\r\nb\nc\n");
        assert_eq!(norm.original, LineEnding::Lf);
        assert!(norm.mixed);
        assert_eq!(norm.normalized, "a\nb\nc\n");
    }

    #[test]
    fn ties_prefer_crlf_and_lone_cr_is_a_break() {
        let norm = normalize_line_endings("a\rb\r\nc");
        assert_eq!(norm.normalized, "a\nb\nc");
        assert_eq!(norm.original, LineEnding::Crlf);
        assert!(norm.mixed);

        let plain = normalize_line_endings("no breaks");
        assert_eq!(plain.original, LineEnding::Lf);
        assert!(!plain.mixed);
    }

    #[test]
    fn raw_offsets_map_to_normalized() {
        let norm = normalize_line_endings("a\r\n  bc\r\n");
        assert_eq!(norm.to_normalized(0), 0);
        assert_eq!(norm.to_normalized(1), 1);
        // between \r and \n
        assert_eq!(norm.to_normalized(2), 1);
        assert_eq!(norm.to_normalized(3), 2);
        assert_eq!(norm.to_normalized(6), 5);
        assert_eq!(norm.to_normalized(9), 7);
    }

    #[test]
    fn normalized_offsets_map_back_after_edits() {
        let norm = normalize_line_endings("a\r\n  bc");
        assert_eq!(norm.to_restored("a\n  bc", 4), 5);
        // the edited text decides, not the input
        assert_eq!(norm.to_restored("x\ny\nz", 5), 7);
        assert_eq!(norm.to_restored("x\ny\nz", 0), 0);

        let lf = normalize_line_endings("a\nb");
        assert_eq!(lf.to_restored("a\nb", 3), 3);
    }

    #[test]
    fn redraw_flags_are_reported() {
        let mut r = ReaderState::new("x");
        assert!(!r.needs_redraw());
        r.invalidate_render_cache();
        assert!(r.render_cache_invalidated());
        assert!(!r.is_dirty());
        assert!(r.needs_redraw());
        r.mark_refreshed();
        r.mark_dirty();
        assert!(r.is_dirty());
        assert!(r.needs_redraw());
    }

    #[test]
    fn from_source_maps_raw_cursor() {
        let (r, _) = ReaderState::from_source("a\r\n  bc", Some(3));
        assert_eq!(r.cursor(), 2);
        assert_eq!(r.position(), Position::new(1, 0));
    }

    #[test]
    fn from_source_normalizes_before_cursor_clamp() {
        let (r, norm) = ReaderState::from_source("x\r\ny", Some(10));
        assert_eq!(r.text(), "x\ny");
        assert_eq!(r.cursor(), 3);
        assert_eq!(norm.original, LineEnding::Crlf);
    }
}
