//! Cursor motion helpers.
//!
//! These operate purely on a `Buffer` + cursor offset pair and are free of
//! host state. Each returns the new offset; vertical motions return `None`
//! when there is no line to move to so callers can surface a boundary notice.

use crate::{Buffer, Position};

/// Move left one character (crosses line breaks).
pub fn left(_buf: &Buffer, cursor: usize) -> usize {
    cursor.saturating_sub(1)
}

/// Move right one character (crosses line breaks).
pub fn right(buf: &Buffer, cursor: usize) -> usize {
    (cursor + 1).min(buf.len_chars())
}

/// Move to start of line.
pub fn line_start(buf: &Buffer, cursor: usize) -> usize {
    buf.line_start(buf.line_index(cursor))
}

/// Move to end of line (before its terminator).
pub fn line_end(buf: &Buffer, cursor: usize) -> usize {
    let line = buf.line_index(cursor);
    buf.line_start(line) + buf.line_len(line)
}

pub fn buffer_start(_buf: &Buffer, _cursor: usize) -> usize {
    0
}

pub fn buffer_end(buf: &Buffer, _cursor: usize) -> usize {
    buf.len_chars()
}

/// Move up one line keeping the column (clamped to the target line length).
pub fn up(buf: &Buffer, cursor: usize) -> Option<usize> {
    let pos = buf.position(cursor);
    if pos.line == 0 {
        return None;
    }
    Some(buf.offset_of(Position::new(pos.line - 1, pos.column)))
}

/// Move down one line keeping the column (clamped to the target line length).
pub fn down(buf: &Buffer, cursor: usize) -> Option<usize> {
    let pos = buf.position(cursor);
    if pos.line + 1 >= buf.raw_line_count() {
        return None;
    }
    Some(buf.offset_of(Position::new(pos.line + 1, pos.column)))
}
