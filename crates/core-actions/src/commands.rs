//! Text-command engine.
//!
//! Every command takes the host reader, re-derives line layout from the
//! current buffer content, mutates buffer and cursor in place and may return
//! a `Notice` for the status line. Structural edits replace the whole buffer
//! through `Reader::replace_text`, which flags the host for a full redraw.

use core_state::{Notice, Reader};
use core_text::{dedent as dedent_text, is_blank, join_lines};
use tracing::debug;

fn is_indent(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Move the cursor to the first non-blank character of its line. Lines that
/// are empty or hold only spaces/tabs send it to the line start.
pub fn move_to_indentation(reader: &mut dyn Reader) -> Option<Notice> {
    let pos = reader.position();
    let content = reader.buffer().line_content(pos.line);
    let indent = content
        .chars()
        .position(|c| !is_indent(c))
        .unwrap_or(0);
    let target = reader.line_start() + indent;
    debug!(target: "actions.dispatch", line = pos.line, indent, "move_to_indentation");
    reader.set_cursor(target);
    None
}

/// Strip the common leading whitespace of the buffer.
///
/// The cursor moves back by everything removed on earlier lines plus, on its
/// own line, at most its column, so a cursor inside the margin lands on the
/// line start instead of the line above.
pub fn dedent(reader: &mut dyn Reader) -> Option<Notice> {
    let pos = reader.position();
    let dedented = dedent_text(&reader.text());
    let before_line: usize = dedented.removed.iter().take(pos.line).sum();
    let on_line = dedented
        .removed
        .get(pos.line)
        .copied()
        .unwrap_or(0)
        .min(pos.column);
    let cursor = reader.cursor().saturating_sub(before_line + on_line);
    debug!(
        target: "actions.dispatch",
        removed = dedented.removed.iter().sum::<usize>(),
        cursor,
        "dedent"
    );
    reader.replace_text(&dedented.text);
    reader.set_cursor(cursor);
    None
}

/// Line the cursor is on, if it is a real line (not the phantom line after a
/// trailing newline).
fn current_line(reader: &dyn Reader, lines: &[String]) -> Option<usize> {
    let line = reader.position().line;
    (line < lines.len()).then_some(line)
}

fn terminated(mut line: String) -> String {
    if !line.ends_with('\n') {
        line.push('\n');
    }
    line
}

/// Swap the cursor's line with the one below it. The cursor stays on the
/// moved line at the same column.
pub fn move_line_down(reader: &mut dyn Reader) -> Option<Notice> {
    let mut lines = reader.buffer().lines();
    let y = current_line(reader, &lines)?;
    if y + 1 >= lines.len() {
        return None;
    }
    let raised = terminated(lines.remove(y + 1));
    let advance = raised.chars().count();
    lines.insert(y, raised);
    let cursor = reader.cursor() + advance;
    debug!(target: "actions.dispatch", line = y, cursor, "move_line_down");
    reader.replace_text(&join_lines(&lines));
    reader.set_cursor(cursor);
    None
}

/// Swap the cursor's line with the one above it. The cursor stays on the
/// moved line at the same column.
pub fn move_line_up(reader: &mut dyn Reader) -> Option<Notice> {
    let mut lines = reader.buffer().lines();
    let y = current_line(reader, &lines)?;
    if y == 0 {
        return None;
    }
    let displaced = lines.remove(y - 1);
    let retreat = displaced.chars().count();
    let raised = terminated(lines.remove(y - 1));
    lines.insert(y - 1, displaced);
    lines.insert(y - 1, raised);
    let cursor = reader.cursor().saturating_sub(retreat);
    debug!(target: "actions.dispatch", line = y, cursor, "move_line_up");
    reader.replace_text(&join_lines(&lines));
    reader.set_cursor(cursor);
    None
}

/// Move to the blank line that opens the previous paragraph.
pub fn previous_paragraph(reader: &mut dyn Reader) -> Option<Notice> {
    let text = reader.text();
    let lines: Vec<&str> = text.split('\n').collect();
    let y = reader.position().line;
    let blank = |i: usize| is_blank(lines[i]);

    // `i` counts one past the candidate line so the scan never underflows.
    let mut i = y;
    if blank(y) {
        while i > 0 && blank(i - 1) {
            i -= 1;
        }
    }
    while i > 0 && !blank(i - 1) {
        i -= 1;
    }
    if i == 0 {
        debug!(target: "actions.dispatch", from = y, "previous_paragraph_start");
        reader.set_cursor(0);
        return Some(Notice::StartOfBuffer);
    }
    let mut line = i - 1;
    while line > 0 && blank(line - 1) {
        line -= 1;
    }
    let target = reader.buffer().line_start(line);
    debug!(target: "actions.dispatch", from = y, to = line, "previous_paragraph");
    reader.set_cursor(target);
    None
}

/// Move to the blank line that closes the current paragraph.
pub fn next_paragraph(reader: &mut dyn Reader) -> Option<Notice> {
    let text = reader.text();
    let lines: Vec<&str> = text.split('\n').collect();
    let y = reader.position().line;
    let n = lines.len();
    let blank = |i: usize| is_blank(lines[i]);

    let mut i = y + 1;
    if blank(y) {
        while i < n && blank(i) {
            i += 1;
        }
    }
    while i < n && !blank(i) {
        i += 1;
    }
    if i >= n {
        debug!(target: "actions.dispatch", from = y, "next_paragraph_end");
        let end = reader.buffer().len_chars();
        reader.set_cursor(end);
        return Some(Notice::EndOfBuffer);
    }
    let target = reader.buffer().line_start(i);
    debug!(target: "actions.dispatch", from = y, to = i, "next_paragraph");
    reader.set_cursor(target);
    None
}
