#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_actions::CommandRegistry;
use core_state::{Notice, Reader, ReaderState};

/// Reader over `text` with the cursor at the first `|` marker (removed).
pub fn reader(marked: &str) -> ReaderState {
    let cursor = marked.chars().position(|c| c == '|').unwrap_or(marked.chars().count());
    ReaderState::with_cursor(&marked.replacen('|', "", 1), cursor)
}

/// Buffer text with a `|` inserted at the cursor.
pub fn marked(r: &ReaderState) -> String {
    let mut out: String = r.text().chars().take(r.cursor()).collect();
    out.push('|');
    out.extend(r.text().chars().skip(r.cursor()));
    out
}

/// Dispatch `names` in order through the built-in registry.
pub fn run(r: &mut ReaderState, names: &[&str]) -> Vec<Option<Notice>> {
    let reg = CommandRegistry::with_builtins();
    names
        .iter()
        .map(|name| reg.dispatch(name, r, None).unwrap().notice)
        .collect()
}

/// Line contents without terminators.
pub fn contents(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}
