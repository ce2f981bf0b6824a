//! Property-based tests for the text-command engine.

mod common;

use common::contents;
use core_actions::commands::{
    dedent, move_line_down, move_line_up, move_to_indentation, next_paragraph, previous_paragraph,
};
use core_state::{Reader, ReaderState};
use proptest::prelude::*;

fn line() -> impl Strategy<Value = String> {
    "[ \t]{0,3}[a-z ]{0,6}"
}

fn text() -> impl Strategy<Value = String> {
    prop::collection::vec(line(), 1..8).prop_map(|lines| lines.join("\n"))
}

fn text_and_cursor() -> impl Strategy<Value = (String, usize)> {
    text().prop_flat_map(|t| {
        let len = t.chars().count();
        (Just(t), 0..=len)
    })
}

proptest! {
    // Moving a line up then back down restores the line order and cursor
    // position, unless the first move hit a boundary.
    #[test]
    fn up_then_down_restores_order((t, cursor) in text_and_cursor()) {
        let mut r = ReaderState::with_cursor(&t, cursor);
        let before = r.position();
        move_line_up(&mut r);
        let moved = r.cursor() != cursor || r.text() != t;
        if moved {
            move_line_down(&mut r);
            prop_assert_eq!(r.position(), before);
        }
        prop_assert_eq!(contents(&r.text()), contents(&t));
    }

    #[test]
    fn down_then_up_restores_order((t, cursor) in text_and_cursor()) {
        let mut r = ReaderState::with_cursor(&t, cursor);
        let before = r.position();
        move_line_down(&mut r);
        let moved = r.cursor() != cursor || r.text() != t;
        if moved {
            move_line_up(&mut r);
            prop_assert_eq!(r.position(), before);
        }
        prop_assert_eq!(contents(&r.text()), contents(&t));
    }

    #[test]
    fn dedent_is_idempotent((t, cursor) in text_and_cursor()) {
        let mut r = ReaderState::with_cursor(&t, cursor);
        dedent(&mut r);
        let once = (r.text(), r.cursor());
        dedent(&mut r);
        prop_assert_eq!((r.text(), r.cursor()), once);
    }

    #[test]
    fn dedent_never_moves_cursor_to_another_line((t, cursor) in text_and_cursor()) {
        let mut r = ReaderState::with_cursor(&t, cursor);
        let line = r.position().line;
        dedent(&mut r);
        prop_assert_eq!(r.position().line, line);
    }

    #[test]
    fn indentation_is_idempotent((t, cursor) in text_and_cursor()) {
        let mut r = ReaderState::with_cursor(&t, cursor);
        move_to_indentation(&mut r);
        let once = r.cursor();
        move_to_indentation(&mut r);
        prop_assert_eq!(r.cursor(), once);
        prop_assert_eq!(r.text(), t);
    }

    // Paragraph motions stay in bounds and land on a line start.
    #[test]
    fn paragraph_motions_land_on_line_starts((t, cursor) in text_and_cursor(), forward in any::<bool>()) {
        let mut r = ReaderState::with_cursor(&t, cursor);
        let notice = if forward { next_paragraph(&mut r) } else { previous_paragraph(&mut r) };
        let len = t.chars().count();
        prop_assert!(r.cursor() <= len);
        if notice.is_none() {
            prop_assert_eq!(r.position().column, 0);
            prop_assert!(r.buffer().line_content(r.position().line).trim().is_empty());
        }
        prop_assert_eq!(r.text(), t);
    }
}
