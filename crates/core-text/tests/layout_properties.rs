//! Property-based tests for buffer line layout and dedent.

use core_text::{Buffer, dedent, join_lines};
use proptest::prelude::*;

fn text() -> impl Strategy<Value = String> {
    "[ \tab\u{e9}\n]{0,40}"
}

proptest! {
    // Lines keep their terminators, so joining them rebuilds the buffer.
    #[test]
    fn lines_rebuild_text(t in text()) {
        let b = Buffer::from_text(&t);
        prop_assert_eq!(join_lines(&b.lines()), t.clone());
        prop_assert_eq!(b.lines().len(), b.line_count());
        prop_assert!(b.line_count() <= b.raw_line_count());
    }

    #[test]
    fn position_agrees_with_newline_count(t in text(), frac in 0.0f64..=1.0) {
        let b = Buffer::from_text(&t);
        let offset = (b.len_chars() as f64 * frac) as usize;
        let pos = b.position(offset);
        let before: String = t.chars().take(offset).collect();
        prop_assert_eq!(pos.line, before.matches('\n').count());
        let column = before.rsplit('\n').next().map_or(0, |s| s.chars().count());
        prop_assert_eq!(pos.column, column);
        prop_assert_eq!(b.offset_of(pos), offset);
    }

    #[test]
    fn dedent_reports_one_count_per_line(t in text()) {
        let d = dedent(&t);
        prop_assert_eq!(d.removed.len(), t.split('\n').count());
        let removed: usize = d.removed.iter().sum();
        prop_assert_eq!(d.text.chars().count() + removed, t.chars().count());
    }
}
