mod common;

use common::{marked, reader, run};
use core_state::{Notice, Reader};

#[test]
fn move_line_up_keeps_column() {
    let mut r = reader("line1\nli|ne2\nline3");
    run(&mut r, &["move-line-up"]);
    assert_eq!(marked(&r), "li|ne2\nline1\nline3");
}

#[test]
fn move_line_down_twice_carries_line_to_bottom() {
    let mut r = reader("a|1\nb2\nc3");
    run(&mut r, &["move-line-down", "move-line-down"]);
    assert_eq!(marked(&r), "b2\nc3\na|1\n");
    // already last: nothing changes
    run(&mut r, &["move-line-down"]);
    assert_eq!(marked(&r), "b2\nc3\na|1\n");
}

#[test]
fn dedent_strips_shared_margin() {
    let mut r = reader("    line1\n    li|ne2");
    run(&mut r, &["dedent"]);
    assert_eq!(marked(&r), "line1\nli|ne2");
}

#[test]
fn dedent_treats_whitespace_only_lines_as_empty() {
    let mut r = reader("  a\n \n  |b");
    run(&mut r, &["dedent"]);
    assert_eq!(marked(&r), "a\n\n|b");
}

#[test]
fn dedent_compares_whitespace_literally() {
    // a tab and four spaces share no margin
    let mut r = reader("\ta\n    |b");
    run(&mut r, &["dedent"]);
    assert_eq!(marked(&r), "\ta\n    |b");
}

#[test]
fn next_paragraph_sequence() {
    let mut r = reader("|para1\n\npara2\n\npara3");
    let notices = run(&mut r, &["next-paragraph", "next-paragraph", "next-paragraph"]);
    assert_eq!(notices, vec![None, None, Some(Notice::EndOfBuffer)]);
    assert_eq!(r.cursor(), r.text().chars().count());
}

#[test]
fn paragraph_motion_skips_whitespace_only_runs() {
    let mut r = reader("|one\ntwo\n   \n\t\nthree\n\nfour");
    run(&mut r, &["next-paragraph"]);
    assert_eq!(marked(&r), "one\ntwo\n|   \n\t\nthree\n\nfour");
    run(&mut r, &["next-paragraph"]);
    assert_eq!(marked(&r), "one\ntwo\n   \n\t\nthree\n|\nfour");
    run(&mut r, &["previous-paragraph"]);
    assert_eq!(marked(&r), "one\ntwo\n|   \n\t\nthree\n\nfour");
}

#[test]
fn previous_paragraph_from_middle_of_first_paragraph() {
    let mut r = reader("one\nt|wo\n\nthree");
    let notices = run(&mut r, &["previous-paragraph"]);
    assert_eq!(notices, vec![Some(Notice::StartOfBuffer)]);
    assert_eq!(r.cursor(), 0);
}

#[test]
fn indentation_then_line_motion() {
    let mut r = reader("def f():\n    return 1|");
    run(&mut r, &["move-to-indentation"]);
    assert_eq!(marked(&r), "def f():\n    |return 1");
    run(&mut r, &["beginning-of-line", "up", "end-of-line"]);
    assert_eq!(marked(&r), "def f():|\n    return 1");
}

#[test]
fn structural_edits_request_full_redraw() {
    for name in ["dedent", "move-line-up", "move-line-down"] {
        let mut r = reader("  a\n  |b\n  c");
        run(&mut r, &[name]);
        assert!(r.dirty, "{name} should mark dirty");
        assert!(r.last_refresh_cache.invalidated, "{name} should invalidate");
    }
}

#[test]
fn motions_do_not_touch_refresh_flags() {
    for name in ["move-to-indentation", "previous-paragraph", "next-paragraph"] {
        let mut r = reader("  a\n  |b\n\n  c");
        let before = r.text();
        run(&mut r, &[name]);
        assert_eq!(r.text(), before);
        assert!(!r.dirty, "{name}");
        assert!(!r.last_refresh_cache.invalidated, "{name}");
    }
}

#[test]
fn multibyte_text_uses_character_offsets() {
    let mut r = reader("héllo\nwö|rld");
    run(&mut r, &["move-line-up"]);
    assert_eq!(marked(&r), "wö|rld\nhéllo\n");
}
