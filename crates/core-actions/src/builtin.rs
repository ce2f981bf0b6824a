//! Static adapter table for the built-in commands.
//!
//! Each entry pairs a command name with a plain function pointer taking the
//! reader and the triggering event. Engine commands ignore the event; only
//! `self-insert` reads its text.

use crate::commands;
use crate::registry::CommandEvent;
use core_state::{Notice, Reader};
use core_text::motion;

pub type Adapter = fn(&mut dyn Reader, &CommandEvent) -> Option<Notice>;

pub static BUILTIN_COMMANDS: &[(&str, Adapter)] = &[
    ("move-to-indentation", |r, _| commands::move_to_indentation(r)),
    ("dedent", |r, _| commands::dedent(r)),
    ("move-line-down", |r, _| commands::move_line_down(r)),
    ("move-line-up", |r, _| commands::move_line_up(r)),
    ("previous-paragraph", |r, _| commands::previous_paragraph(r)),
    ("next-paragraph", |r, _| commands::next_paragraph(r)),
    ("beginning-of-line", |r, _| jump(r, motion::line_start)),
    ("end-of-line", |r, _| jump(r, motion::line_end)),
    ("beginning-of-buffer", |r, _| jump(r, motion::buffer_start)),
    ("end-of-buffer", |r, _| jump(r, motion::buffer_end)),
    ("left", |r, _| jump(r, motion::left)),
    ("right", |r, _| jump(r, motion::right)),
    ("up", |r, _| vertical(r, motion::up, Notice::StartOfBuffer)),
    ("down", |r, _| vertical(r, motion::down, Notice::EndOfBuffer)),
    ("clear-screen", |r, _| clear_screen(r)),
    ("self-insert", self_insert),
];

/// Adapter lookup by name.
pub fn builtin(name: &str) -> Option<Adapter> {
    BUILTIN_COMMANDS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, adapter)| *adapter)
}

fn jump(reader: &mut dyn Reader, to: fn(&core_text::Buffer, usize) -> usize) -> Option<Notice> {
    let target = to(reader.buffer(), reader.cursor());
    reader.set_cursor(target);
    None
}

fn vertical(
    reader: &mut dyn Reader,
    to: fn(&core_text::Buffer, usize) -> Option<usize>,
    boundary: Notice,
) -> Option<Notice> {
    match to(reader.buffer(), reader.cursor()) {
        Some(target) => {
            reader.set_cursor(target);
            None
        }
        None => Some(boundary),
    }
}

fn clear_screen(reader: &mut dyn Reader) -> Option<Notice> {
    reader.invalidate_render_cache();
    reader.mark_dirty();
    None
}

fn self_insert(reader: &mut dyn Reader, event: &CommandEvent) -> Option<Notice> {
    if !event.text.is_empty() {
        reader.insert(&event.text);
    }
    None
}
