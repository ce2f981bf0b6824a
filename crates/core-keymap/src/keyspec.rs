//! Human-readable key binding -> host key specification translation.
//!
//! The host REPL addresses keys in readline-like notation: `\C-x` (control),
//! `\M-x` (meta/alt), `\<name>` for named keys, and raw escape sequences
//! (`\e[Z`) for combinations with no compositional form. Users write
//! `"Ctrl+X Ctrl+R"`, `"Alt+Up"`, `"Shift+Tab"` or `"F4"`.
//!
//! Grammar (after lowercasing and trimming):
//! * whitespace separates chords; chord translations are concatenated;
//! * a chord in `SPECIAL_CASES` emits its fixed escape sequence;
//! * any other chord mentioning `shift` is unsupported;
//! * otherwise the chord is split on `+`, single-grapheme parts pass through
//!   and longer parts are resolved by name; parts are joined with `-`.

use smallvec::SmallVec;
use std::borrow::Cow;
use thiserror::Error;
use tracing::trace;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeySpecError {
    #[error("unknown key: {0:?}")]
    UnknownKey(String),
    #[error("key combo {0} not yet supported")]
    UnsupportedKey(String),
}

/// Chords that cannot be expressed with `\C-`/`\M-` notation.
pub const SPECIAL_CASES: &[(&str, &str)] = &[
    ("alt+up", r"\e[1;3A"),
    ("alt+down", r"\e[1;3B"),
    ("alt+right", r"\e[1;3C"),
    ("alt+left", r"\e[1;3D"),
    ("shift+tab", r"\e[Z"),
    ("shift+up", r"\e[1;2A"),
    ("shift+down", r"\e[1;2B"),
    ("shift+right", r"\e[1;2C"),
    ("shift+left", r"\e[1;2D"),
    ("shift+home", r"\e[1;2H"),
    ("shift+end", r"\e[1;2F"),
    ("shift+pageup", r"\e[5;2~"),
    ("shift+pagedown", r"\e[6;2~"),
    ("shift+pgup", r"\e[5;2~"),
    ("shift+pgdn", r"\e[6;2~"),
    ("shift+insert", r"\e[2;2~"),
    ("shift+delete", r"\e[3;2~"),
];

/// Named keys the host understands as `\<name>`. Function keys `f1`-`f20`
/// are matched separately.
pub const HOST_KEY_NAMES: &[&str] = &[
    "backspace",
    "delete",
    "down",
    "end",
    "enter",
    "escape",
    "home",
    "insert",
    "left",
    "pagedown",
    "pageup",
    "return",
    "right",
    "space",
    "tab",
    "up",
];

fn is_function_key(name: &str) -> bool {
    name.strip_prefix('f')
        .and_then(|n| n.parse::<u8>().ok())
        .is_some_and(|n| (1..=20).contains(&n) && !name[1..].starts_with('0'))
}

/// Resolve a multi-character chord part to its spec fragment.
fn named_part(part: &str) -> Option<Cow<'static, str>> {
    match part {
        "ctrl" => Some(Cow::Borrowed(r"\C")),
        "alt" => Some(Cow::Borrowed(r"\M")),
        "pgup" => Some(Cow::Borrowed(r"\<page up>")),
        "pgdn" => Some(Cow::Borrowed(r"\<page down>")),
        name if HOST_KEY_NAMES.contains(&name) || is_function_key(name) => {
            Some(Cow::Owned(format!(r"\<{name}>")))
        }
        _ => None,
    }
}

fn special_case(chord: &str) -> Option<&'static str> {
    SPECIAL_CASES
        .iter()
        .find(|(name, _)| *name == chord)
        .map(|(_, spec)| *spec)
}

/// Translate one normalized (lowercase) chord.
fn chord_spec(chord: &str) -> Result<String, KeySpecError> {
    if let Some(spec) = special_case(chord) {
        return Ok(spec.to_string());
    }
    if chord.contains("shift") {
        return Err(KeySpecError::UnsupportedKey(chord.to_string()));
    }
    let mut parts: SmallVec<[Cow<'_, str>; 4]> = SmallVec::new();
    for part in chord.split('+') {
        if part.graphemes(true).count() == 1 {
            parts.push(Cow::Borrowed(part));
        } else {
            let resolved =
                named_part(part).ok_or_else(|| KeySpecError::UnknownKey(part.to_string()))?;
            parts.push(resolved);
        }
    }
    Ok(parts.join("-"))
}

/// Translate a binding into its per-chord specs, in order.
pub fn to_chord_specs(keybinding: &str) -> Result<Vec<String>, KeySpecError> {
    let normalized = keybinding.trim().to_lowercase();
    let specs = normalized
        .split_whitespace()
        .map(chord_spec)
        .collect::<Result<Vec<_>, _>>()?;
    trace!(target: "keymap.keyspec", binding = keybinding, chords = specs.len(), "translated");
    Ok(specs)
}

/// Convert a human-readable key binding into the host key specification.
///
/// `"Ctrl+F"` -> `\C-f`, `"Alt+M"` -> `\M-m`, `"Shift+Tab"` -> `\e[Z`,
/// `"F4"` -> `\<f4>`, `"Ctrl+X Ctrl+R"` -> `\C-x\C-r`.
pub fn to_keyspec(keybinding: &str) -> Result<String, KeySpecError> {
    Ok(to_chord_specs(keybinding)?.concat())
}

/// Command name derived from a key binding: a leading `_` followed by the
/// binding with every non-alphanumeric character replaced by `_`.
pub fn slugify(keybinding: &str) -> String {
    std::iter::once('_')
        .chain(
            keybinding
                .chars()
                .map(|c| if c.is_alphanumeric() { c } else { '_' }),
        )
        .collect()
}

/// Split a host key spec back into chords, the inverse of `to_keyspec`'s
/// concatenation. `\C-`/`\M-` prefixes attach to the unit that follows;
/// `\<name>` and CSI escapes (`\e[1;3A`) form one unit.
pub fn split_chords(spec: &str) -> Vec<String> {
    let chars: Vec<char> = spec.chars().collect();
    let mut chords = Vec::new();
    let mut i = 0usize;
    while i < chars.len() {
        let end = unit_end(&chars, i);
        chords.push(chars[i..end].iter().collect());
        i = end;
    }
    chords
}

/// Exclusive end index of the chord unit starting at `start`.
fn unit_end(chars: &[char], start: usize) -> usize {
    if chars[start] != '\\' || start + 1 >= chars.len() {
        return start + 1;
    }
    match chars[start + 1] {
        'C' | 'M' if chars.get(start + 2) == Some(&'-') && start + 3 < chars.len() => {
            unit_end(chars, start + 3)
        }
        '<' => chars[start + 2..]
            .iter()
            .position(|c| *c == '>')
            .map_or(chars.len(), |p| start + 2 + p + 1),
        'e' if chars.get(start + 2) == Some(&'[') => chars[start + 3..]
            .iter()
            .position(|c| c.is_ascii_alphabetic() || *c == '~')
            .map_or(chars.len(), |p| start + 3 + p + 1),
        'e' => start + 2,
        _ => start + 1,
    }
}
