//! Common-indentation removal.
//!
//! Semantics follow the host REPL's standard dedent:
//! * Lines consisting solely of spaces/tabs do not take part in the margin
//!   computation and are reduced to empty lines.
//! * The margin is the longest leading run of spaces/tabs shared by every
//!   other line, compared character by character (a tab never matches a
//!   space).
//! * The margin is stripped from every non-blank line.
//!
//! Lines are split on `\n` only; terminators are preserved as-is.

/// Result of a dedent pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dedented {
    pub text: String,
    /// Characters removed from each `\n`-separated line, in order.
    pub removed: Vec<usize>,
}

fn is_indent_char(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn whitespace_only(line: &str) -> bool {
    line.chars().all(is_indent_char)
}

fn leading_indent(line: &str) -> &str {
    let end = line
        .char_indices()
        .find(|(_, c)| !is_indent_char(*c))
        .map(|(i, _)| i)
        .unwrap_or(line.len());
    &line[..end]
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let end = a
        .char_indices()
        .zip(b.chars())
        .find(|((_, ca), cb)| ca != cb)
        .map(|((i, _), _)| i)
        .unwrap_or_else(|| a.len().min(b.len()));
    &a[..end]
}

/// Remove the common leading whitespace from every line of `text`.
pub fn dedent(text: &str) -> Dedented {
    let mut margin: Option<&str> = None;
    for line in text.split('\n') {
        if whitespace_only(line) {
            continue;
        }
        let indent = leading_indent(line);
        margin = Some(match margin {
            None => indent,
            Some(m) => common_prefix(m, indent),
        });
        if margin.is_some_and(str::is_empty) {
            break;
        }
    }
    let margin = margin.unwrap_or("");

    let mut out = Vec::new();
    let mut removed = Vec::new();
    for line in text.split('\n') {
        if whitespace_only(line) {
            removed.push(line.chars().count());
            out.push("");
        } else {
            // margin is ASCII, so its byte length is its char count
            removed.push(margin.len());
            out.push(&line[margin.len()..]);
        }
    }
    Dedented {
        text: out.join("\n"),
        removed,
    }
}
