//! core-keymap: key specification translation and the binding table.
//!
//! Design principles:
//! - Pure and deterministic: resolution depends only on the pending chord
//!   buffer and the bindings.
//! - Bindings are compiled into a trie keyed by chord specs, so multi-chord
//!   sequences (`\C-x\C-r`) share prefixes with their siblings.
//! - Ambiguity is surfaced: a strict prefix of one or more bindings yields
//!   `NeedMore` instead of a match.
//! - No side effects: logging only at DEBUG/TRACE.

use smallvec::SmallVec;
use tracing::{debug, trace};

pub mod keyspec;

pub use keyspec::{KeySpecError, slugify, split_chords, to_chord_specs, to_keyspec};

// -------------------------------------------------------------------------------------------------
// Key Token Pattern
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyTokenPattern {
    /// One translated chord, e.g. `\C-x` or `\e[Z`.
    Chord(String),
}

impl KeyTokenPattern {
    fn matches(&self, chord: &str) -> bool {
        match self {
            KeyTokenPattern::Chord(c) => c == chord,
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Binding
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub sequence: Vec<KeyTokenPattern>,
    pub command: String,
}

impl Binding {
    /// The concatenated host key spec for this binding.
    pub fn spec(&self) -> String {
        self.sequence
            .iter()
            .map(|p| match p {
                KeyTokenPattern::Chord(c) => c.as_str(),
            })
            .collect()
    }
}

// -------------------------------------------------------------------------------------------------
// Trie Representation
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone)]
struct Edge {
    pat: KeyTokenPattern,
    next: usize,
}

#[derive(Debug, Clone)]
struct Node {
    terminal: Option<usize>, // index into bindings vec
    edges: SmallVec<[Edge; 4]>,
}

impl Node {
    fn new() -> Self {
        Self {
            terminal: None,
            edges: SmallVec::new(),
        }
    }
}

/// Chord-sequence -> command name table.
#[derive(Debug, Clone)]
pub struct Keymap {
    nodes: Vec<Node>,
    bindings: Vec<Binding>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}

impl Keymap {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new()],
            bindings: Vec::new(),
        }
    }

    /// Bind a chord sequence to a command name. A later binding of the same
    /// sequence overrides the earlier one. Empty sequences are ignored and
    /// return `false`.
    pub fn bind<S: AsRef<str>>(&mut self, chords: &[S], command: impl Into<String>) -> bool {
        if chords.is_empty() {
            return false;
        }
        let command = command.into();
        let mut cur = 0usize;
        for chord in chords {
            let chord = chord.as_ref();
            let next = if let Some(e) = self.nodes[cur].edges.iter().find(|e| e.pat.matches(chord))
            {
                e.next
            } else {
                let new_idx = self.nodes.len();
                self.nodes.push(Node::new());
                self.nodes[cur].edges.push(Edge {
                    pat: KeyTokenPattern::Chord(chord.to_string()),
                    next: new_idx,
                });
                new_idx
            };
            cur = next;
        }
        let binding = Binding {
            sequence: chords
                .iter()
                .map(|c| KeyTokenPattern::Chord(c.as_ref().to_string()))
                .collect(),
            command,
        };
        if let Some(existing) = self.nodes[cur].terminal {
            trace!(
                target: "keymap.bind",
                spec = %binding.spec(),
                previous = self.bindings[existing].command.as_str(),
                "binding_override"
            );
            self.bindings[existing] = binding;
        } else {
            self.nodes[cur].terminal = Some(self.bindings.len());
            self.bindings.push(binding);
        }
        debug!(target: "keymap.bind", node = cur, bindings = self.bindings.len(), "bound");
        true
    }

    /// Command bound to exactly this chord sequence.
    pub fn lookup<S: AsRef<str>>(&self, chords: &[S]) -> Option<&str> {
        let mut cur = 0usize;
        for chord in chords {
            let chord = chord.as_ref();
            cur = self.nodes[cur]
                .edges
                .iter()
                .find(|e| e.pat.matches(chord))?
                .next;
        }
        self.nodes[cur]
            .terminal
            .map(|i| self.bindings[i].command.as_str())
    }

    /// All bindings in insertion order.
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Resolve the longest binding matching a prefix of `pending`.
    pub fn resolve<S: AsRef<str>>(&self, pending: &[S]) -> Resolution {
        let mut node_idx = 0usize;
        let mut last_terminal: Option<(usize, usize)> = None; // (consumed, binding index)
        let mut walked = 0usize;
        for (i, chord) in pending.iter().enumerate() {
            let chord = chord.as_ref();
            let Some(edge) = self.nodes[node_idx]
                .edges
                .iter()
                .find(|e| e.pat.matches(chord))
            else {
                break;
            };
            node_idx = edge.next;
            walked = i + 1;
            trace!(target: "keymap.resolve", step = i, chord, node = node_idx, "advance");
            if let Some(bi) = self.nodes[node_idx].terminal {
                last_terminal = Some((i + 1, bi));
            }
        }
        // More input could still extend the walk only if every pending chord was consumed.
        let extendable = walked == pending.len() && !self.nodes[node_idx].edges.is_empty();
        if let Some((consumed, bi)) = last_terminal {
            Resolution::Matched {
                consumed,
                command: self.bindings[bi].command.clone(),
                ambiguous: extendable,
            }
        } else if let Some(first) = pending.first() {
            if extendable {
                Resolution::NeedMore
            } else {
                Resolution::Unbound(first.as_ref().to_string())
            }
        } else {
            Resolution::NeedMore
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Resolution Result
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Matched {
        consumed: usize,
        command: String,
        ambiguous: bool,
    },
    NeedMore, // strict prefix of one or more bindings
    /// No binding starts with this chord.
    Unbound(String),
}
