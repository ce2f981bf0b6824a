//! REPL model: one reader, the command registry and the key binding table.
//!
//! This is the facade hosts talk to. It owns the three pieces and keeps them
//! consistent:
//! * every binding names a command that exists in the registry at bind time;
//! * commands created by `bind_to_insert` are named by `slugify(keybinding)`,
//!   so rebinding the same key replaces the old text command;
//! * `press` is the only path from raw key input to dispatch.
//!
//! Bindings are stored per chord (`\C-x`, `\C-r`) rather than as one
//! concatenated spec so multi-chord sequences resolve incrementally.

use core_actions::{
    CommandEvent, CommandRegistry, DispatchError, DispatchResult, Handler, under_to_kebab,
};
use core_config::Config;
use core_keymap::{KeySpecError, Keymap, Resolution, slugify, split_chords, to_chord_specs};
use core_state::{Notice, Reader, ReaderState};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error(transparent)]
    KeySpec(#[from] KeySpecError),
    #[error("cannot bind to unknown command: {0}")]
    UnknownCommand(String),
    #[error("empty key binding")]
    EmptyBinding,
}

/// What a call to `ReplModel::press` did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PressReport {
    /// Commands run, in order.
    pub dispatched: Vec<String>,
    pub notices: Vec<Notice>,
    /// Chords with no binding that could not be self-inserted.
    pub unbound: Vec<String>,
    /// Trailing chords forming an incomplete multi-chord binding.
    pub pending: Vec<String>,
    pub dirty: bool,
}

#[derive(Debug)]
pub struct ReplModel {
    reader: ReaderState,
    registry: CommandRegistry,
    keymap: Keymap,
}

impl ReplModel {
    /// Model with every built-in command registered and no bindings.
    pub fn new(reader: ReaderState) -> Self {
        Self {
            reader,
            registry: CommandRegistry::with_builtins(),
            keymap: Keymap::new(),
        }
    }

    /// Model built from configuration: disabled built-ins are left out, then
    /// bindings and inserts are applied. Entries that fail are returned with
    /// their key so the caller can report them.
    pub fn from_config(reader: ReaderState, config: &Config) -> (Self, Vec<(String, BindError)>) {
        let mut model = Self {
            reader,
            registry: CommandRegistry::with_builtins_where(|name| !config.is_disabled(name)),
            keymap: Keymap::new(),
        };
        let errors = model.apply_config(config);
        (model, errors)
    }

    pub fn reader(&self) -> &ReaderState {
        &self.reader
    }

    pub fn reader_mut(&mut self) -> &mut ReaderState {
        &mut self.reader
    }

    pub fn into_reader(self) -> ReaderState {
        self.reader
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    fn chords(keybinding: &str) -> Result<Vec<String>, BindError> {
        let chords = to_chord_specs(keybinding)?;
        if chords.is_empty() {
            return Err(BindError::EmptyBinding);
        }
        Ok(chords)
    }

    /// Bind a key to an already registered command. Returns the host key
    /// spec the binding was stored under.
    pub fn bind(&mut self, keybinding: &str, command: &str) -> Result<String, BindError> {
        let chords = Self::chords(keybinding)?;
        if !self.registry.contains(command) {
            return Err(BindError::UnknownCommand(command.to_string()));
        }
        self.keymap.bind(&chords, command);
        let spec = chords.concat();
        debug!(target: "keymap.bind", keybinding, spec = spec.as_str(), command, "bind");
        Ok(spec)
    }

    /// Register `handler` as `name` and bind it.
    pub fn bind_new(
        &mut self,
        keybinding: &str,
        name: &str,
        handler: Handler,
    ) -> Result<String, BindError> {
        Self::chords(keybinding)?;
        self.registry.register(name, handler);
        self.bind(keybinding, name)
    }

    /// Register `handler` under the kebab-cased `function_name` and bind it.
    /// Returns the command name.
    pub fn bind_fn(
        &mut self,
        keybinding: &str,
        function_name: &str,
        handler: Handler,
    ) -> Result<String, BindError> {
        let name = under_to_kebab(function_name);
        self.bind_new(keybinding, &name, handler)?;
        Ok(name)
    }

    /// Bind a key to insert literal `text` at the cursor. Returns the
    /// generated command name.
    pub fn bind_to_insert(&mut self, keybinding: &str, text: &str) -> Result<String, BindError> {
        let name = slugify(keybinding);
        let text = text.to_string();
        self.bind_new(
            keybinding,
            &name,
            Handler::plain(move |reader: &mut dyn Reader| {
                reader.insert(&text);
                None
            }),
        )?;
        Ok(name)
    }

    /// Apply `[bindings]` then `[insert]` from a config.
    pub fn apply_config(&mut self, config: &Config) -> Vec<(String, BindError)> {
        let mut errors = Vec::new();
        for (keys, command) in &config.file.bindings {
            if let Err(e) = self.bind(keys, command) {
                warn!(target: "config", keys = keys.as_str(), command = command.as_str(), error = %e, "binding_rejected");
                errors.push((keys.clone(), e));
            }
        }
        for (keys, text) in &config.file.insert {
            if let Err(e) = self.bind_to_insert(keys, text) {
                warn!(target: "config", keys = keys.as_str(), error = %e, "insert_rejected");
                errors.push((keys.clone(), e));
            }
        }
        info!(
            target: "config",
            bindings = self.keymap.len(),
            rejected = errors.len(),
            "config_applied"
        );
        errors
    }

    /// Run a command by name.
    pub fn run(&mut self, command: &str) -> Result<DispatchResult, DispatchError> {
        self.registry.dispatch(command, &mut self.reader, None)
    }

    /// Feed a host key spec (e.g. `\C-x\C-rab`) through the bindings and
    /// dispatch what it resolves to. Unbound single characters self-insert.
    pub fn press(&mut self, keys: &str) -> Result<PressReport, DispatchError> {
        let chords = split_chords(keys);
        let mut report = PressReport::default();
        let mut i = 0usize;
        while i < chords.len() {
            match self.keymap.resolve(&chords[i..]) {
                Resolution::Matched {
                    consumed, command, ..
                } => {
                    let event = CommandEvent::with_text(&command, chords[i..i + consumed].concat());
                    let result = self.registry.dispatch(&command, &mut self.reader, Some(&event))?;
                    report.record(command, result);
                    i += consumed;
                }
                Resolution::NeedMore => {
                    report.pending = chords[i..].to_vec();
                    break;
                }
                Resolution::Unbound(chord) => {
                    if chord.chars().count() == 1 && self.registry.contains("self-insert") {
                        let event = CommandEvent::with_text("self-insert", chord.as_str());
                        let result =
                            self.registry.dispatch("self-insert", &mut self.reader, Some(&event))?;
                        report.record("self-insert".to_string(), result);
                    } else {
                        debug!(target: "keymap.resolve", chord = chord.as_str(), "unbound");
                        report.unbound.push(chord);
                    }
                    i += 1;
                }
            }
        }
        Ok(report)
    }
}

impl PressReport {
    fn record(&mut self, command: String, result: DispatchResult) {
        self.dispatched.push(command);
        self.notices.extend(result.notice);
        self.dirty |= result.dirty;
    }
}
