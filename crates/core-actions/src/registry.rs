//! Named command registry.
//!
//! Commands are looked up by name at dispatch time. Registering a name twice
//! replaces the earlier handler, so user commands can shadow built-ins.

use crate::builtin::BUILTIN_COMMANDS;
use core_state::{Notice, Reader};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::{debug, trace};

/// The event that triggered a command: the command name it resolved to and
/// the raw key text that was pressed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandEvent {
    pub name: String,
    pub text: String,
}

impl CommandEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: String::new(),
        }
    }

    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

type PlainFn = dyn Fn(&mut dyn Reader) -> Option<Notice>;
type EventFn = dyn Fn(&mut dyn Reader, &CommandEvent) -> Option<Notice>;

/// A registered command body.
pub enum Handler {
    Plain(Box<PlainFn>),
    WithEvent(Box<EventFn>),
}

impl Handler {
    pub fn plain<F>(f: F) -> Self
    where
        F: Fn(&mut dyn Reader) -> Option<Notice> + 'static,
    {
        Handler::Plain(Box::new(f))
    }

    pub fn with_event<F>(f: F) -> Self
    where
        F: Fn(&mut dyn Reader, &CommandEvent) -> Option<Notice> + 'static,
    {
        Handler::WithEvent(Box::new(f))
    }

    fn call(&self, reader: &mut dyn Reader, event: &CommandEvent) -> Option<Notice> {
        match self {
            Handler::Plain(f) => f(reader),
            Handler::WithEvent(f) => f(reader, event),
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Plain(_) => f.write_str("Handler::Plain"),
            Handler::WithEvent(_) => f.write_str("Handler::WithEvent"),
        }
    }
}

/// Result of dispatching a single command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    /// The reader's dirty or render-cache flag is set after the command ran.
    /// Cursor-only motions leave it alone; the flags are cleared by the host.
    pub dirty: bool,
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),
}

/// `snake_case` function name -> `kebab-case` command name.
pub fn under_to_kebab(name: &str) -> String {
    name.replace('_', "-")
}

#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Handler>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in command.
    pub fn with_builtins() -> Self {
        Self::with_builtins_where(|_| true)
    }

    /// Registry holding the built-ins for which `keep` returns `true`.
    pub fn with_builtins_where(keep: impl Fn(&str) -> bool) -> Self {
        let mut registry = Self::new();
        for (name, adapter) in BUILTIN_COMMANDS {
            if !keep(*name) {
                debug!(target: "actions.registry", name, "builtin_disabled");
                continue;
            }
            registry.register(*name, Handler::WithEvent(Box::new(*adapter)));
        }
        registry
    }

    /// Insert or replace a command. Returns `true` when an earlier command of
    /// the same name was replaced.
    pub fn register(&mut self, name: impl Into<String>, handler: Handler) -> bool {
        let name = name.into();
        trace!(target: "actions.registry", name = name.as_str(), ?handler, "register");
        self.commands.insert(name, handler).is_some()
    }

    /// Register under the kebab-cased form of a function name and return the
    /// command name used.
    pub fn register_fn(&mut self, function_name: &str, handler: Handler) -> String {
        let name = under_to_kebab(function_name);
        self.register(name.clone(), handler);
        name
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Registered command names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Run `name` against `reader`. Without an explicit event the command
    /// sees an event carrying its own name and no text.
    pub fn dispatch(
        &self,
        name: &str,
        reader: &mut dyn Reader,
        event: Option<&CommandEvent>,
    ) -> Result<DispatchResult, DispatchError> {
        let handler = self
            .commands
            .get(name)
            .ok_or_else(|| DispatchError::UnknownCommand(name.to_string()))?;
        let fallback;
        let event = match event {
            Some(e) => e,
            None => {
                fallback = CommandEvent::new(name);
                &fallback
            }
        };
        let notice = handler.call(reader, event);
        let dirty = reader.needs_redraw();
        trace!(
            target: "actions.dispatch",
            name,
            dirty,
            notice = ?notice,
            cursor = reader.cursor(),
            "dispatched"
        );
        Ok(DispatchResult { dirty, notice })
    }
}
