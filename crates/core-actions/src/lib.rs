//! Editing commands and the registry that names them.
//!
//! * `commands` - the text-command engine (indentation, dedent, line moves,
//!   paragraph motion)
//! * `builtin`  - static adapter table exposing engine and host commands
//! * `registry` - name -> handler map and dispatch

pub mod builtin;
pub mod commands;
pub mod registry;

pub use builtin::{Adapter, BUILTIN_COMMANDS};
pub use registry::{
    CommandEvent, CommandRegistry, DispatchError, DispatchResult, Handler, under_to_kebab,
};
