//! Configuration loading and parsing.
//!
//! Parses `hackline.toml` (or an override path provided by the binary):
//!
//! ```toml
//! [bindings]
//! "Ctrl+X Ctrl+D" = "dedent"
//!
//! [insert]
//! "Ctrl+P" = "print("
//!
//! [commands]
//! disabled = ["clear-screen"]
//! ```
//!
//! Every section is optional. Unknown fields are ignored so older binaries
//! accept newer files. A file that fails to parse is reported and replaced by
//! defaults; key strings are not validated here, that happens when the model
//! applies them.

use anyhow::Result;
use serde::Deserialize;
use std::{collections::BTreeMap, fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "hackline.toml";

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct CommandsConfig {
    /// Built-in commands that should not be registered.
    #[serde(default)]
    pub disabled: Vec<String>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    /// Key binding -> existing command name.
    #[serde(default)]
    pub bindings: BTreeMap<String, String>,
    /// Key binding -> literal text to insert.
    #[serde(default)]
    pub insert: BTreeMap<String, String>,
    #[serde(default)]
    pub commands: CommandsConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub file: ConfigFile,        // parsed (or default) data
    pub source: Option<PathBuf>, // path the data came from
}

impl Config {
    /// Parse configuration text directly.
    pub fn from_toml(content: &str) -> Result<Self> {
        let file = toml::from_str::<ConfigFile>(content)?;
        Ok(Self {
            file,
            source: None,
        })
    }

    /// Whether `[commands] disabled` names `command`.
    pub fn is_disabled(&self, command: &str) -> bool {
        self.file.commands.disabled.iter().any(|d| d == command)
    }
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("hackline").join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        info!(target: "config", path = %path.display(), "config_absent");
        return Ok(Config::default());
    };
    match Config::from_toml(&content) {
        Ok(mut cfg) => {
            info!(
                target: "config",
                path = %path.display(),
                bindings = cfg.file.bindings.len(),
                inserts = cfg.file.insert.len(),
                disabled = cfg.file.commands.disabled.len(),
                "config_loaded"
            );
            cfg.source = Some(path);
            Ok(cfg)
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
            Ok(Config::default())
        }
    }
}
