//! hackline entrypoint.
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use core_config::{Config, load_from};
use core_keymap::{slugify, to_keyspec};
use core_model::ReplModel;
use core_state::{NormalizedText, Reader, ReaderState};
use std::any::Any;
use std::fs::File;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::Once;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "hackline.log";
const LOG_FILTER_ENV: &str = "HACKLINE_LOG";

#[derive(Parser, Debug)]
#[command(name = "hackline", version, about = "Line-editing commands and key bindings")]
struct Args {
    /// Configuration file path (overrides discovery of `hackline.toml`).
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Translate a key binding such as "Ctrl+X Ctrl+R" to the host key spec.
    Keyspec { keys: String },
    /// Print the command name generated for a key binding.
    Slug { keys: String },
    /// List registered command names.
    Commands,
    /// Apply commands, in order, to a text.
    Run {
        #[command(flatten)]
        input: InputArgs,
        #[arg(required = true)]
        commands: Vec<String>,
    },
    /// Feed keys through the configured bindings.
    Press {
        #[command(flatten)]
        input: InputArgs,
        /// Treat KEYS as a human-readable binding instead of a host key spec.
        #[arg(long)]
        binding: bool,
        keys: String,
    },
}

#[derive(clap::Args, Debug)]
struct InputArgs {
    /// Initial cursor offset in characters (defaults to end of text).
    #[arg(long)]
    cursor: Option<usize>,
    /// Read the text from a file instead of stdin.
    #[arg(long)]
    file: Option<PathBuf>,
}

/// Keeps the non-blocking log writer flushing until the process exits.
struct LogSession {
    _guard: Option<WorkerGuard>,
}

impl LogSession {
    /// Log to `hackline.log` in the working directory, replacing the previous
    /// run's file. Filter directives come from `HACKLINE_LOG`. When the file
    /// cannot be created, or a subscriber is already installed, nothing is
    /// logged.
    fn start() -> Self {
        let Ok(file) = File::create(LOG_FILE) else {
            return Self { _guard: None };
        };
        let filter =
            EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
        let (writer, guard) = tracing_appender::non_blocking(file);
        let installed = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .try_init()
            .is_ok();
        Self {
            _guard: installed.then_some(guard),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

/// Record panics in the log before the default hook prints them.
fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let location = info.location().map(|l| format!("{}:{}", l.file(), l.line()));
            tracing::error!(
                target: "runtime.panic",
                location = location.as_deref(),
                message = panic_message(info.payload()),
                "panic"
            );
            previous(info);
        }));
    });
}

fn read_source(input: &InputArgs) -> Result<String> {
    match &input.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("reading stdin")?;
            Ok(text)
        }
    }
}

/// Build the model for `text`, reporting rejected config entries to `err`.
/// `cursor` counts characters of `text` as read, before line endings are
/// normalized.
fn build_model(
    text: &str,
    cursor: Option<usize>,
    config: &Config,
    err: &mut impl Write,
) -> Result<(ReplModel, NormalizedText)> {
    let (reader, norm) = ReaderState::from_source(text, cursor);
    if norm.mixed {
        warn!(target: "runtime", original = ?norm.original, "mixed_line_endings");
    }
    let (model, rejected) = ReplModel::from_config(reader, config);
    for (keys, e) in rejected {
        writeln!(err, "hackline: ignoring {keys:?}: {e}")?;
    }
    Ok((model, norm))
}

fn write_result(
    model: &ReplModel,
    norm: &NormalizedText,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<()> {
    let reader = model.reader();
    let text = reader.text();
    out.write_all(norm.restore(&text).as_bytes())?;
    writeln!(err, "cursor: {}", norm.to_restored(&text, reader.cursor()))?;
    Ok(())
}

fn execute(
    command: &Command,
    config: &Config,
    source: Option<&str>,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<()> {
    match command {
        Command::Keyspec { keys } => {
            let spec = to_keyspec(keys).with_context(|| format!("translating {keys:?}"))?;
            writeln!(out, "{spec}")?;
        }
        Command::Slug { keys } => {
            writeln!(out, "{}", slugify(keys))?;
        }
        Command::Commands => {
            let (model, _) = build_model("", None, config, err)?;
            for name in model.registry().names() {
                writeln!(out, "{name}")?;
            }
        }
        Command::Run { input, commands } => {
            let text = source.unwrap_or_default();
            let (mut model, norm) = build_model(text, input.cursor, config, err)?;
            for name in commands {
                let result = model.run(name)?;
                if let Some(notice) = result.notice {
                    writeln!(err, "{name}: {notice}")?;
                }
            }
            write_result(&model, &norm, out, err)?;
        }
        Command::Press {
            input,
            binding,
            keys,
        } => {
            let text = source.unwrap_or_default();
            let (mut model, norm) = build_model(text, input.cursor, config, err)?;
            let spec = if *binding {
                to_keyspec(keys).with_context(|| format!("translating {keys:?}"))?
            } else {
                keys.clone()
            };
            let report = model.press(&spec)?;
            info!(
                target: "runtime",
                dispatched = report.dispatched.len(),
                unbound = report.unbound.len(),
                "press_complete"
            );
            for notice in &report.notices {
                writeln!(err, "{notice}")?;
            }
            for chord in &report.unbound {
                writeln!(err, "unbound: {chord}")?;
            }
            if !report.pending.is_empty() {
                writeln!(err, "pending: {}", report.pending.concat())?;
            }
            write_result(&model, &norm, out, err)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let _logs = LogSession::start();
    install_panic_hook();

    let args = Args::parse();
    info!(target: "runtime", command = ?args.command, "startup");
    if let Some(path) = &args.config
        && !path.exists()
    {
        bail!("config file {} does not exist", path.display());
    }
    let config = load_from(args.config.clone())?;

    let source = match &args.command {
        Command::Run { input, .. } | Command::Press { input, .. } => Some(read_source(input)?),
        _ => None,
    };

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    execute(
        &args.command,
        &config,
        source.as_deref(),
        &mut stdout.lock(),
        &mut stderr.lock(),
    )
}
