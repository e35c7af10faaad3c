//! Command handlers for the `recall` CLI.
//!
//! Each handler loads the store, performs one operation, and persists the
//! whole record set. Load errors abort before anything is written.

use crate::cli::{Cli, Command};
use crate::editor::Editor;
use crate::format::{format_message, format_time};
use anyhow::{Context, bail};
use log::info;
use recall_rs_config::{HyperlinkMode, LayeredConfigOptions, RecallConfig};
use recall_rs_store::{MessagePolicy, Recall, RecallStore, path};
use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};

/// Everything a command needs to know about the current invocation.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Effective configuration.
    pub config: RecallConfig,
    /// Backing file for the recall store.
    pub store_path: PathBuf,
    /// Directory the command applies to.
    pub cwd: PathBuf,
    /// Print recall timestamps.
    pub verbose: bool,
    /// Render `f:` paths as terminal hyperlinks.
    pub hyperlinks: bool,
}

impl Invocation {
    /// Build the invocation from parsed arguments, config files, and the process cwd.
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let mut options = LayeredConfigOptions::default();
        if let Some(config) = &cli.config {
            options = options.with_runtime_path(config);
        }
        let layered = RecallConfig::load_layered_with_options(options)
            .context("failed to load config")?;
        let cwd = path::current_dir().context("failed to resolve current directory")?;
        Self::new(layered.config, cli.store.clone(), cwd, cli.verbose)
    }

    /// Build an invocation from explicit parts.
    ///
    /// The store location is, in order: `store_override`, `store.path` from
    /// config, then `~/.recall/recalls.jsonl`.
    pub fn new(
        config: RecallConfig,
        store_override: Option<PathBuf>,
        cwd: PathBuf,
        verbose: bool,
    ) -> anyhow::Result<Self> {
        let configured = store_override.or_else(|| {
            config
                .store
                .path
                .as_deref()
                .map(path::expand_home)
        });
        let store_path = match configured {
            Some(store_path) => path::resolve_against(&cwd, &store_path),
            None => RecallStore::default_path().context("failed to locate recall file")?,
        };
        let hyperlinks = match config.display.hyperlinks {
            HyperlinkMode::Auto => std::io::stdout().is_terminal(),
            HyperlinkMode::Always => true,
            HyperlinkMode::Never => false,
        };
        let verbose = verbose || config.display.show_time;
        Ok(Self {
            config,
            store_path,
            cwd,
            verbose,
            hyperlinks,
        })
    }

    fn policy(&self) -> MessagePolicy {
        MessagePolicy {
            single_line: self.config.messages.single_line,
        }
    }

    fn load_store(&self) -> anyhow::Result<RecallStore> {
        RecallStore::load(&self.store_path, &self.cwd).with_context(|| {
            format!("failed to load recalls from {}", self.store_path.display())
        })
    }

    fn editor(&self) -> anyhow::Result<Editor> {
        Editor::from_config(&self.config.editor)
    }

    /// Editor drafts live next to the recall file.
    fn scratch_dir(&self) -> &Path {
        self.store_path.parent().unwrap_or(self.cwd.as_path())
    }
}

/// Run one command, writing user-facing output to `out`.
pub fn run(command: Command, invocation: &Invocation, out: &mut dyn Write) -> anyhow::Result<()> {
    match command {
        Command::Show => show(invocation, out),
        Command::Set { message } => set(invocation, message, out),
        Command::Mod => modify(invocation, out),
        Command::Rm => remove(invocation, out),
        Command::List => list(invocation, out),
    }
}

/// Print the current recall. Persisting afterwards drops stale entries.
fn show(invocation: &Invocation, out: &mut dyn Write) -> anyhow::Result<()> {
    let store = invocation.load_store()?;
    match store.current_recall() {
        Some(recall) => write_recall(invocation, recall, out)?,
        None => {
            writeln!(out, "No recall set for this directory.")?;
            writeln!(out, "Set one with `recall set <message>`.")?;
        }
    }
    persist(&store)
}

fn set(invocation: &Invocation, words: Vec<String>, out: &mut dyn Write) -> anyhow::Result<()> {
    let mut store = invocation.load_store()?;
    let message = if words.is_empty() {
        invocation
            .editor()?
            .edit(invocation.scratch_dir(), "")
            .context("failed to read message from editor")?
    } else {
        words.join(" ")
    };
    invocation.policy().validate(&message)?;

    let replaced = store.has_current_recall();
    store.set_current_message(&message);
    persist(&store)?;
    info!("recall set (dir={}, replaced={replaced})", store.cwd());
    if replaced {
        writeln!(out, "Recall updated.")?;
    } else {
        writeln!(out, "Recall set.")?;
    }
    Ok(())
}

fn modify(invocation: &Invocation, out: &mut dyn Write) -> anyhow::Result<()> {
    let mut store = invocation.load_store()?;
    let Some(existing) = store.current_message().map(str::to_string) else {
        bail!("cannot modify the recall for this directory as there is no recall set");
    };
    let message = invocation
        .editor()?
        .edit(invocation.scratch_dir(), &existing)
        .context("failed to read message from editor")?;
    invocation.policy().validate(&message)?;

    store.set_current_message(&message);
    persist(&store)?;
    writeln!(out, "Recall updated.")?;
    Ok(())
}

fn remove(invocation: &Invocation, out: &mut dyn Write) -> anyhow::Result<()> {
    let mut store = invocation.load_store()?;
    let removed = store.delete_current();
    persist(&store)?;
    match removed {
        Some(_) => writeln!(out, "Recall removed.")?,
        None => writeln!(out, "No recall set for this directory.")?,
    }
    Ok(())
}

fn list(invocation: &Invocation, out: &mut dyn Write) -> anyhow::Result<()> {
    let store = invocation.load_store()?;
    if store.recalls().is_empty() {
        writeln!(out, "No recalls stored.")?;
    }
    for recall in store.recalls() {
        if invocation.verbose {
            writeln!(out, "{} ({})", recall.dir, format_time(recall.time))?;
        } else {
            writeln!(out, "{}", recall.dir)?;
        }
        let rendered = render(invocation, recall);
        for line in rendered.lines() {
            writeln!(out, "    {line}")?;
        }
    }
    persist(&store)
}

fn write_recall(invocation: &Invocation, recall: &Recall, out: &mut dyn Write) -> anyhow::Result<()> {
    if invocation.verbose {
        writeln!(out, "{}", format_time(recall.time))?;
    }
    writeln!(out, "{}", render(invocation, recall))?;
    Ok(())
}

fn render(invocation: &Invocation, recall: &Recall) -> String {
    format_message(&recall.msg, Path::new(&recall.dir), invocation.hyperlinks)
}

fn persist(store: &RecallStore) -> anyhow::Result<()> {
    store
        .persist()
        .with_context(|| format!("failed to write recalls to {}", store.path().display()))
}
