//! Command-line arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Leave a note for yourself in a directory and see it again when you come back.
///
/// Without a subcommand, the recall for the current directory is shown.
#[derive(Debug, Parser)]
#[command(name = "recall", version)]
pub struct Cli {
    /// Also print when the recall was last set
    #[arg(short, long, global = true)]
    pub verbose: bool,
    /// Extra config file applied over the user config
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Recall file to use instead of the configured one
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show the recall for the current directory
    Show,
    /// Set the recall for the current directory, overwriting any existing one.
    ///
    /// Without a message, an editor is opened to write it in.
    Set {
        /// Message words, joined with single spaces
        message: Vec<String>,
    },
    /// Edit the existing recall for the current directory in an editor
    #[command(alias = "modify")]
    Mod,
    /// Remove the recall for the current directory
    #[command(alias = "remove")]
    Rm,
    /// List every stored recall
    List,
}
