//! The `recall` command-line tool.
//!
//! Wires the record store and config crates to a small CLI: show, set, modify
//! and remove the note attached to the current directory.

pub mod cli;
pub mod commands;
pub mod editor;
pub mod format;

/// Re-export for convenience.
pub use recall_rs_config as config;
/// Re-export for convenience.
pub use recall_rs_store as store;
