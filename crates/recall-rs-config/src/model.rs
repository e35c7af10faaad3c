//! Configuration schema for recall.

use serde::{Deserialize, Serialize};

/// Root config for the recall CLI.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct RecallConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub messages: MessagesConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Location of the recall backing file.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct StoreConfig {
    /// Overrides `~/.recall/recalls.jsonl`. A leading `~/` is expanded.
    #[serde(default)]
    pub path: Option<String>,
}

/// External editor used when a message is not given on the command line.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct EditorConfig {
    /// Editor command line; falls back to `$VISUAL`, `$EDITOR`, then `vi`.
    #[serde(default)]
    pub command: Option<String>,
}

/// Entry rules for recall messages.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct MessagesConfig {
    #[serde(default)]
    pub single_line: bool,
}

/// Output options for displaying recalls.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct DisplayConfig {
    #[serde(default)]
    pub hyperlinks: HyperlinkMode,
    /// Print when the recall was last set.
    #[serde(default)]
    pub show_time: bool,
}

/// When `f:` paths in messages are rendered as terminal hyperlinks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HyperlinkMode {
    /// Only when stdout is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}
