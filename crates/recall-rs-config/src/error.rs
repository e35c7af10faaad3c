//! Errors raised while reading recall config files.

use std::path::PathBuf;
use thiserror::Error;

/// Why the recall config could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file exists but could not be read.
    #[error("cannot read recall config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A file passed with `--config` does not exist.
    #[error("recall config {} passed with --config does not exist", .0.display())]
    MissingRuntimeLayer(PathBuf),
    /// A config file is not valid JSON5.
    #[error("recall config {} is not valid JSON5: {source}", .path.display())]
    Syntax {
        path: PathBuf,
        source: json5::Error,
    },
    /// The merged settings do not fit the config model.
    #[error("recall config has an unexpected shape: {0}")]
    Shape(#[from] serde_json::Error),
    /// A setting failed schema validation in one layer.
    #[error("bad recall setting `{key}` in {layer}: {message}")]
    InvalidField {
        layer: String,
        key: String,
        message: String,
    },
    /// A setting is well-typed but unusable.
    #[error("bad recall setting: {0}")]
    Invalid(String),
}
