//! Error types for recall storage.

/// Errors returned by the path resolver, codec, and store.
#[derive(Debug, thiserror::Error)]
pub enum RecallError {
    /// A path could not be resolved to a usable absolute directory.
    #[error("path resolution failed: {0}")]
    Resolution(String),
    /// The backing file does not follow the record grammar.
    #[error("malformed record at line {line}: {message}")]
    MalformedRecord { line: usize, message: String },
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    /// Message rejected by the entry policy.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
