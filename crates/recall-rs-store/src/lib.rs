//! Directory-keyed recall storage.
//!
//! A recall is a short note attached to an absolute directory path. This crate
//! owns the record model, the JSON Lines codec used for the backing file, the
//! path helpers that normalize and validate directory keys, and the store that
//! looks up and mutates the recall for the current directory.

pub mod codec;
pub mod error;
pub mod path;
pub mod record;
pub mod store;

/// Recall error type.
pub use error::RecallError;
/// Recall record and message entry policy.
pub use record::{MessagePolicy, Recall};
/// Store keyed by the current directory.
pub use store::RecallStore;
