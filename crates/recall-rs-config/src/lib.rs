//! Configuration model and layered config loading for recall.
//!
//! Config files are JSON5. Layers are validated against a small schema before
//! merging so that typos surface with the offending layer and field named.

mod error;
mod loader;
mod model;

/// Public error type returned by config loading and validation APIs.
pub use error::ConfigError;
/// Layered config types and loader options.
pub use loader::{ConfigLayer, ConfigLayerSource, LayeredConfig, LayeredConfigOptions};
/// Configuration schema models.
pub use model::*;
