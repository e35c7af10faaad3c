//! Layered configuration loader.
//!
//! Discovers configuration layers (system, user, runtime overrides), validates
//! each against the schema, merges them in precedence order, and produces the
//! final `RecallConfig`.

mod layer_io;
mod merge;
mod schema;


use crate::{ConfigError, RecallConfig};
use log::{debug, info};
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Effective config plus metadata about which layers were loaded.
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// The merged, validated config.
    pub config: RecallConfig,
    /// Metadata for each layer that contributed.
    pub layers: Vec<ConfigLayer>,
}

/// Origin for a single config layer in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayerSource {
    /// System-wide configuration.
    System,
    /// User-specific configuration.
    User,
    /// Runtime overrides (highest precedence).
    Runtime,
}

/// Metadata about a loaded config layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLayer {
    /// Layer origin.
    pub source: ConfigLayerSource,
    /// Location on disk.
    pub path: PathBuf,
}

/// Options controlling layered config discovery and overrides.
#[derive(Debug, Clone)]
pub struct LayeredConfigOptions {
    /// Optional system config path (defaults to `/etc/recall/config.json5` on Unix).
    pub system_config_path: Option<PathBuf>,
    /// Optional user config path (defaults to `~/.recall/config.json5`).
    pub user_config_path: Option<PathBuf>,
    /// Runtime override config paths applied last. These must exist.
    pub runtime_paths: Vec<PathBuf>,
}

impl Default for LayeredConfigOptions {
    fn default() -> Self {
        Self {
            system_config_path: layer_io::system_config_path(),
            user_config_path: layer_io::user_config_path(),
            runtime_paths: Vec::new(),
        }
    }
}

impl LayeredConfigOptions {
    /// Add a runtime override config path that is applied last.
    pub fn with_runtime_path(mut self, path: impl AsRef<Path>) -> Self {
        self.runtime_paths.push(path.as_ref().to_path_buf());
        self
    }
}

impl RecallConfig {
    /// Load a layered config stack using explicit layer locations.
    ///
    /// Layer precedence (low -> high): system, user, runtime overrides.
    /// Missing system and user files are skipped; runtime files are required.
    pub fn load_layered_with_options(
        options: LayeredConfigOptions,
    ) -> Result<LayeredConfig, ConfigError> {
        let mut layers = Vec::new();
        let mut merged = Value::Object(serde_json::Map::new());
        let mut seen_paths = HashSet::new();

        let candidates = options
            .system_config_path
            .map(|path| (ConfigLayerSource::System, path))
            .into_iter()
            .chain(
                options
                    .user_config_path
                    .map(|path| (ConfigLayerSource::User, path)),
            )
            .chain(
                options
                    .runtime_paths
                    .into_iter()
                    .map(|path| (ConfigLayerSource::Runtime, path)),
            );
        for (source, path) in candidates {
            let Some(layer) = layer_io::read_layer(source, &path)? else {
                continue;
            };
            // The same file reached twice (e.g. a symlinked home) is merged once.
            if source != ConfigLayerSource::Runtime && !seen_paths.insert(same_file_key(&path)) {
                debug!(
                    "skipping duplicate layer (source={source:?}, path={})",
                    path.display()
                );
                continue;
            }
            merge::merge_json_values(&mut merged, &layer.value);
            layers.push(layer.meta);
        }

        let config = config_from_value(merged, "merged config")?;
        info!("layered config loaded (layers={})", layers.len());
        Ok(LayeredConfig { config, layers })
    }

    /// Validate configuration invariants that cannot be expressed in serde.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.store.path {
            if path.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "store.path must not be empty".to_string(),
                ));
            }
        }
        if let Some(command) = &self.editor.command {
            if command.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "editor.command must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Internal representation of a loaded config layer.
#[derive(Debug, Clone)]
struct LoadedLayer {
    meta: ConfigLayer,
    value: Value,
}

fn same_file_key(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

fn config_from_value(value: Value, label: &str) -> Result<RecallConfig, ConfigError> {
    schema::validate_layer_schema(&value, label)?;
    let config: RecallConfig = serde_json::from_value(value)?;
    config.validate()?;
    Ok(config)
}
