//! Reading single config layers from disk.

use super::{ConfigLayer, ConfigLayerSource, LoadedLayer, schema};
use crate::ConfigError;
use directories::UserDirs;
use log::debug;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Directory under home holding the user config next to the recall file.
const USER_CONFIG_DIR: &str = ".recall";
const CONFIG_FILE: &str = "config.json5";
#[cfg(unix)]
const SYSTEM_CONFIG_PATH: &str = "/etc/recall/config.json5";

/// Read and schema-check one layer.
///
/// A missing system or user file is `Ok(None)`. A missing `--config` file is
/// an error, since the user asked for it explicitly.
pub(super) fn read_layer(
    source: ConfigLayerSource,
    path: &Path,
) -> Result<Option<LoadedLayer>, ConfigError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            if source == ConfigLayerSource::Runtime {
                return Err(ConfigError::MissingRuntimeLayer(path.to_path_buf()));
            }
            debug!("no {} (path={})", layer_name(source), path.display());
            return Ok(None);
        }
        Err(err) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source: err,
            });
        }
    };

    let value: Value = json5::from_str(&contents).map_err(|err| ConfigError::Syntax {
        path: path.to_path_buf(),
        source: err,
    })?;
    schema::validate_layer_schema(&value, &layer_label(source, path))?;
    debug!("read {} (path={})", layer_name(source), path.display());
    Ok(Some(LoadedLayer {
        meta: ConfigLayer {
            source,
            path: path.to_path_buf(),
        },
        value,
    }))
}

fn layer_name(source: ConfigLayerSource) -> &'static str {
    match source {
        ConfigLayerSource::System => "system config",
        ConfigLayerSource::User => "user config",
        ConfigLayerSource::Runtime => "--config file",
    }
}

/// e.g. `user config /home/u/.recall/config.json5`
fn layer_label(source: ConfigLayerSource, path: &Path) -> String {
    format!("{} {}", layer_name(source), path.display())
}

/// `/etc/recall/config.json5`; recall has no system layer off Unix.
pub(super) fn system_config_path() -> Option<PathBuf> {
    #[cfg(unix)]
    {
        Some(PathBuf::from(SYSTEM_CONFIG_PATH))
    }
    #[cfg(not(unix))]
    {
        None
    }
}

/// `~/.recall/config.json5`, when the home directory is known.
pub(super) fn user_config_path() -> Option<PathBuf> {
    UserDirs::new().map(|dirs| dirs.home_dir().join(USER_CONFIG_DIR).join(CONFIG_FILE))
}
