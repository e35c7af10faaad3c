//! Schema validation helpers for recall JSON5 configuration.

use crate::ConfigError;
use serde_json::{Map, Value};

/// Validate a single config layer against the schema.
pub(super) fn validate_layer_schema(value: &Value, layer: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, "")?;
    let allowed = ["$schema", "store", "editor", "messages", "display"];
    ensure_allowed_keys(map, &allowed, layer, "")?;

    if let Some(value) = map.get("$schema") {
        expect_string(value, layer, "$schema")?;
    }
    if let Some(value) = map.get("store") {
        validate_store(value, layer, "store")?;
    }
    if let Some(value) = map.get("editor") {
        validate_editor(value, layer, "editor")?;
    }
    if let Some(value) = map.get("messages") {
        validate_messages(value, layer, "messages")?;
    }
    if let Some(value) = map.get("display") {
        validate_display(value, layer, "display")?;
    }

    Ok(())
}

/// Validate the "store" block.
fn validate_store(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["path"], layer, path)?;

    if let Some(value) = map.get("path") {
        expect_string(value, layer, &join_path(path, "path"))?;
    }
    Ok(())
}

/// Validate the "editor" block.
fn validate_editor(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["command"], layer, path)?;

    if let Some(value) = map.get("command") {
        expect_string(value, layer, &join_path(path, "command"))?;
    }
    Ok(())
}

/// Validate the "messages" block.
fn validate_messages(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["single_line"], layer, path)?;

    if let Some(value) = map.get("single_line") {
        expect_bool(value, layer, &join_path(path, "single_line"))?;
    }
    Ok(())
}

/// Validate the "display" block.
fn validate_display(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["hyperlinks", "show_time"], layer, path)?;

    if let Some(value) = map.get("hyperlinks") {
        validate_hyperlink_mode(value, layer, &join_path(path, "hyperlinks"))?;
    }
    if let Some(value) = map.get("show_time") {
        expect_bool(value, layer, &join_path(path, "show_time"))?;
    }
    Ok(())
}

fn validate_hyperlink_mode(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let Some(mode) = value.as_str() else {
        return Err(invalid_field(layer, path, "expected string"));
    };
    if matches!(mode, "auto" | "always" | "never") {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "invalid hyperlink mode"))
    }
}

/// Expect a JSON object or return a typed error.
fn expect_object<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(invalid_field(layer, path, "expected object")),
    }
}

/// Expect a JSON string or return a typed error.
fn expect_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.as_str().is_some() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected string"))
    }
}

/// Expect a JSON boolean or return a typed error.
fn expect_bool(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if matches!(value, Value::Bool(_)) {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected bool"))
    }
}

/// Ensure an object contains only allowed keys.
fn ensure_allowed_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    for key in map.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(invalid_field(layer, &join_path(path, key), "unknown key"));
        }
    }
    Ok(())
}

/// Join nested paths for better error messages.
fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn invalid_field(layer: &str, path: &str, message: &str) -> ConfigError {
    let key = if path.is_empty() { "<root>" } else { path };
    ConfigError::InvalidField {
        layer: layer.to_string(),
        key: key.to_string(),
        message: message.to_string(),
    }
}
