//! Loading JSON documents (schema descriptions, events, payloads).

use std::path::Path;

use serde_json::Value;

use crate::error::LoadError;
use crate::types::SchemaNode;

/// Load a JSON document from a file path.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// or `LoadError::InvalidJson` if the file isn't valid JSON.
pub fn load_json(path: &Path) -> Result<Value, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    load_json_str(&content)
}

/// Load a JSON document from a string.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` if the string isn't valid JSON.
pub fn load_json_str(content: &str) -> Result<Value, LoadError> {
    serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })
}

/// Load and parse a schema description from a file path.
///
/// # Errors
///
/// Returns the `load_json` errors, or `LoadError::Schema` if the
/// description is malformed.
pub fn load_schema(path: &Path) -> Result<SchemaNode, LoadError> {
    let description = load_json(path)?;
    Ok(SchemaNode::from_value(&description)?)
}

/// Parse a schema description from a JSON string.
pub fn load_schema_str(content: &str) -> Result<SchemaNode, LoadError> {
    let description = load_json_str(content)?;
    Ok(SchemaNode::from_value(&description)?)
}
