//! Error types for schema loading and request gating.
//!
//! Validation failures are deliberately absent here: they are reported as
//! entries of [`ValidationResult::errors`](crate::ValidationResult), never as `Err`.

use std::path::PathBuf;
use thiserror::Error;

/// Errors turning a JSON description into a [`SchemaNode`](crate::SchemaNode).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("invalid schema node at {path}: expected object or array, got {actual}")]
    InvalidNode { path: String, actual: String },

    #[error("array schema at {path} must wrap exactly one element, found {found}")]
    ArrayArity { path: String, found: usize },

    #[error("array schema at {path} wraps another array; arrays of arrays are not supported")]
    NestedArray { path: String },

    #[error("unknown field type \"{value}\" at {path}: expected string, number, or boolean")]
    UnknownType { path: String, value: String },

    #[error("invalid \"required\" at {path}: expected boolean, got {actual}")]
    InvalidRequired { path: String, actual: String },
}

impl SchemaError {
    /// JSON Pointer (RFC 6901) of the offending node.
    pub fn path(&self) -> &str {
        match self {
            SchemaError::InvalidNode { path, .. }
            | SchemaError::ArrayArity { path, .. }
            | SchemaError::NestedArray { path }
            | SchemaError::UnknownType { path, .. }
            | SchemaError::InvalidRequired { path, .. } => path,
        }
    }
}

/// Errors loading JSON documents from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            _ => 2,
        }
    }
}

/// Authorization gate failures.
///
/// The display strings double as the `error` detail of 401 responses.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("API key not configured")]
    NotConfigured,

    #[error("Token is required.")]
    MissingToken,

    #[error("Invalid token.")]
    InvalidToken,

    #[error("token verification failed: {message}")]
    Verification { message: String },
}

impl GateError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            GateError::Verification { .. } => 3, // IO
            _ => 1,
        }
    }
}
