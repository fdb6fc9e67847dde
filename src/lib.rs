//! Request Guard
//!
//! Request-handling glue for serverless functions: authorization gates,
//! CORS response envelopes, and validation of inbound payloads against small
//! schema descriptions.
//!
//! # Example
//!
//! ```
//! use request_guard::{validate, SchemaNode};
//! use serde_json::json;
//!
//! let schema = SchemaNode::from_value(&json!({
//!     "name": { "type": "string", "required": true },
//!     "items": [{ "sku": { "type": "string", "required": true } }]
//! }))
//! .unwrap();
//!
//! let result = validate(&schema, &json!({ "name": "order", "items": [{ "sku": "A1" }, {}] }));
//!
//! // Nested object items are kept even when they fail
//! assert_eq!(result.data, json!({ "name": "order", "items": [{ "sku": "A1" }, {}] }));
//! assert_eq!(result.errors, vec!["sku is required"]);
//! assert!(!result.is_valid);
//! ```
//!
//! # Description Language
//!
//! | Shape | Meaning |
//! |-------|---------|
//! | `{ "type": "string", "required": true }` | Scalar field (`string`, `number`, `boolean`) |
//! | `{ "name": <node>, ... }` | Object; unknown input keys are ignored |
//! | `[ <node> ]` | Zero or more items, each matching `<node>` |
//!
//! # Field Rule
//!
//! | Value | `required: true` | `required: false` |
//! |-------|------------------|-------------------|
//! | missing or `null` | error, omitted | omitted |
//! | wrong type | error, omitted | error, omitted |
//! | right type | kept | kept |

mod auth;
mod config;
mod error;
mod handler;
mod linter;
mod loader;
mod response;
mod schema;
mod types;
mod validator;

pub use auth::{check_api_key, check_token, TokenVerifier};
pub use config::{FunctionContext, ACCOUNT_SID_VAR, API_KEY_VAR, AUTH_TOKEN_VAR};
pub use error::{GateError, LoadError, SchemaError};
pub use handler::{handle, Event, Gate, API_KEY_HEADER, AUTHORIZATION_HEADER};
pub use linter::{
    lint, lint_file, meta_schema, Diagnostic, FileResult, FileStatus, LintResult, Severity,
};
pub use loader::{load_json, load_json_str, load_schema, load_schema_str};
pub use response::{error_response, ErrorResponseOptions, Response, CORS_HEADERS};
pub use types::{json_type_name, FieldSchema, FieldType, SchemaNode, ValidationResult};
pub use validator::validate;

#[cfg(feature = "remote")]
pub use auth::{HttpTokenVerifier, DEFAULT_VERIFIER_URL};
