//! Response envelopes with fixed CORS headers.

use serde::Serialize;
use serde_json::{json, Value};

/// Headers attached to every response.
pub const CORS_HEADERS: &[(&str, &str)] = &[
    ("Content-Type", "application/json"),
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, POST, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type, Authorization"),
];

/// Status used by error envelopes that don't name one.
pub const DEFAULT_ERROR_STATUS: u16 = 500;

/// Response handed back to the hosting runtime.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status_code: u16,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    /// Empty 200 response carrying the CORS headers.
    pub fn new() -> Self {
        Self {
            status_code: 200,
            headers: CORS_HEADERS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: Value::Null,
        }
    }

    /// 200 response with a body.
    pub fn with_body(body: Value) -> Self {
        let mut response = Self::new();
        response.set_body(body);
        response
    }

    pub fn set_status_code(&mut self, code: u16) {
        self.status_code = code;
    }

    pub fn set_body(&mut self, body: Value) {
        self.body = body;
    }

    pub fn append_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    /// First header value with the given name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Options for [`error_response`].
#[derive(Debug, Clone, Default)]
pub struct ErrorResponseOptions {
    /// Structured error detail.
    pub error: Option<Value>,
    /// Human-readable summary.
    pub message: Option<String>,
    /// Status code, 500 when absent.
    pub code: Option<u16>,
}

/// Build an error envelope with body `{ "error": ..., "message": ... }`.
pub fn error_response(options: ErrorResponseOptions) -> Response {
    let ErrorResponseOptions {
        error,
        message,
        code,
    } = options;

    let mut response = Response::new();
    response.set_status_code(code.unwrap_or(DEFAULT_ERROR_STATUS));
    response.set_body(json!({
        "error": error,
        "message": message,
    }));
    response
}
