//! Function handlers: gate the request, validate its payload, answer.
//!
//! Every path produces a [`Response`]; nothing is retried and the first
//! failure decides the answer:
//!
//! | Outcome | Status | `message` | `error` |
//! |---------|--------|-----------|---------|
//! | API key rejected | 401 | `Unauthorized.` | gate error text |
//! | Token rejected | 401 | `Invalid token.` | gate error text |
//! | Payload invalid | 400 | `Invalid data.` | list of validation errors |
//! | Success | 200 | | body is the sanitized payload |

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::auth::{check_api_key, check_token, TokenVerifier};
use crate::config::FunctionContext;
use crate::error::GateError;
use crate::response::{error_response, ErrorResponseOptions, Response};
use crate::types::SchemaNode;
use crate::validator::validate;

/// Header carrying the static API key.
pub const API_KEY_HEADER: &str = "x-api-key";
/// Header carrying the bearer credential.
pub const AUTHORIZATION_HEADER: &str = "authorization";

/// An inbound request as delivered by the hosting runtime.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub body: Value,
}

impl Event {
    pub fn new(body: Value) -> Self {
        Self {
            headers: BTreeMap::new(),
            body,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// How a function authorizes its callers.
#[derive(Clone, Copy)]
pub enum Gate<'a> {
    /// Static key in the `x-api-key` header.
    ApiKey,
    /// Bearer credential in the `authorization` header, checked by a verifier.
    Token(&'a dyn TokenVerifier),
}

impl Gate<'_> {
    fn check(&self, context: &FunctionContext, event: &Event) -> Result<(), GateError> {
        match self {
            Gate::ApiKey => {
                check_api_key(event.header(API_KEY_HEADER), context.api_key.as_deref())
            }
            Gate::Token(verifier) => check_token(
                *verifier,
                event.header(AUTHORIZATION_HEADER),
                context.account_sid.as_deref(),
                context.auth_token.as_deref(),
            ),
        }
    }

    fn rejection_message(&self) -> &'static str {
        match self {
            Gate::ApiKey => "Unauthorized.",
            Gate::Token(_) => "Invalid token.",
        }
    }
}

/// Run one function invocation.
pub fn handle(
    gate: Gate<'_>,
    context: &FunctionContext,
    schema: &SchemaNode,
    event: &Event,
) -> Response {
    if let Err(e) = gate.check(context, event) {
        tracing::warn!(error = %e, "request rejected by gate");
        return error_response(ErrorResponseOptions {
            error: Some(Value::String(e.to_string())),
            message: Some(gate.rejection_message().to_string()),
            code: Some(401),
        });
    }

    let result = validate(schema, &event.body);
    tracing::debug!(
        is_valid = result.is_valid,
        errors = ?result.errors,
        "validated request payload"
    );

    if !result.is_valid {
        return error_response(ErrorResponseOptions {
            error: Some(Value::from(result.errors)),
            message: Some("Invalid data.".to_string()),
            code: Some(400),
        });
    }

    Response::with_body(result.data)
}
