//! Function context: secrets injected by the hosting runtime.

/// Environment variable holding the static API key.
pub const API_KEY_VAR: &str = "API_KEY";
/// Environment variable holding the account identifier for token checks.
pub const ACCOUNT_SID_VAR: &str = "ACCOUNT_SID";
/// Environment variable holding the account secret for token checks.
pub const AUTH_TOKEN_VAR: &str = "AUTH_TOKEN";

/// Secrets available to a function invocation. Every field is optional;
/// the gates decide what an absent secret means.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionContext {
    pub api_key: Option<String>,
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
}

impl FunctionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the context from the process environment.
    ///
    /// Empty variables are treated as unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the context from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| lookup(name).filter(|v| !v.is_empty());
        Self {
            api_key: read(API_KEY_VAR),
            account_sid: read(ACCOUNT_SID_VAR),
            auth_token: read(AUTH_TOKEN_VAR),
        }
    }

    /// Keep the secrets set here and take the rest from `fallback`.
    pub fn or(self, fallback: FunctionContext) -> Self {
        let pick = |own: Option<String>, other: Option<String>| {
            own.filter(|v| !v.is_empty()).or(other)
        };
        Self {
            api_key: pick(self.api_key, fallback.api_key),
            account_sid: pick(self.account_sid, fallback.account_sid),
            auth_token: pick(self.auth_token, fallback.auth_token),
        }
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn account(mut self, account_sid: impl Into<String>, auth_token: impl Into<String>) -> Self {
        self.account_sid = Some(account_sid.into());
        self.auth_token = Some(auth_token.into());
        self
    }
}
