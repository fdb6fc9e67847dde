//! Authorization gates.
//!
//! A gate either passes silently or fails with a [`GateError`]. Neither gate
//! retries; the first failure short-circuits the request.

use subtle::ConstantTimeEq;

use crate::error::GateError;

#[cfg(feature = "remote")]
use std::time::Duration;

/// Default identity service base URL for token verification.
#[cfg(feature = "remote")]
pub const DEFAULT_VERIFIER_URL: &str = "https://iam.twilio.com";

/// Default timeout for verification requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Check a presented API key against the configured secret.
///
/// # Errors
///
/// `GateError::Unauthorized` if the key is absent or does not match,
/// `GateError::NotConfigured` if no secret is configured.
pub fn check_api_key(presented: Option<&str>, configured: Option<&str>) -> Result<(), GateError> {
    let presented = non_empty(presented).ok_or(GateError::Unauthorized)?;
    let configured = non_empty(configured).ok_or(GateError::NotConfigured)?;

    if bool::from(presented.as_bytes().ct_eq(configured.as_bytes())) {
        Ok(())
    } else {
        Err(GateError::Unauthorized)
    }
}

/// Verifies bearer credentials against an identity service.
pub trait TokenVerifier {
    /// Returns whether the service reports the token as valid.
    ///
    /// # Errors
    ///
    /// `GateError::Verification` when the service cannot be reached or answers
    /// with something other than a verdict.
    fn verify(&self, token: &str, account_sid: &str, auth_token: &str) -> Result<bool, GateError>;
}

/// Check a bearer credential using the account credentials and a verifier.
///
/// # Errors
///
/// `GateError::MissingToken` if any input is absent, `GateError::InvalidToken`
/// if the verifier rejects the credential, or the verifier's own error.
pub fn check_token(
    verifier: &dyn TokenVerifier,
    credential: Option<&str>,
    account_sid: Option<&str>,
    auth_token: Option<&str>,
) -> Result<(), GateError> {
    let (Some(credential), Some(account_sid), Some(auth_token)) = (
        non_empty(credential),
        non_empty(account_sid),
        non_empty(auth_token),
    ) else {
        return Err(GateError::MissingToken);
    };

    if verifier.verify(credential, account_sid, auth_token)? {
        Ok(())
    } else {
        Err(GateError::InvalidToken)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Token verifier backed by the identity service's token validation endpoint.
///
/// Sends `POST {base}/v1/Accounts/{account_sid}/Tokens/validate` with basic
/// auth and a `{"token": ...}` body; the answer carries a `valid` flag.
#[cfg(feature = "remote")]
#[derive(Debug, Clone)]
pub struct HttpTokenVerifier {
    base_url: String,
    client: reqwest::blocking::Client,
}

#[cfg(feature = "remote")]
#[derive(serde::Deserialize)]
struct VerifyResponse {
    valid: Option<bool>,
}

#[cfg(feature = "remote")]
impl HttpTokenVerifier {
    /// Verifier against the default identity service.
    pub fn new() -> Result<Self, GateError> {
        Self::with_base_url(DEFAULT_VERIFIER_URL)
    }

    /// Verifier against a custom base URL (e.g. a regional edge or a test server).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, GateError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(verification_error)?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(feature = "remote")]
impl TokenVerifier for HttpTokenVerifier {
    fn verify(&self, token: &str, account_sid: &str, auth_token: &str) -> Result<bool, GateError> {
        let url = format!(
            "{}/v1/Accounts/{}/Tokens/validate",
            self.base_url, account_sid
        );

        let response = self
            .client
            .post(&url)
            .basic_auth(account_sid, Some(auth_token))
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .json(&serde_json::json!({ "token": token }))
            .send()
            .map_err(verification_error)?;

        // Check for HTTP errors before parsing
        let response = response.error_for_status().map_err(verification_error)?;

        let verdict: VerifyResponse = response.json().map_err(verification_error)?;
        Ok(verdict.valid == Some(true))
    }
}

#[cfg(feature = "remote")]
fn verification_error(source: reqwest::Error) -> GateError {
    GateError::Verification {
        message: source.to_string(),
    }
}
