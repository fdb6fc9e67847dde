//! Token verification against a mock identity service.

#![cfg(feature = "remote")]

use mockito::Matcher;
use request_guard::{check_token, GateError, HttpTokenVerifier, TokenVerifier};

const PATH: &str = "/v1/Accounts/AC123/Tokens/validate";

fn verifier(server: &mockito::Server) -> HttpTokenVerifier {
    HttpTokenVerifier::with_base_url(server.url()).unwrap()
}

#[test]
fn sends_basic_auth_and_token_body() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", PATH)
        // base64("AC123:secret")
        .match_header("authorization", "Basic QUMxMjM6c2VjcmV0")
        .match_body(Matcher::Json(serde_json::json!({ "token": "jwt-value" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"valid":true,"expiration":"2026-01-01T00:00:00Z"}"#)
        .create();

    let valid = verifier(&server).verify("jwt-value", "AC123", "secret").unwrap();
    assert!(valid);
    mock.assert();
}

#[test]
fn invalid_verdict_rejects() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", PATH)
        .with_status(200)
        .with_body(r#"{"valid":false,"message":"expired"}"#)
        .create();

    let err = check_token(&verifier(&server), Some("jwt"), Some("AC123"), Some("secret"))
        .unwrap_err();
    assert!(matches!(err, GateError::InvalidToken));
    mock.assert();
}

#[test]
fn missing_verdict_rejects() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", PATH)
        .with_status(200)
        .with_body("{}")
        .create();

    let err = check_token(&verifier(&server), Some("jwt"), Some("AC123"), Some("secret"))
        .unwrap_err();
    assert!(matches!(err, GateError::InvalidToken));
}

#[test]
fn http_error_is_verification_failure() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", PATH)
        .with_status(403)
        .with_body(r#"{"message":"forbidden"}"#)
        .create();

    let err = verifier(&server).verify("jwt", "AC123", "secret").unwrap_err();
    assert!(matches!(err, GateError::Verification { .. }));
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn trailing_slash_in_base_url() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", PATH)
        .with_status(200)
        .with_body(r#"{"valid":true}"#)
        .create();

    let verifier = HttpTokenVerifier::with_base_url(format!("{}/", server.url())).unwrap();
    assert_eq!(verifier.base_url(), server.url());
    assert!(verifier.verify("jwt", "AC123", "secret").unwrap());
    mock.assert();
}

#[test]
fn missing_inputs_never_call_service() {
    let mut server = mockito::Server::new();
    let mock = server.mock("POST", PATH).expect(0).create();

    let err = check_token(&verifier(&server), None, Some("AC123"), Some("secret")).unwrap_err();
    assert!(matches!(err, GateError::MissingToken));
    mock.assert();
}
