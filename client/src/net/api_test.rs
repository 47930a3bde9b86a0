use super::*;

fn user_value() -> serde_json::Value {
    serde_json::json!({
        "id": "6f1c1f8e-2f4b-4a7e-9d1a-0b3c5d7e9f11",
        "email": "ada@example.com",
        "name": null,
        "createdAt": "2025-01-02T03:04:05Z",
        "updatedAt": "2025-01-02T03:04:05Z",
    })
}

// =============================================================
// parse_envelope
// =============================================================

#[test]
fn parse_success_envelope() {
    let body = serde_json::json!({ "result": { "data": { "user": user_value(), "token": "abc" } } }).to_string();
    let payload: AuthPayload = parse_envelope(200, &body).unwrap();
    assert_eq!(payload.token, "abc");
    assert_eq!(payload.user.email, "ada@example.com");
}

#[test]
fn parse_error_envelope_to_rpc_error() {
    let body = serde_json::json!({
        "error": { "code": "CONFLICT", "message": "User already exists", "httpStatus": 409 }
    })
    .to_string();
    let err = parse_envelope::<AuthPayload>(409, &body).unwrap_err();
    assert_eq!(err.code(), Some("CONFLICT"));
    assert_eq!(err.to_string(), "User already exists");
}

#[test]
fn parse_error_envelope_wins_even_with_ok_status() {
    let body = serde_json::json!({ "error": { "code": "UNAUTHORIZED", "message": "nope" } }).to_string();
    let err = parse_envelope::<LogoutPayload>(200, &body).unwrap_err();
    assert!(matches!(err, ApiError::Rpc { ref code, .. } if code == "UNAUTHORIZED"));
}

#[test]
fn parse_non_json_failure_keeps_status_and_body() {
    let err = parse_envelope::<MePayload>(502, "Bad Gateway").unwrap_err();
    match err {
        ApiError::Status { status, body } => {
            assert_eq!(status, 502);
            assert_eq!(body, "Bad Gateway");
        }
        other => panic!("expected Status, got {other:?}"),
    }
}

#[test]
fn parse_non_json_success_is_parse_error() {
    let err = parse_envelope::<MePayload>(200, "<html>").unwrap_err();
    assert!(matches!(err, ApiError::Parse(_)));
}

#[test]
fn parse_empty_object_is_parse_error() {
    let err = parse_envelope::<LogoutPayload>(200, "{}").unwrap_err();
    assert!(matches!(err, ApiError::Parse(_)));
}

#[test]
fn parse_wrong_payload_shape_is_parse_error() {
    let body = serde_json::json!({ "result": { "data": { "success": "yes" } } }).to_string();
    let err = parse_envelope::<LogoutPayload>(200, &body).unwrap_err();
    assert!(matches!(err, ApiError::Parse(_)));
}

// =============================================================
// URLs
// =============================================================

#[test]
fn procedure_url_joins_with_single_slash() {
    assert_eq!(procedure_url("http://h/trpc", "auth.me"), "http://h/trpc/auth.me");
    assert_eq!(procedure_url("http://h/trpc/", "auth.me"), "http://h/trpc/auth.me");
}

#[test]
fn resolve_base_url_defaults_when_unset_or_blank() {
    assert_eq!(resolve_base_url(None), DEFAULT_BASE_URL);
    assert_eq!(resolve_base_url(Some("  ".to_owned())), DEFAULT_BASE_URL);
    assert_eq!(resolve_base_url(Some(" http://api/trpc ".to_owned())), "http://api/trpc");
}

#[test]
fn http_api_keeps_base_url() {
    let api = HttpAuthApi::new("http://example.test/trpc").unwrap();
    assert_eq!(api.base_url(), "http://example.test/trpc");
    assert_eq!(api.url("auth.login"), "http://example.test/trpc/auth.login");
}

#[tokio::test]
async fn unreachable_server_is_request_error() {
    let api = HttpAuthApi::new("http://127.0.0.1:9/trpc").unwrap();
    let err = api.me("token").await.unwrap_err();
    assert!(matches!(err, ApiError::Request(_)));
    assert!(err.code().is_none());
}
