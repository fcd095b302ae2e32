//! Integration tests for the bearer gate and the admin gate.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use tbr_auth::{Claims, JwtEncoder};
use tbr_core::config::AuthConfig;

#[tokio::test]
async fn test_health_is_public() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_detailed_health_reports_engine_state() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/health/detailed", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["ws_connections"], 0);
    assert_eq!(response.body["online_users"], 0);
    assert!(response.body.get("metrics").is_some());
}

#[tokio::test]
async fn test_missing_header_is_forbidden() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/auth/me", None, None).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.msg(), "No token, authorization denied");
}

#[tokio::test]
async fn test_header_without_token_is_forbidden() {
    let app = helpers::TestApp::new();

    for header in ["Bearer", "Token abc", "Bearer a b"] {
        let response = app.request("GET", "/api/auth/me", None, Some(header)).await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "header {header:?}");
    }
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let app = helpers::TestApp::new();

    let response = app.request_as("GET", "/api/auth/me", None, "not.a.token").await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_foreign_signature_is_unauthorized() {
    let app = helpers::TestApp::new();
    let foreign = JwtEncoder::new(&AuthConfig {
        jwt_secret: "someone-else".to_string(),
        ..AuthConfig::default()
    });
    let token = foreign
        .issue(&tbr_auth::Principal::new(42_i64.into(), true))
        .unwrap();

    let response = app.request_as("GET", "/api/auth/me", None, &token).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.msg(), "Invalid token signature");
}

#[tokio::test]
async fn test_token_without_identity_is_unauthorized() {
    let app = helpers::TestApp::new();
    let token = app
        .encoder
        .sign(&Claims {
            is_admin: Some(json!(true)),
            ..Claims::default()
        })
        .unwrap();

    let response = app.request_as("GET", "/api/auth/me", None, &token).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_is_unauthorized() {
    let app = helpers::TestApp::new();
    let now = chrono::Utc::now().timestamp();
    let token = app
        .encoder
        .sign(&Claims {
            id: Some(json!(42)),
            iat: Some(now - 7200),
            exp: Some(now - 3600),
            ..Claims::default()
        })
        .unwrap();

    let response = app.request_as("GET", "/api/auth/me", None, &token).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.msg(), "Token has expired");
}

#[tokio::test]
async fn test_valid_token_resolves_principal() {
    let app = helpers::TestApp::new();
    let token = app.token(42, false);

    let response = app.request_as("GET", "/api/auth/me", None, &token).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"id": "42", "isAdmin": false}));
}

#[tokio::test]
async fn test_string_admin_flag_is_not_admin() {
    let app = helpers::TestApp::new();
    let token = app
        .encoder
        .sign(&Claims {
            id: Some(json!(7)),
            is_admin: Some(json!("true")),
            ..Claims::default()
        })
        .unwrap();

    let response = app.request_as("GET", "/api/admin/presence", None, &token).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.msg(), "Admin access required");
}

#[tokio::test]
async fn test_admin_route_requires_authentication_first() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/admin/presence", None, None).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.msg(), "No token, authorization denied");
}

#[tokio::test]
async fn test_admin_can_list_presence() {
    let app = helpers::TestApp::new();
    let token = app.token(1, true);

    let response = app.request_as("GET", "/api/admin/presence", None, &token).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["connections"], 0);
    assert_eq!(response.body["users"], json!([]));
}

#[tokio::test]
async fn test_admin_user_presence_when_offline() {
    let app = helpers::TestApp::new();
    let token = app.token(1, true);

    let response = app
        .request_as("GET", "/api/admin/presence/99", None, &token)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["userId"], "99");
    assert_eq!(response.body["online"], false);
    assert_eq!(response.body["endpoints"], json!([]));
}

#[tokio::test]
async fn test_http_message_to_offline_user_is_accepted() {
    let app = helpers::TestApp::new();
    let token = app.token(1, false);

    let response = app
        .request_as(
            "POST",
            "/api/messages",
            Some(json!({"toUserId": 2, "message": "anyone?"})),
            &token,
        )
        .await;

    assert_eq!(response.status, StatusCode::ACCEPTED);
    assert_eq!(response.msg(), "accepted");
    assert_eq!(app.state.realtime.metrics.snapshot().messages_dropped, 1);
}

#[tokio::test]
async fn test_http_message_rejects_bad_recipient() {
    let app = helpers::TestApp::new();
    let token = app.token(1, false);

    let response = app
        .request_as(
            "POST",
            "/api/messages",
            Some(json!({"toUserId": null, "message": "x"})),
            &token,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_http_message_without_recipient_is_bad_request() {
    let app = helpers::TestApp::new();
    let token = app.token(1, false);

    let response = app
        .request_as("POST", "/api/messages", Some(json!({"message": "hi"})), &token)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(!response.msg().is_empty());
}

#[tokio::test]
async fn test_http_message_with_non_json_body_is_bad_request() {
    let app = helpers::TestApp::new();
    let token = app.token(1, false);
    let header = format!("Bearer {token}");

    let response = app
        .request_raw("POST", "/api/messages", "not json at all", Some(&header))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(!response.msg().is_empty());
}
