//! End-to-end tests for WebSocket registration and private-message relay.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::{connect, expect_silence, next_json, send_json};
use tbr_core::types::id::UserKey;

#[tokio::test]
async fn test_message_reaches_every_tab_of_recipient() {
    let app = helpers::TestApp::new();
    let addr = app.spawn().await;
    let bob = UserKey::from(2_i64);

    let mut alice = connect(addr, "").await;
    let mut bob_tab1 = connect(addr, "").await;
    let mut bob_tab2 = connect(addr, "").await;

    send_json(&mut alice, json!({"event": "register", "data": 1})).await;
    send_json(&mut bob_tab1, json!({"event": "register", "data": 2})).await;
    send_json(&mut bob_tab2, json!({"event": "register", "data": "2"})).await;
    app.wait_for_endpoints(&bob, 2).await;

    send_json(
        &mut alice,
        json!({
            "event": "private_message",
            "data": {"toUserId": "2", "fromUserId": 1, "message": {"text": "hi"}}
        }),
    )
    .await;

    for tab in [&mut bob_tab1, &mut bob_tab2] {
        let frame = next_json(tab).await;
        assert_eq!(frame["event"], "private_message");
        assert_eq!(frame["data"]["fromUserId"], "1");
        assert_eq!(frame["data"]["message"], json!({"text": "hi"}));
        assert!(frame["data"]["timestamp"].is_string());
    }

    // The sender gets no echo.
    expect_silence(&mut alice).await;
}

#[tokio::test]
async fn test_message_to_offline_user_is_dropped() {
    let app = helpers::TestApp::new();
    let addr = app.spawn().await;

    let mut alice = connect(addr, "").await;
    send_json(&mut alice, json!({"event": "register", "data": 1})).await;
    app.wait_for_endpoints(&UserKey::from(1_i64), 1).await;

    send_json(
        &mut alice,
        json!({
            "event": "private_message",
            "data": {"toUserId": 404, "fromUserId": 1, "message": "hello?"}
        }),
    )
    .await;

    expect_silence(&mut alice).await;
    assert_eq!(app.state.realtime.metrics.snapshot().messages_dropped, 1);
}

#[tokio::test]
async fn test_bad_frame_gets_error_event() {
    let app = helpers::TestApp::new();
    let addr = app.spawn().await;
    let mut client = connect(addr, "").await;

    send_json(&mut client, json!({"event": "register", "data": {"nested": true}})).await;

    let frame = next_json(&mut client).await;
    assert_eq!(frame["event"], "error");
    assert_eq!(frame["data"]["code"], "VALIDATION");
    assert_eq!(app.state.realtime.connections.user_count().await, 0);
}

#[tokio::test]
async fn test_disconnect_removes_presence() {
    let app = helpers::TestApp::new();
    let addr = app.spawn().await;
    let carol = UserKey::from(3_i64);

    let mut first = connect(addr, "").await;
    let mut second = connect(addr, "").await;
    send_json(&mut first, json!({"event": "register", "data": 3})).await;
    send_json(&mut second, json!({"event": "register", "data": 3})).await;
    app.wait_for_endpoints(&carol, 2).await;

    first.close(None).await.expect("close");
    app.wait_for_endpoints(&carol, 1).await;

    second.close(None).await.expect("close");
    app.wait_for_endpoints(&carol, 0).await;
    assert_eq!(app.state.realtime.connections.user_count().await, 0);
}

#[tokio::test]
async fn test_token_query_registers_principal() {
    let app = helpers::TestApp::new();
    let addr = app.spawn().await;
    let token = app.token(5, false);

    let mut client = connect(addr, &format!("?token={token}")).await;
    app.wait_for_endpoints(&UserKey::from(5_i64), 1).await;

    let sender = app.token(6, false);
    let response = app
        .request_as(
            "POST",
            "/api/messages",
            Some(json!({"toUserId": 5, "message": "over http"})),
            &sender,
        )
        .await;
    assert_eq!(response.status, StatusCode::ACCEPTED);

    let frame = next_json(&mut client).await;
    assert_eq!(frame["data"]["fromUserId"], "6");
    assert_eq!(frame["data"]["message"], "over http");
}

#[tokio::test]
async fn test_invalid_token_query_refuses_upgrade() {
    let app = helpers::TestApp::new();
    let addr = app.spawn().await;

    let result = tokio_tungstenite::connect_async(format!("ws://{addr}/ws?token=garbage")).await;

    assert!(result.is_err());
    assert_eq!(app.state.realtime.connections.connection_count(), 0);
}

#[tokio::test]
async fn test_admin_sees_live_presence() {
    let app = helpers::TestApp::new();
    let addr = app.spawn().await;

    let mut client = connect(addr, "").await;
    send_json(&mut client, json!({"event": "register", "data": "dana"})).await;
    app.wait_for_endpoints(&UserKey::from_text("dana").unwrap(), 1).await;

    let admin = app.token(1, true);
    let list = app.request_as("GET", "/api/admin/presence", None, &admin).await;
    assert_eq!(list.status, StatusCode::OK);
    assert_eq!(list.body["users"], json!([{"userId": "dana", "endpoints": 1}]));

    let one = app
        .request_as("GET", "/api/admin/presence/dana", None, &admin)
        .await;
    assert_eq!(one.body["online"], true);
    assert_eq!(one.body["endpoints"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_oversized_frame_gets_error_and_keeps_presence() {
    let app = helpers::TestApp::new();
    let addr = app.spawn().await;
    let user = UserKey::from(5_i64);

    let mut client = connect(addr, "").await;
    send_json(&mut client, json!({"event": "register", "data": 5})).await;
    app.wait_for_endpoints(&user, 1).await;

    let limit = app.state.config.realtime.max_message_bytes;
    let oversized = json!({
        "event": "private_message",
        "data": {"toUserId": 6, "fromUserId": 5, "message": "x".repeat(limit)}
    });
    send_json(&mut client, oversized).await;

    let frame = next_json(&mut client).await;
    assert_eq!(frame["event"], "error");
    assert_eq!(frame["data"]["code"], "VALIDATION");
    assert_eq!(app.state.realtime.connections.lookup(&user).await.len(), 1);
}
