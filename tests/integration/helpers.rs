//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tower::ServiceExt;

use tbr_api::{AppState, build_app};
use tbr_auth::{JwtEncoder, Principal};
use tbr_core::config::AppConfig;
use tbr_core::types::id::UserKey;

/// Secret shared by the test server and the test token issuer.
pub const TEST_SECRET: &str = "integration-test-secret";

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for inspecting presence directly
    pub state: AppState,
    /// Issues tokens the app accepts
    pub encoder: JwtEncoder,
}

impl TestApp {
    /// Create a new test application with an empty registry
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = TEST_SECRET.to_string();
        config.auth.leeway_seconds = 0;
        config.logging.format = "pretty".to_string();

        let encoder = JwtEncoder::new(&config.auth);
        let state = AppState::new(config);
        let router = build_app(state.clone());

        Self {
            router,
            state,
            encoder,
        }
    }

    /// Signed token for a principal
    pub fn token(&self, id: i64, is_admin: bool) -> String {
        self.encoder
            .issue(&Principal::new(UserKey::from(id), is_admin))
            .expect("Failed to issue token")
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        authorization: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        self.request_raw(method, path, &body_str, authorization).await
    }

    /// Make an HTTP request with a verbatim body
    pub async fn request_raw(
        &self,
        method: &str,
        path: &str,
        body_str: &str,
        authorization: Option<&str>,
    ) -> TestResponse {
        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(value) = authorization {
            req = req.header("Authorization", value);
        }

        let req = req
            .body(Body::from(body_str.to_string()))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Same as `request` with a `Bearer` header
    pub async fn request_as(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: &str,
    ) -> TestResponse {
        let header = format!("Bearer {token}");
        self.request(method, path, body, Some(&header)).await
    }

    /// Serves the app on an ephemeral port
    pub async fn spawn(&self) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("No local addr");
        let app = self.router.clone();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        addr
    }

    /// Waits until `user` has exactly `endpoints` registered endpoints
    pub async fn wait_for_endpoints(&self, user: &UserKey, endpoints: usize) {
        let connections = &self.state.realtime.connections;
        tokio::time::timeout(Duration::from_secs(5), async {
            while connections.lookup(user).await.len() != endpoints {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("Presence did not settle");
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `msg` field of an error body
    pub fn msg(&self) -> &str {
        self.body.get("msg").and_then(Value::as_str).unwrap_or_default()
    }
}

/// Opens a WebSocket to `/ws` with an optional query string
pub async fn connect(addr: SocketAddr, query: &str) -> WsClient {
    let (client, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws{query}"))
        .await
        .expect("Failed to connect");
    client
}

/// Sends one JSON frame
pub async fn send_json(client: &mut WsClient, frame: Value) {
    client
        .send(Message::text(frame.to_string()))
        .await
        .expect("Failed to send frame");
}

/// Next JSON text frame, skipping control frames
pub async fn next_json(client: &mut WsClient) -> Value {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match client.next().await {
                Some(Ok(Message::Text(text))) => {
                    return serde_json::from_str(text.as_str()).expect("Invalid JSON frame");
                }
                Some(Ok(_)) => continue,
                other => panic!("Socket ended: {other:?}"),
            }
        }
    })
    .await
    .expect("Timed out waiting for a frame")
}

/// Asserts nothing arrives within a short window
pub async fn expect_silence(client: &mut WsClient) {
    let waited = tokio::time::timeout(Duration::from_millis(200), async {
        loop {
            match client.next().await {
                Some(Ok(Message::Text(text))) => return text.as_str().to_string(),
                Some(Ok(_)) => continue,
                other => panic!("Socket ended: {other:?}"),
            }
        }
    })
    .await;
    assert!(waited.is_err(), "Unexpected frame: {waited:?}");
}
