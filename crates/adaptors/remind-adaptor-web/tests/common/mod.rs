//! Common test utilities and a mock upstream agent

#![allow(dead_code)]

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    response::IntoResponse,
    routing::post,
    Router,
};
use remind_adaptor_web::{build_router, ChatGateway, GatewayConfig, GatewayServerConfig};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tower::util::ServiceExt;

/// Token the tests configure the gateway with
pub const TEST_ANON_KEY: &str = "test-anon-key-12345";

/// Path the mock agent listens on
pub const AGENT_PATH: &str = "/functions/v1/agent";

// ============================================================================
// Mock Agent
// ============================================================================

/// What the mock agent saw and how it answers
pub struct MockAgent {
    pub status: StatusCode,
    pub body: String,
    pub requests: AtomicUsize,
    pub last_authorization: Mutex<Option<String>>,
    pub last_accept: Mutex<Option<String>>,
    pub last_content_type: Mutex<Option<String>>,
    pub last_body: Mutex<Option<serde_json::Value>>,
}

impl MockAgent {
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

/// Start a mock agent that answers every POST with `status` and `body`
pub async fn start_mock_agent(status: u16, body: &str) -> (String, Arc<MockAgent>) {
    let state = Arc::new(MockAgent {
        status: StatusCode::from_u16(status).unwrap(),
        body: body.to_string(),
        requests: AtomicUsize::new(0),
        last_authorization: Mutex::new(None),
        last_accept: Mutex::new(None),
        last_content_type: Mutex::new(None),
        last_body: Mutex::new(None),
    });

    let app = Router::new()
        .route(AGENT_PATH, post(mock_agent_reply))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}{}", addr, AGENT_PATH), state)
}

async fn mock_agent_reply(
    State(state): State<Arc<MockAgent>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    state.requests.fetch_add(1, Ordering::SeqCst);
    let header_text = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    *state.last_authorization.lock().unwrap() = header_text(header::AUTHORIZATION);
    *state.last_accept.lock().unwrap() = header_text(header::ACCEPT);
    *state.last_content_type.lock().unwrap() = header_text(header::CONTENT_TYPE);
    *state.last_body.lock().unwrap() = serde_json::from_slice(&body).ok();

    (state.status, state.body.clone())
}

/// Start an agent that answers `status` with a body cut short of its
/// declared `Content-Length`, so reading it fails
pub async fn start_truncated_agent(status: u16, reason: &str) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: text/plain\r\nContent-Length: 64\r\nConnection: close\r\n\r\npartial",
        status, reason
    );

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            read_request(&mut socket).await;
            let _ = socket.write_all(head.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    format!("http://{}{}", addr, AGENT_PATH)
}

/// Consume one request (headers plus `Content-Length` body)
async fn read_request(socket: &mut tokio::net::TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);

        let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let headers = String::from_utf8_lossy(&buf[..end]).to_lowercase();
        let length = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if buf.len() >= end + 4 + length {
            return;
        }
    }
}

/// An address nothing listens on
pub fn dead_agent_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}{}", addr, AGENT_PATH)
}

// ============================================================================
// Gateway helpers
// ============================================================================

/// Router for a gateway pointed at `agent_url`
pub fn gateway_router(config: GatewayConfig) -> Router {
    build_router(
        Arc::new(ChatGateway::new(config)),
        &GatewayServerConfig::default(),
    )
}

/// POST `body` to `/api/chat` and return status, content type and body text
pub async fn post_chat(router: Router, body: &str) -> (StatusCode, Option<String>, String) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
}
