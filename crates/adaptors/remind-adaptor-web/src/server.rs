//! Gateway HTTP server
//!
//! Serves `POST /api/chat` and a `GET /health` probe with request tracing,
//! optional CORS and a body size limit.

use crate::gateway::{chat_handler, ChatGateway};
use axum::{
    routing::{get, post},
    Json, Router,
};
use remind_core::{
    get_env_bool, get_env_int, get_env_or, RemindError, Result, CORS_ENV, HOST_ENV, PORT_ENV,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Gateway server configuration
#[derive(Debug, Clone)]
pub struct GatewayServerConfig {
    /// Server host
    pub host: String,

    /// Server port (0 picks a free port)
    pub port: u16,

    /// Enable permissive CORS
    pub enable_cors: bool,

    /// Maximum accepted request body
    pub body_limit_bytes: usize,
}

impl Default for GatewayServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            enable_cors: true,
            body_limit_bytes: 2 * 1024 * 1024,
        }
    }
}

impl GatewayServerConfig {
    /// Read `REMIND_HOST`, `REMIND_PORT` and `REMIND_CORS`, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: get_env_or(HOST_ENV, &defaults.host),
            port: get_env_int(PORT_ENV, defaults.port),
            enable_cors: get_env_bool(CORS_ENV, defaults.enable_cors),
            body_limit_bytes: defaults.body_limit_bytes,
        }
    }
}

/// Build the gateway router
pub fn build_router(gateway: Arc<ChatGateway>, config: &GatewayServerConfig) -> Router {
    let mut router = Router::new()
        .route("/health", get(health_check))
        .route("/api/chat", post(chat_handler))
        .with_state(gateway)
        .layer(RequestBodyLimitLayer::new(config.body_limit_bytes))
        .layer(TraceLayer::new_for_http());

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router = router.layer(cors);
    }

    router
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Gateway server service
pub struct GatewayServer {
    config: GatewayServerConfig,
    gateway: Arc<ChatGateway>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    local_addr: Option<SocketAddr>,
}

impl GatewayServer {
    /// Create a server for `gateway`
    pub fn new(config: GatewayServerConfig, gateway: ChatGateway) -> Self {
        Self {
            config,
            gateway: Arc::new(gateway),
            shutdown_tx: None,
            local_addr: None,
        }
    }

    /// Bind and serve in the background. Returns the bound address.
    pub async fn start(&mut self) -> Result<SocketAddr> {
        if self.is_running() {
            return Err(RemindError::config("Server already running"));
        }
        if !self.gateway.config().is_complete() {
            // Requests will answer 500 until the environment is fixed
            tracing::warn!("Agent URL or token not configured; /api/chat will fail");
        }

        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| RemindError::config(format!("Failed to bind to {}: {}", addr, e)))?;
        let local_addr = listener.local_addr()?;
        info!("Starting Re:Mind gateway on {}", local_addr);

        let router = build_router(self.gateway.clone(), &self.config);
        let (tx, rx) = tokio::sync::oneshot::channel();
        tokio::spawn(async move {
            let server = axum::serve(listener, router).with_graceful_shutdown(async {
                let _ = rx.await;
            });
            if let Err(e) = server.await {
                error!("Server error: {}", e);
            }
        });

        self.shutdown_tx = Some(tx);
        self.local_addr = Some(local_addr);
        Ok(local_addr)
    }

    /// Signal graceful shutdown
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            info!("Re:Mind gateway stopped");
        }
        self.local_addr = None;
        Ok(())
    }

    /// Check if server is running
    pub fn is_running(&self) -> bool {
        self.shutdown_tx.is_some()
    }

    /// Address the server is bound to, while running
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }
}
