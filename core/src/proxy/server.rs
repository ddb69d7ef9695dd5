//! Proxy Server - Axum HTTP server

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;

use crate::proxy::credentials::CredentialSource;
use crate::proxy::endpoint::route;
use crate::proxy::handlers::{ChatHandler, TranslateHandler, UsageHandler};
use crate::proxy::upstream::client::UpstreamClient;
use crate::proxy::ProxyConfig;

/// Inbound bodies are small JSON documents
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Proxy server instance
pub struct ProxyServer {
    host: String,
    port: u16,
    chat: Arc<ChatHandler>,
    translate: Arc<TranslateHandler>,
    usage: Arc<UsageHandler>,
}

impl ProxyServer {
    pub fn new(host: String, port: u16, config: ProxyConfig, credentials: CredentialSource) -> anyhow::Result<Self> {
        let upstream = UpstreamClient::new(&config.timeouts)?;

        Ok(Self {
            host,
            port,
            chat: Arc::new(ChatHandler::new(upstream.clone(), config.openrouter, credentials.clone())),
            translate: Arc::new(TranslateHandler::new(upstream.clone(), config.deepl.clone(), credentials.clone())),
            usage: Arc::new(UsageHandler::new(upstream, config.deepl, credentials)),
        })
    }

    pub fn router(&self) -> Router {
        Router::new()
            // Health check
            .route("/healthz", get(health_check_handler))
            .route("/health", get(health_check_handler))
            .route("/api/chat", route(self.chat.clone()))
            .route("/api/translate", route(self.translate.clone()))
            .route("/api/usage", route(self.usage.clone()))
            .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the proxy server (blocking)
    pub async fn run(self) -> anyhow::Result<()> {
        let app = self.router();

        let addr = format!("{}:{}", self.host, self.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        tracing::info!("Proxy server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Proxy server stopped");
        Ok(())
    }
}

/// Health check handler
async fn health_check_handler() -> Response {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"}))).into_response()
}

/// Shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
