//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the proxy endpoints and the landing page
//! - Wire up middleware (tracing, request ID, timeout)
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::error::ProxyResult;
use crate::http::request::{request_span, UuidRequestId};
use crate::proxy::{page_handler, resource_handler};
use crate::rewrite::PageRewriter;
use crate::upstream::UpstreamClient;

/// Application state injected into handlers.
///
/// Holds only immutable, shareable pieces; nothing is written per request.
#[derive(Clone)]
pub struct AppState {
    pub upstream: UpstreamClient,
    pub rewriter: Arc<PageRewriter>,
}

impl AppState {
    pub fn from_config(config: &ProxyConfig) -> ProxyResult<Self> {
        Ok(Self {
            upstream: UpstreamClient::new(config.upstream.clone())?,
            rewriter: Arc::new(PageRewriter::from_config(&config.rewrite)),
        })
    }
}

/// HTTP server for the rewriting proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> ProxyResult<Self> {
        let state = AppState::from_config(&config)?;
        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route(&config.rewrite.fetch_path, get(page_handler))
            .route(&config.rewrite.resource_path, get(resource_handler))
            .route("/healthz", get(health_handler))
            .fallback_service(ServeDir::new(&config.static_files.dir))
            .with_state(state)
            .layer(request_timeout(config))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    /// The fully layered router, for serving or driving directly.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Run the server until a shutdown signal arrives on `shutdown`.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            static_dir = %self.config.static_files.dir,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Whole-request deadline. Only long resource streams can hit it, since
/// validation keeps it above the upstream fetch deadline.
fn request_timeout(config: &ProxyConfig) -> TimeoutLayer {
    TimeoutLayer::with_status_code(
        StatusCode::INTERNAL_SERVER_ERROR,
        Duration::from_secs(config.timeouts.request_secs),
    )
}

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
}

async fn health_handler() -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_request_deadline_answers_with_server_error() {
        let mut config = ProxyConfig::default();
        config.timeouts.request_secs = 1;

        let router = Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(10)).await;
                    "late"
                }),
            )
            .layer(request_timeout(&config));

        let response = router
            .oneshot(Request::builder().uri("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
