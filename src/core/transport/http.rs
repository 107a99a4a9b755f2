//! HTTP transport implementation.
//!
//! Serves the recordings routes and a health check with axum.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::{HttpConfig, TransportError, TransportResult};
use crate::core::RecordingServer;
use crate::domains::recordings::handlers::{list_recordings, stream_recording};

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        self.config.address()
    }

    /// Run the HTTP transport until Ctrl-C.
    pub async fn run(self, server: RecordingServer) -> TransportResult<()> {
        let addr = self.address();
        info!("Starting transport: {}", self.config.description());

        let app = build_router(server, self.config.enable_cors);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!("Ready - listening on {}", addr);
        info!("  → List:   GET /device/recordings/{{agentId}}/{{deviceId}}");
        info!("  → Stream: GET /device/recordings/{{agentId}}/{{deviceId}}/file/{{fileName}}");
        info!("  → Health: GET /health");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Build the application router.
pub fn build_router(server: RecordingServer, enable_cors: bool) -> Router {
    let mut app = Router::new()
        .route("/device/recordings/{agent_id}/{device_id}", get(list_recordings))
        .route(
            "/device/recordings/{agent_id}/{device_id}/file/{file_name}",
            get(stream_recording),
        )
        .route("/health", get(health_check))
        .with_state(server)
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

/// Health check endpoint. Unhealthy when the recordings base directory
/// cannot be listed.
async fn health_check(State(server): State<RecordingServer>) -> impl IntoResponse {
    let repository = server.repository().clone();
    let storage = tokio::task::spawn_blocking(move || repository.check_base_dir()).await;

    let (status, healthy) = match storage {
        Ok(Ok(())) => (StatusCode::OK, true),
        Ok(Err(e)) => {
            warn!("health check: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, false)
        }
        Err(e) => {
            warn!("health check task failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, false)
        }
    };

    let health = if healthy { "healthy" } else { "unhealthy" };
    (
        status,
        Json(serde_json::json!({
            "name": server.name(),
            "version": server.version(),
            "status": health,
            "timestamp": chrono::Utc::now().to_rfc3339()
        })),
    )
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
