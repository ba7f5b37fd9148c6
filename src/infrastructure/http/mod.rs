use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::controllers::{
    health::{self, Readiness},
    tts::TtsController,
};
use crate::infrastructure::auth::{api_key_middleware, request_id_middleware};
use crate::infrastructure::config::Config;

/// Batches of long texts easily exceed axum's 2 MB default
const MAX_REQUEST_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Build the application router with all routes and middleware
pub fn build_router(
    config: Arc<Config>,
    tts_controller: Arc<TtsController>,
    readiness: Readiness,
) -> Router {
    // TTS routes (need an admin api key)
    let tts_routes = Router::new()
        .route("/api/v1/tts", axum::routing::post(TtsController::synthesize))
        .with_state(tts_controller)
        .layer(middleware::from_fn_with_state(config, api_key_middleware))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES));

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(readiness)
        .merge(tts_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until ctrl-c / SIGTERM
pub async fn start_http_server(
    config: Arc<Config>,
    app: Router,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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
