use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::infrastructure::repositories::{StorageRepository, TtsRepository};

/// Collaborators inspected by the readiness probe
#[derive(Clone)]
pub struct Readiness {
    pub tts_repo: Arc<dyn TtsRepository>,
    pub storage_repo: Arc<dyn StorageRepository>,
}

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "greeting": "Hello, World!",
        "message": "Welcome to the TTS gateway!"
    }))
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn health_ready(State(readiness): State<Readiness>) -> impl IntoResponse {
    let tts_ready = readiness.tts_repo.check_configured().is_ok();
    let storage_ready = readiness.storage_repo.check_configured().is_ok();
    let describe = |ok: bool| if ok { "configured" } else { "unconfigured" };

    let status = if tts_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if tts_ready { "ready" } else { "not_ready" },
            "tts": describe(tts_ready),
            "storage": describe(storage_ready)
        })),
    )
}
