use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    domain::tts::{
        BatchResponse, OutputFormat, SingleResponse, TtsRequest, TtsService, TtsServiceApi,
        ARCHIVE_CONTENT_TYPE, AUDIO_CONTENT_TYPE,
    },
    error::{AppError, AppResult},
    infrastructure::auth::{ApiCaller, RequestId},
};

pub struct TtsController {
    tts_service: Arc<TtsService>,
}

impl TtsController {
    pub fn new(tts_service: Arc<TtsService>) -> Self {
        Self { tts_service }
    }

    /// POST /api/v1/tts - Synthesize one text or a batch of texts
    pub async fn synthesize(
        State(controller): State<Arc<TtsController>>,
        Extension(caller): Extension<ApiCaller>,
        request_id: Option<Extension<RequestId>>,
        payload: Result<Json<TtsRequest>, JsonRejection>,
    ) -> AppResult<Response> {
        let Json(request) = payload?;

        // Unknown formats are rejected before any synthesis work
        let format: OutputFormat = request.format().parse().map_err(AppError::from)?;

        tracing::info!(
            request_id = request_id.as_ref().map(|Extension(id)| id.0.as_str()),
            caller = caller.subject.as_deref().unwrap_or("anonymous"),
            format = %format,
            "TTS request accepted"
        );

        match request {
            TtsRequest::Batch(batch) => {
                let response = controller.tts_service.run_batch(batch.texts, format).await?;
                match response {
                    BatchResponse::Archive { file_name, bytes } => {
                        attachment(ARCHIVE_CONTENT_TYPE, &file_name, bytes)
                    }
                    BatchResponse::Links(results) => Ok(Json(results).into_response()),
                }
            }
            TtsRequest::Single(single) => {
                let response = controller.tts_service.run_single(single.entry, format).await?;
                match response {
                    SingleResponse::Audio { file_name, bytes } => {
                        attachment(AUDIO_CONTENT_TYPE, &file_name, bytes)
                    }
                    SingleResponse::Link(metadata) => Ok(Json(metadata).into_response()),
                }
            }
        }
    }
}

fn attachment(content_type: &'static str, file_name: &str, bytes: Vec<u8>) -> AppResult<Response> {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!(
            "attachment; filename=\"{}\"",
            header_safe_file_name(file_name)
        ))
        .map_err(|e| AppError::Internal(format!("Invalid download name: {}", e)))?,
    );

    Ok((StatusCode::OK, headers, Body::from(bytes)).into_response())
}

/// Header values must be visible ASCII, and quotes would end the filename early
fn header_safe_file_name(file_name: &str) -> String {
    file_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
