use super::tts_repository::TtsRepository;
use crate::domain::tts::{SYNTHESIS_MODEL_ID, SYNTHESIS_OUTPUT_FORMAT};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;

#[derive(Serialize)]
struct ElevenLabsRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

/// ElevenLabs implementation of TTS repository
pub struct ElevenLabsTtsRepository {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl ElevenLabsTtsRepository {
    pub fn new(client: Client, api_key: Option<String>, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn api_key(&self) -> Result<&str, String> {
        self.api_key
            .as_deref()
            .ok_or_else(|| "ELEVENLABS_API_KEY not configured".to_string())
    }

    /// `{base_url}/text-to-speech/{voice_id}`, with the voice id as a single path segment
    fn endpoint(&self, voice_id: &str) -> Result<Url, String> {
        if !is_valid_voice_id(voice_id) {
            return Err(format!("Invalid voice id: {:?}", voice_id));
        }

        let mut url = Url::parse(&self.base_url)
            .map_err(|e| format!("Invalid ElevenLabs base URL: {}", e))?;
        url.path_segments_mut()
            .map_err(|_| "Invalid ElevenLabs base URL: cannot hold a path".to_string())?
            .pop_if_empty()
            .push("text-to-speech")
            .push(voice_id);
        Ok(url)
    }
}

/// Voice ids are opaque provider identifiers made of ASCII letters, digits, `-` and `_`
fn is_valid_voice_id(voice_id: &str) -> bool {
    !voice_id.is_empty()
        && voice_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[async_trait]
impl TtsRepository for ElevenLabsTtsRepository {
    async fn synthesize(&self, voice_id: &str, text: &str) -> Result<Vec<u8>, String> {
        let api_key = self.api_key()?;
        let url = self.endpoint(voice_id).map_err(|e| {
            tracing::warn!(voice = voice_id, error = %e, "Refusing to call ElevenLabs");
            e
        })?;
        let start_time = std::time::Instant::now();

        tracing::info!(
            voice = voice_id,
            model = SYNTHESIS_MODEL_ID,
            output_format = SYNTHESIS_OUTPUT_FORMAT,
            text_length = text.len(),
            "Calling ElevenLabs text-to-speech"
        );

        let response = self
            .client
            .post(url)
            .query(&[("output_format", SYNTHESIS_OUTPUT_FORMAT)])
            .header("xi-api-key", api_key)
            .json(&ElevenLabsRequest {
                text,
                model_id: SYNTHESIS_MODEL_ID,
            })
            .send()
            .await
            .map_err(|e| {
                let kind = if e.is_timeout() { "timed out" } else { "failed" };
                tracing::error!(error = %e, voice = voice_id, "ElevenLabs request {}", kind);
                format!("ElevenLabs API error: request {}: {}", kind, e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(
                status = status.as_u16(),
                voice = voice_id,
                body = %body,
                "ElevenLabs returned an error status"
            );
            return Err(match status {
                StatusCode::UNAUTHORIZED => format!("ElevenLabs API error: unauthorized: {}", body),
                _ => format!("ElevenLabs API error: status {}: {}", status.as_u16(), body),
            });
        }

        let audio = response.bytes().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to read ElevenLabs response body");
            format!("ElevenLabs API error: failed to read audio: {}", e)
        })?;

        if audio.is_empty() {
            return Err("ElevenLabs API error: empty audio response".to_string());
        }

        tracing::info!(
            provider = "elevenlabs",
            voice = voice_id,
            latency_ms = start_time.elapsed().as_millis() as u64,
            characters_count = text.len(),
            audio_size_bytes = audio.len(),
            "TTS synthesis completed"
        );

        Ok(audio.to_vec())
    }

    fn check_configured(&self) -> Result<(), String> {
        self.api_key().map(|_| ())
    }
}
