use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::TtsServiceError;

/// Paula (Spanish), used when an entry has no `voice_id`
pub const DEFAULT_VOICE_ID: &str = "ThT5KcBeYPX3keUQqHPh";
pub const SYNTHESIS_MODEL_ID: &str = "eleven_multilingual_v2";
pub const SYNTHESIS_OUTPUT_FORMAT: &str = "mp3_22050_32";
pub const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";
pub const ARCHIVE_CONTENT_TYPE: &str = "application/zip";
pub const BATCH_ARCHIVE_NAME: &str = "tts_batch.zip";
pub const SINGLE_AUDIO_NAME: &str = "tts_output.mp3";
pub const STORAGE_KIND: &str = "blob";
pub const UPLOAD_FAILED_MESSAGE: &str = "Failed to upload";

/// How the synthesized audio is handed back to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    File,
    Url,
}

impl FromStr for OutputFormat {
    type Err = TtsServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(OutputFormat::File),
            "url" => Ok(OutputFormat::Url),
            other => Err(TtsServiceError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::File => write!(f, "file"),
            OutputFormat::Url => write!(f, "url"),
        }
    }
}

/// One text to synthesize, as supplied by the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisRequestEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
}

impl SynthesisRequestEntry {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            name: None,
            text: text.into(),
            voice_id: None,
        }
    }

    pub fn named(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(text)
        }
    }
}

/// Per-entry result of the synthesis step
#[derive(Debug, Clone, PartialEq)]
pub enum SynthesisOutcome {
    Success { name: String, audio: Vec<u8> },
    Failure { name: String, reason: String },
}

impl SynthesisOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SynthesisOutcome::Success { .. })
    }
}

/// What the blob store reports about an uploaded file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishMetadata {
    pub url: String,
    pub storage: String,
    pub content_type: String,
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
    pub id: String,
    pub stored_name: String,
    pub download_name: String,
}

/// One record of a url-mode batch response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<PublishMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BatchResult {
    pub fn published(payload: PublishMetadata) -> Self {
        Self {
            success: true,
            payload: Some(payload),
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            payload: None,
            message: Some(message.into()),
        }
    }
}

/// Encoded result of a batch run
#[derive(Debug, Clone)]
pub enum BatchResponse {
    Archive { file_name: String, bytes: Vec<u8> },
    Links(Vec<BatchResult>),
}

/// Encoded result of a single-entry run
#[derive(Debug, Clone)]
pub enum SingleResponse {
    Audio { file_name: String, bytes: Vec<u8> },
    Link(PublishMetadata),
}

/// `"<name>_es.mp3"`, the name used for archive members and stored objects
pub fn stored_file_name(name: &str) -> String {
    format!("{}_es.mp3", name)
}
