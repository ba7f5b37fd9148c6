use serde::{Deserialize, Serialize};

use super::model::SynthesisRequestEntry;

/// Body of POST /api/v1/tts.
///
/// A body with `texts` is a batch; a body with a top-level `text` is a single
/// request. `format` stays a plain string so an unknown value can be rejected
/// with 403 instead of a deserialization error.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TtsRequest {
    Batch(BatchTtsRequest),
    Single(SingleTtsRequest),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchTtsRequest {
    pub format: String,
    pub texts: Vec<SynthesisRequestEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SingleTtsRequest {
    pub format: String,
    #[serde(flatten)]
    pub entry: SynthesisRequestEntry,
}

impl TtsRequest {
    pub fn format(&self) -> &str {
        match self {
            TtsRequest::Batch(req) => &req.format,
            TtsRequest::Single(req) => &req.format,
        }
    }
}
