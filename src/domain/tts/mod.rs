pub mod archive;
pub mod dto;
pub mod error;
pub mod model;
pub mod service;

pub use dto::{BatchTtsRequest, SingleTtsRequest, TtsRequest};
pub use error::TtsServiceError;
pub use model::{
    stored_file_name, BatchResponse, BatchResult, OutputFormat, PublishMetadata, SingleResponse,
    SynthesisOutcome, SynthesisRequestEntry, ARCHIVE_CONTENT_TYPE, AUDIO_CONTENT_TYPE,
    BATCH_ARCHIVE_NAME, DEFAULT_VOICE_ID, SINGLE_AUDIO_NAME, STORAGE_KIND, SYNTHESIS_MODEL_ID,
    SYNTHESIS_OUTPUT_FORMAT, UPLOAD_FAILED_MESSAGE,
};
pub use service::{PipelineSettings, TtsService, TtsServiceApi};
