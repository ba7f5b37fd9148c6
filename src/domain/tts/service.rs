use super::archive::build_archive;
use super::error::TtsServiceError;
use super::model::{
    stored_file_name, BatchResponse, BatchResult, OutputFormat, SingleResponse,
    SynthesisOutcome, SynthesisRequestEntry, BATCH_ARCHIVE_NAME, DEFAULT_VOICE_ID,
    SINGLE_AUDIO_NAME, UPLOAD_FAILED_MESSAGE,
};
use crate::infrastructure::repositories::{StorageRepository, TtsRepository};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

const EMPTY_TEXT_REASON: &str = "Text cannot be empty";

/// Tuning knobs for the fan-out
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Upper bound on in-flight provider calls per request
    pub concurrency: usize,
    /// Extra attempts after the first failed synthesis call
    pub max_retries: u32,
    pub url_expiration: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            concurrency: 4,
            max_retries: 0,
            url_expiration: Duration::from_secs(3600),
        }
    }
}

/// Entry with defaults applied
#[derive(Debug, Clone)]
struct ResolvedEntry {
    name: String,
    voice_id: String,
    text: String,
}

impl ResolvedEntry {
    fn resolve(entry: SynthesisRequestEntry) -> Self {
        let name = entry
            .name
            .filter(|n| !n.trim().is_empty())
            .map(|n| sanitize_name(&n))
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let voice_id = entry
            .voice_id
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_VOICE_ID.to_string());

        Self {
            name,
            voice_id,
            text: entry.text,
        }
    }
}

/// Keep names usable as zip members and object keys
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c == '/' || c == '\\' || c.is_control() { '_' } else { c })
        .collect()
}

pub struct TtsService {
    tts_repo: Arc<dyn TtsRepository>,
    storage_repo: Arc<dyn StorageRepository>,
    settings: PipelineSettings,
}

impl TtsService {
    pub fn new(
        tts_repo: Arc<dyn TtsRepository>,
        storage_repo: Arc<dyn StorageRepository>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            tts_repo,
            storage_repo,
            settings,
        }
    }
}

#[async_trait]
pub trait TtsServiceApi: Send + Sync {
    /// Synthesize every entry and encode the batch.
    ///
    /// Per-entry failures never fail the call: `File` drops them from the
    /// archive, `Url` reports them in place. Only missing configuration or an
    /// archive write error is returned as `Err`.
    async fn run_batch(
        &self,
        entries: Vec<SynthesisRequestEntry>,
        format: OutputFormat,
    ) -> Result<BatchResponse, TtsServiceError>;

    /// One entry, no archive. Failures surface as errors since there are no
    /// siblings to report them next to.
    async fn run_single(
        &self,
        entry: SynthesisRequestEntry,
        format: OutputFormat,
    ) -> Result<SingleResponse, TtsServiceError>;
}

#[async_trait]
impl TtsServiceApi for TtsService {
    async fn run_batch(
        &self,
        entries: Vec<SynthesisRequestEntry>,
        format: OutputFormat,
    ) -> Result<BatchResponse, TtsServiceError> {
        self.ensure_ready(format)?;

        let entry_count = entries.len();
        let start_time = Instant::now();
        tracing::info!(entry_count, format = %format, "Batch TTS request");

        let outcomes = self.synthesize_all(entries).await;
        let failed = outcomes.iter().filter(|o| !o.is_success()).count();

        let response = match format {
            OutputFormat::File => BatchResponse::Archive {
                file_name: BATCH_ARCHIVE_NAME.to_string(),
                bytes: build_archive(&outcomes)?,
            },
            OutputFormat::Url => BatchResponse::Links(self.publish_all(outcomes).await),
        };

        tracing::info!(
            entry_count,
            failed,
            format = %format,
            latency_ms = start_time.elapsed().as_millis() as u64,
            "Batch TTS completed"
        );

        Ok(response)
    }

    async fn run_single(
        &self,
        entry: SynthesisRequestEntry,
        format: OutputFormat,
    ) -> Result<SingleResponse, TtsServiceError> {
        self.ensure_ready(format)?;

        let file_name = entry
            .name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .map(|n| stored_file_name(&sanitize_name(n)))
            .unwrap_or_else(|| SINGLE_AUDIO_NAME.to_string());

        let outcome = self
            .synthesize_all(vec![entry])
            .await
            .pop()
            .ok_or_else(|| anyhow::anyhow!("pipeline returned no outcome for a single entry"))?;

        match format {
            OutputFormat::File => match outcome {
                SynthesisOutcome::Success { audio, .. } => Ok(SingleResponse::Audio {
                    file_name,
                    bytes: audio,
                }),
                SynthesisOutcome::Failure { reason, .. } => {
                    Err(TtsServiceError::Dependency(reason))
                }
            },
            OutputFormat::Url => {
                let result = self.publish_outcome(outcome).await;
                match (result.payload, result.message) {
                    (Some(metadata), _) => Ok(SingleResponse::Link(metadata)),
                    (None, message) => Err(TtsServiceError::Dependency(
                        message.unwrap_or_else(|| UPLOAD_FAILED_MESSAGE.to_string()),
                    )),
                }
            }
        }
    }
}

impl TtsService {
    /// Reject before any provider call if a collaborator the format needs is missing
    fn ensure_ready(&self, format: OutputFormat) -> Result<(), TtsServiceError> {
        self.tts_repo
            .check_configured()
            .map_err(TtsServiceError::Configuration)?;
        if format == OutputFormat::Url {
            self.storage_repo
                .check_configured()
                .map_err(TtsServiceError::Configuration)?;
        }
        Ok(())
    }

    /// Run synthesis for every entry with bounded concurrency.
    /// Results land in the slot of their input index, whatever order they finish in.
    async fn synthesize_all(&self, entries: Vec<SynthesisRequestEntry>) -> Vec<SynthesisOutcome> {
        let mut slots: Vec<Option<SynthesisOutcome>> = vec![None; entries.len()];

        let mut completed = stream::iter(entries.into_iter().enumerate())
            .map(|(index, entry)| async move {
                (index, self.synthesize_entry(ResolvedEntry::resolve(entry)).await)
            })
            .buffer_unordered(self.settings.concurrency.max(1));

        while let Some((index, outcome)) = completed.next().await {
            slots[index] = Some(outcome);
        }

        // buffer_unordered drives every future to completion, so each slot is filled
        debug_assert!(slots.iter().all(Option::is_some));
        slots.into_iter().flatten().collect()
    }

    async fn synthesize_entry(&self, entry: ResolvedEntry) -> SynthesisOutcome {
        if entry.text.trim().is_empty() {
            tracing::warn!(name = %entry.name, "Skipping entry with empty text");
            return SynthesisOutcome::Failure {
                name: entry.name,
                reason: EMPTY_TEXT_REASON.to_string(),
            };
        }

        let mut attempt = 0;
        loop {
            match self.tts_repo.synthesize(&entry.voice_id, &entry.text).await {
                Ok(audio) => {
                    return SynthesisOutcome::Success {
                        name: entry.name,
                        audio,
                    }
                }
                Err(reason) if attempt < self.settings.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        name = %entry.name,
                        attempt,
                        error = %reason,
                        "Synthesis failed, retrying"
                    );
                }
                Err(reason) => {
                    tracing::warn!(name = %entry.name, error = %reason, "Synthesis failed");
                    return SynthesisOutcome::Failure {
                        name: entry.name,
                        reason,
                    };
                }
            }
        }
    }

    /// Publish successful outcomes, keeping input order
    async fn publish_all(&self, outcomes: Vec<SynthesisOutcome>) -> Vec<BatchResult> {
        stream::iter(outcomes)
            .map(|outcome| self.publish_outcome(outcome))
            .buffered(self.settings.concurrency.max(1))
            .collect()
            .await
    }

    async fn publish_outcome(&self, outcome: SynthesisOutcome) -> BatchResult {
        match outcome {
            SynthesisOutcome::Success { name, audio } => {
                let stored_name = stored_file_name(&name);
                match self
                    .storage_repo
                    .publish(audio, &stored_name, self.settings.url_expiration)
                    .await
                {
                    Ok(metadata) => BatchResult::published(metadata),
                    Err(e) => {
                        tracing::error!(name = %name, error = %e, "Failed to publish audio");
                        BatchResult::failed(UPLOAD_FAILED_MESSAGE)
                    }
                }
            }
            SynthesisOutcome::Failure { reason, .. } => BatchResult::failed(reason),
        }
    }
}
