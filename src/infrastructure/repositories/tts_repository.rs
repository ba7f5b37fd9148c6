use async_trait::async_trait;

/// Repository for TTS synthesis operations.
/// Abstracts the underlying TTS provider (ElevenLabs today).
///
/// Errors are plain strings: the batch pipeline records them verbatim as the
/// failure reason of the entry that produced them.
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize `text` with `voice_id`, returning MP3 bytes
    async fn synthesize(&self, voice_id: &str, text: &str) -> Result<Vec<u8>, String>;

    /// Fails when required credentials are missing
    fn check_configured(&self) -> Result<(), String> {
        Ok(())
    }
}
