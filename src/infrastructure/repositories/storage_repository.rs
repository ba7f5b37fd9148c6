use async_trait::async_trait;
use std::time::Duration;

use crate::domain::tts::PublishMetadata;

/// Object storage that hands back time-limited download links
#[async_trait]
pub trait StorageRepository: Send + Sync {
    /// Store `audio` under `stored_name` and return a link valid for `expires_in`
    async fn publish(
        &self,
        audio: Vec<u8>,
        stored_name: &str,
        expires_in: Duration,
    ) -> Result<PublishMetadata, String>;

    /// Fails when no destination is configured
    fn check_configured(&self) -> Result<(), String> {
        Ok(())
    }
}
