pub mod elevenlabs_tts_repository;
pub mod s3_storage_repository;
pub mod storage_repository;
pub mod tts_repository;

pub use elevenlabs_tts_repository::ElevenLabsTtsRepository;
pub use s3_storage_repository::S3StorageRepository;
pub use storage_repository::StorageRepository;
pub use tts_repository::TtsRepository;
