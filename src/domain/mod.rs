pub mod auth;
pub mod tts;
