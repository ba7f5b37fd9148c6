use serde::Deserialize;
use std::env;
use std::str::FromStr;

pub const DEFAULT_ELEVENLABS_BASE_URL: &str = "https://api.elevenlabs.io/v1";

/// Process configuration read from the environment.
///
/// Secrets and the bucket are optional at startup. Handlers that need them
/// report a configuration error at request time instead.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    pub jwt_secret: Option<String>,
    // ElevenLabs
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_base_url: String,
    // S3
    pub s3_bucket_name: Option<String>,
    pub aws_region: String,
    pub presigned_url_expiration_secs: u64,
    // Batch pipeline
    pub synthesis_concurrency: usize,
    pub synthesis_max_retries: u32,
    pub synthesis_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("PORT", 8080)?,
            environment: match env::var("ENVIRONMENT").as_deref() {
                Ok("production") => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match env::var("LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            jwt_secret: optional_var("JWT_SECRET"),
            elevenlabs_api_key: optional_var("ELEVENLABS_API_KEY"),
            elevenlabs_base_url: env::var("ELEVENLABS_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_ELEVENLABS_BASE_URL.to_string()),
            s3_bucket_name: optional_var("S3_BUCKET_NAME"),
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "eu-west-1".to_string()),
            presigned_url_expiration_secs: parse_var("PRESIGNED_URL_EXPIRATION_SECS", 3600)?,
            synthesis_concurrency: parse_var::<usize>("SYNTHESIS_CONCURRENCY", 4)?.max(1),
            synthesis_max_retries: parse_var("SYNTHESIS_MAX_RETRIES", 0)?,
            synthesis_timeout_secs: parse_var("SYNTHESIS_TIMEOUT_SECS", 60)?,
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

/// Empty values count as unset so a blank line in `.env` doesn't look configured
fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T>(key: &str, default: T) -> Result<T, Box<dyn std::error::Error>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| format!("Invalid value for {}: {}", key, e).into()),
        Err(_) => Ok(default),
    }
}
