use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tts_gateway::controllers::{health::Readiness, tts::TtsController};
use tts_gateway::domain::tts::{PipelineSettings, TtsService};
use tts_gateway::infrastructure::config::{Config, LogFormat};
use tts_gateway::infrastructure::http::{build_router, start_http_server};
use tts_gateway::infrastructure::repositories::{
    ElevenLabsTtsRepository, S3StorageRepository, StorageRepository, TtsRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting TTS gateway on {}:{} ({:?})",
        config.host,
        config.port,
        config.environment
    );

    // Missing secrets don't stop the server; requests that need them get a 500
    if config.jwt_secret.is_none() {
        tracing::warn!("JWT_SECRET not set, every TTS request will be rejected");
    }
    if config.elevenlabs_api_key.is_none() {
        tracing::warn!("ELEVENLABS_API_KEY not set, synthesis is unavailable");
    }
    if config.s3_bucket_name.is_none() {
        tracing::warn!("S3_BUCKET_NAME not set, format=url is unavailable");
    }

    // Create S3 client
    tracing::info!("Initializing S3 client with region: {}", config.aws_region);
    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.aws_region.clone()))
        .load()
        .await;
    tracing::info!(region = ?aws_config.region(), "AWS configuration loaded");
    let s3_client = Arc::new(aws_sdk_s3::Client::new(&aws_config));

    // Shared HTTP client for the speech provider
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.synthesis_timeout_secs))
        .build()?;

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Repositories
    let tts_repo: Arc<dyn TtsRepository> = Arc::new(ElevenLabsTtsRepository::new(
        http_client,
        config.elevenlabs_api_key.clone(),
        config.elevenlabs_base_url.clone(),
    ));
    let storage_repo: Arc<dyn StorageRepository> = Arc::new(S3StorageRepository::new(
        s3_client,
        config.s3_bucket_name.clone(),
    ));

    // 2. Services
    let settings = PipelineSettings {
        concurrency: config.synthesis_concurrency,
        max_retries: config.synthesis_max_retries,
        url_expiration: Duration::from_secs(config.presigned_url_expiration_secs),
    };
    tracing::info!(
        concurrency = settings.concurrency,
        max_retries = settings.max_retries,
        url_expiration_secs = settings.url_expiration.as_secs(),
        "Batch pipeline configured"
    );
    let tts_service = Arc::new(TtsService::new(
        tts_repo.clone(),
        storage_repo.clone(),
        settings,
    ));

    // 3. Controllers
    let tts_controller = Arc::new(TtsController::new(tts_service));

    let app = build_router(
        config.clone(),
        tts_controller,
        Readiness {
            tts_repo,
            storage_repo,
        },
    );

    start_http_server(config, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let default_filter = if config.is_development() {
        "tts_gateway=debug,tower_http=debug"
    } else {
        "tts_gateway=info,tower_http=info"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
