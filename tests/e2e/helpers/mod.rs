use std::sync::Arc;
use std::time::Duration;
use test_context::AsyncTestContext;
use tokio::net::TcpListener;
use tts_gateway::controllers::{health::Readiness, tts::TtsController};
use tts_gateway::domain::auth::ApiKeyClaims;
use tts_gateway::domain::tts::{PipelineSettings, TtsService};
use tts_gateway::infrastructure::config::{Config, Environment, LogFormat};
use tts_gateway::infrastructure::http::build_router;


use api_client::TestClient;
use fakes::{FakeStorage, FakeTts};

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-key-for-testing-only";

pub struct TestContext {
    pub client: TestClient,
    #[allow(dead_code)]
    pub config: Config,
    pub tts: Arc<FakeTts>,
    pub storage: Arc<FakeStorage>,
    pub admin_key: String,
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async { TestContext::start(FakeTts::default(), FakeStorage::default()).await }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {
            // The server task dies with the runtime
        }
    }
}

impl TestContext {
    /// Start a server wired to the given fakes
    pub async fn start(tts: FakeTts, storage: FakeStorage) -> Self {
        Self::start_with_config(test_config(), tts, storage).await
    }

    pub async fn start_with_config(config: Config, tts: FakeTts, storage: FakeStorage) -> Self {
        let tts = Arc::new(tts);
        let storage = Arc::new(storage);

        let tts_service = Arc::new(TtsService::new(
            tts.clone(),
            storage.clone(),
            PipelineSettings {
                concurrency: config.synthesis_concurrency,
                max_retries: config.synthesis_max_retries,
                url_expiration: Duration::from_secs(config.presigned_url_expiration_secs),
            },
        ));
        let tts_controller = Arc::new(TtsController::new(tts_service));

        let app = build_router(
            Arc::new(config.clone()),
            tts_controller,
            Readiness {
                tts_repo: tts.clone(),
                storage_repo: storage.clone(),
            },
        );

        // Start server
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let addr = listener.local_addr().expect("Failed to get local addr");
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            client: TestClient::new(&base_url),
            config,
            tts,
            storage,
            admin_key: generate_test_api_key(true),
        }
    }
}

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: Environment::Development,
        log_format: LogFormat::Pretty,
        jwt_secret: Some(TEST_JWT_SECRET.to_string()),
        elevenlabs_api_key: Some("test-elevenlabs-key".to_string()),
        elevenlabs_base_url: "http://127.0.0.1:9".to_string(),
        s3_bucket_name: Some("audio-bucket".to_string()),
        aws_region: "us-east-1".to_string(),
        presigned_url_expiration_secs: 3600,
        synthesis_concurrency: 4,
        synthesis_max_retries: 0,
        synthesis_timeout_secs: 5,
    }
}

/// Signed `x-api-key` token with the given admin capability
pub fn generate_test_api_key(admin_access: bool) -> String {
    sign_api_key(TEST_JWT_SECRET, "e2e-tests", admin_access, Some(1))
}

/// HS256 api key signed with `secret`; `expires_in_hours = None` gives a non-expiring key
pub fn sign_api_key(
    secret: &str,
    subject: &str,
    admin_access: bool,
    expires_in_hours: Option<i64>,
) -> String {
    let claims = ApiKeyClaims {
        sub: Some(subject.to_string()),
        admin_access,
        exp: expires_in_hours
            .map(|h| (chrono::Utc::now() + chrono::Duration::hours(h)).timestamp()),
    };
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}
