use crate::e2e::helpers;

use helpers::fakes::{FakeStorage, FakeTts};
use helpers::TestContext;
use hyper::StatusCode;
use serde_json::json;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_ok_on_health(ctx: &mut TestContext) {
    let response = ctx.client.get("/health").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body_bytes, b"OK");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_greet_on_root(ctx: &mut TestContext) {
    let response = ctx.client.get("/").await.unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["greeting"], json!("Hello, World!"));
    assert!(body.get("message").is_some());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_ready_when_configured(ctx: &mut TestContext) {
    let response = ctx.client.get("/health/ready").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.body,
        Some(json!({ "status": "ready", "tts": "configured", "storage": "configured" }))
    );
}

#[tokio::test]
async fn it_should_report_not_ready_without_provider_key() {
    let tts = FakeTts {
        unconfigured: true,
        ..FakeTts::default()
    };
    let storage = FakeStorage {
        unconfigured: true,
        ..FakeStorage::default()
    };
    let ctx = TestContext::start(tts, storage).await;

    let response = ctx.client.get("/health/ready").await.unwrap();

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        response.body,
        Some(json!({ "status": "not_ready", "tts": "unconfigured", "storage": "unconfigured" }))
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_attach_a_request_id(ctx: &mut TestContext) {
    let response = ctx.client.get("/health").await.unwrap();
    let generated = response.header("x-request-id").expect("missing x-request-id");
    assert!(uuid::Uuid::parse_str(generated).is_ok());

    let response = ctx
        .client
        .post_with_headers("/health", &json!({}), &[("x-request-id", "trace-abc-123")])
        .await
        .unwrap();
    // POST isn't routed, but the id is still echoed
    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
    response.assert_header("x-request-id", "trace-abc-123");
}
