use crate::e2e::helpers;

use helpers::fakes::{FakeStorage, FakeTts};
use helpers::{generate_test_api_key, sign_api_key, test_config, TestContext};
use hyper::StatusCode;
use serde_json::json;
use test_context::test_context;

const TTS_PATH: &str = "/api/v1/tts";

fn batch_body() -> serde_json::Value {
    json!({ "format": "url", "texts": [{ "name": "a", "text": "hi" }] })
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_requests_without_api_key(ctx: &mut TestContext) {
    let response = ctx.client.post(TTS_PATH, &batch_body()).await.unwrap();

    response
        .assert_status(StatusCode::FORBIDDEN)
        .assert_error_message("Missing x-api-key header");
    assert_eq!(ctx.tts.calls(), 0);
    assert!(ctx.storage.published().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_tokens_without_admin_access(ctx: &mut TestContext) {
    let key = generate_test_api_key(false);

    let response = ctx
        .client
        .post_with_api_key(TTS_PATH, &batch_body(), &key)
        .await
        .unwrap();

    response
        .assert_status(StatusCode::FORBIDDEN)
        .assert_error_message("admin access");
    assert_eq!(ctx.tts.calls(), 0);
    assert!(ctx.storage.published().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_tokens_signed_with_another_key(ctx: &mut TestContext) {
    let key = sign_api_key("someone-elses-secret", "intruder", true, None);

    let response = ctx
        .client
        .post_with_api_key(TTS_PATH, &batch_body(), &key)
        .await
        .unwrap();

    response
        .assert_status(StatusCode::FORBIDDEN)
        .assert_error_message("Invalid token");
    assert_eq!(ctx.tts.calls(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_tokens(ctx: &mut TestContext) {
    let response = ctx
        .client
        .post_with_api_key(TTS_PATH, &batch_body(), "definitely-not-a-jwt")
        .await
        .unwrap();

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(ctx.tts.calls(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_check_auth_before_the_format(ctx: &mut TestContext) {
    let response = ctx
        .client
        .post(TTS_PATH, &json!({ "format": "ogg", "texts": [] }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::FORBIDDEN)
        .assert_error_message("Missing x-api-key header");
}

#[tokio::test]
async fn it_should_fail_with_server_error_when_signing_key_is_missing() {
    let mut config = test_config();
    config.jwt_secret = None;
    let ctx =
        TestContext::start_with_config(config, FakeTts::default(), FakeStorage::default()).await;

    let response = ctx
        .client
        .post_with_api_key(TTS_PATH, &batch_body(), &ctx.admin_key)
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("JWT_SECRET not configured");
    assert_eq!(ctx.tts.calls(), 0);
}
