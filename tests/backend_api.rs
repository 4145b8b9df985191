//! Contract tests for the Gemini conversation backend adapter.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use solace::config::BackendConfig;
use solace::{AssistantError, ConversationBackend, EmotionLabel, GeminiBackend};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> BackendConfig {
    BackendConfig {
        base_url: server.uri(),
        request_timeout_secs: 2,
        ..BackendConfig::default()
    }
}

fn reply_body(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [
            { "content": { "parts": [ { "text": text } ] } }
        ]
    })
}

#[tokio::test]
async fn generate_reply_sends_key_and_context() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_string_contains("feeling a bit low"))
        .and(body_string_contains("appears sad"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("I'm here for you.")))
        .expect(1)
        .mount(&server)
        .await;

    let backend =
        GeminiBackend::with_api_key(&config_for(&server), Some("test-key".into())).unwrap();
    let reply = backend
        .generate_reply("feeling a bit low", EmotionLabel::Sad)
        .await
        .unwrap();
    assert_eq!(reply, "I'm here for you.");
}

#[tokio::test]
async fn emotion_reply_uses_distinct_prompt_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .and(body_string_contains("hasn't said anything"))
        .and(body_string_contains("reads as happy"))
        .and(body_string_contains("85%"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("You look cheerful!")))
        .expect(1)
        .mount(&server)
        .await;

    let backend = GeminiBackend::with_api_key(&config_for(&server), Some("k".into())).unwrap();
    let reply = backend
        .generate_emotion_reply(EmotionLabel::Happy, 0.85)
        .await
        .unwrap();
    assert_eq!(reply, "You look cheerful!");
}

#[tokio::test]
async fn server_error_maps_to_backend_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let backend = GeminiBackend::with_api_key(&config_for(&server), Some("k".into())).unwrap();
    let err = backend
        .generate_reply("hello", EmotionLabel::Neutral)
        .await
        .unwrap_err();
    match err {
        AssistantError::Backend(detail) => assert!(detail.contains("500")),
        other => panic!("expected backend error, got {other}"),
    }
}

#[tokio::test]
async fn auth_failure_maps_to_backend_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
        .mount(&server)
        .await;

    let backend = GeminiBackend::with_api_key(&config_for(&server), Some("bad".into())).unwrap();
    let err = backend
        .generate_reply("hello", EmotionLabel::Neutral)
        .await
        .unwrap_err();
    assert!(matches!(err, AssistantError::Backend(_)));
}

#[tokio::test]
async fn empty_candidates_are_an_error_not_a_blank_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let backend = GeminiBackend::with_api_key(&config_for(&server), Some("k".into())).unwrap();
    let err = backend
        .generate_reply("hello", EmotionLabel::Neutral)
        .await
        .unwrap_err();
    assert!(matches!(err, AssistantError::Backend(_)));
}

#[tokio::test]
async fn timeout_maps_to_backend_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(reply_body("too late"))
                .set_delay(std::time::Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.request_timeout_secs = 1;
    let backend = GeminiBackend::with_api_key(&config, Some("k".into())).unwrap();
    let err = backend
        .generate_reply("hello", EmotionLabel::Neutral)
        .await
        .unwrap_err();
    assert!(matches!(err, AssistantError::Backend(_)));
}
