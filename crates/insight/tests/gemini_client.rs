use errlens_insight::{
    learning_resources, Augmentation, CompletionService, GeminiClient, GeminiConfig, InsightError,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> GeminiClient {
    let mut config = GeminiConfig::new("test-key");
    config.base_url = format!("{}/v1beta/models", server.uri());
    config.model = "gemini-test".to_string();
    config.timeout = Duration::from_secs(5);
    GeminiClient::new(config).expect("client")
}

fn candidate_text(text: &str) -> serde_json::Value {
    json!({
        "candidates": [
            {
                "content": { "role": "model", "parts": [ { "text": text } ] },
                "finishReason": "STOP"
            }
        ]
    })
}

#[tokio::test]
async fn completion_returns_candidate_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-test:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [ { "role": "user", "parts": [ { "text": "hello" } ] } ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_text("hi there")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.complete("hello").await.unwrap(), "hi there");
}

#[tokio::test]
async fn api_error_carries_status_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED" }
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).complete("hello").await.unwrap_err();
    match err {
        InsightError::Api { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "API key not valid");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn response_without_candidates_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let err = client_for(&server).complete("hello").await.unwrap_err();
    assert!(matches!(err, InsightError::EmptyResponse));
}

#[tokio::test]
async fn learning_resources_flow_through_the_client() {
    let server = MockServer::start().await;
    let text = "```json\n[{\"title\": \"Scopes\", \"description\": \"Names and scopes\", \"resource_type\": \"article\"}]\n```";
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_text(text)))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let outcome =
        learning_resources(&client, "NameError", &["variable scope".to_string()]).await;
    match outcome {
        Augmentation::Generated(resources) => {
            assert_eq!(resources.len(), 1);
            assert_eq!(resources[0].title, "Scopes");
        }
        other => panic!("expected generated resources, got {other:?}"),
    }
}
