//! Wiremock integration tests for AnthropicProvider.

use heimdall::providers::{AnthropicProvider, build_client};
use heimdall::{CompletionRequest, EmbeddingRequest, HeimdallError, Message, ProviderAdapter};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> AnthropicProvider {
    AnthropicProvider::new(Some("ant_key".into()), build_client(None).unwrap())
        .with_base_url(server.uri())
}

#[tokio::test]
async fn complete_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "ant_key"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "claude-3-5-sonnet-20241022",
            "system": "be brief",
            "messages": [{"role": "user", "content": "capital of France?"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "content": [
                {"type": "text", "text": "Par"},
                {"type": "text", "text": "is"}
            ],
            "usage": {"input_tokens": 20, "output_tokens": 2}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = CompletionRequest::new(vec![
        Message::system("be brief"),
        Message::user("capital of France?"),
    ]);
    let response = provider(&server).complete(&request).await.unwrap();

    assert_eq!(response.content, "Paris");
    assert_eq!(response.provider, "anthropic");
    assert_eq!(response.usage.prompt_tokens, 20);
    assert_eq!(response.usage.total_tokens, 22);
}

#[tokio::test]
async fn temperature_is_clamped_to_api_range() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_partial_json(json!({"temperature": 1.0})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"type": "text", "text": "ok"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = CompletionRequest::new(vec![Message::user("hi")]).temperature(1.8);
    let response = provider(&server).complete(&request).await.unwrap();
    assert_eq!(response.content, "ok");
}

#[tokio::test]
async fn empty_content_is_empty_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": []})))
        .mount(&server)
        .await;

    let request = CompletionRequest::new(vec![Message::user("hi")]);
    let result = provider(&server).complete(&request).await;
    assert!(matches!(result, Err(HeimdallError::EmptyResponse)));
}

#[tokio::test]
async fn forbidden_maps_to_unauthenticated() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let request = CompletionRequest::new(vec![Message::user("hi")]);
    let result = provider(&server).complete(&request).await;
    assert!(matches!(result, Err(HeimdallError::Unauthenticated)));
}

#[tokio::test]
async fn embed_is_unsupported() {
    let server = MockServer::start().await;
    let provider = provider(&server);

    assert!(!provider.capabilities().embedding);
    let result = provider.embed(&EmbeddingRequest::new("hello")).await;
    assert!(matches!(
        result,
        Err(HeimdallError::CapabilityUnsupported("embed"))
    ));
}
