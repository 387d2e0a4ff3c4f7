//! Integration tests for the completion provider
//!
//! Validates request shape, reply extraction, and the closed error
//! classification against a mock chat-completions endpoint.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lingo_engine::config::CompletionConfig;
use lingo_engine::llm::{openai::OpenAiProvider, CompletionError, CompletionProvider, Message};
use lingo_engine::secrets::SecretString;

fn provider_for(base_url: String) -> OpenAiProvider {
    OpenAiProvider::new(CompletionConfig {
        base_url,
        model: "gpt-4o-mini".to_string(),
        api_key: SecretString::new("sk-test"),
    })
}

fn tutor_messages() -> Vec<Message> {
    vec![
        Message::system("You are a Spanish tutor. Personalize your teaching using what you know about the student:\nlikes tacos"),
        Message::user("how do I order coffee?"),
    ]
}

#[tokio::test]
async fn generate_returns_the_reply_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({"model": "gpt-4o-mini"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                {"message": {"role": "assistant", "content": "Un café, por favor."}}
            ]
        })))
        .mount(&server)
        .await;

    let reply = provider_for(server.uri())
        .generate(&tutor_messages())
        .await
        .unwrap();

    assert_eq!(reply, "Un café, por favor.");
}

#[tokio::test]
async fn rejected_key_maps_to_authentication_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Incorrect API key provided"))
        .mount(&server)
        .await;

    let err = provider_for(server.uri())
        .generate(&tutor_messages())
        .await
        .unwrap_err();

    assert!(matches!(err, CompletionError::AuthenticationFailed(_)));
}

#[tokio::test]
async fn throttling_maps_to_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = provider_for(server.uri())
        .generate(&tutor_messages())
        .await
        .unwrap_err();

    assert!(matches!(err, CompletionError::RateLimited));
}

#[tokio::test]
async fn unreachable_endpoint_maps_to_connection_error() {
    // Nothing listens on the discard port; the connection is refused.
    let err = provider_for("http://127.0.0.1:9".to_string())
        .generate(&tutor_messages())
        .await
        .unwrap_err();

    assert!(matches!(err, CompletionError::ConnectionFailed(_)));
}

#[tokio::test]
async fn response_without_content_is_a_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = provider_for(server.uri())
        .generate(&tutor_messages())
        .await
        .unwrap_err();

    assert!(matches!(err, CompletionError::ParseError(_)));
}
