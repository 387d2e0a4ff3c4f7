//! OpenAI-compatible completion provider
//!
//! Talks to any chat-completions endpoint with the OpenAI wire shape.
//! Status codes classify failures first; the textual fallback in
//! [`super::classify_failure_text`] only handles transport errors that
//! carry no structured signal.

use reqwest::Client;
use serde_json::json;
use std::time::Duration;

use super::{classify_failure_text, CompletionError, CompletionProvider, Message, Result};
use crate::config::CompletionConfig;

/// Provider for OpenAI-compatible chat-completions APIs
pub struct OpenAiProvider {
    config: CompletionConfig,
    client: Client,
}

impl OpenAiProvider {
    /// Create a new provider from completion configuration
    pub fn new(config: CompletionConfig) -> Self {
        Self {
            config,
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Build the request payload for the chat-completions endpoint
    fn request_body(&self, messages: &[Message]) -> serde_json::Value {
        let api_messages: Vec<serde_json::Value> = messages
            .iter()
            .map(|msg| {
                json!({
                    "role": msg.role.to_string(),
                    "content": msg.content,
                })
            })
            .collect();

        json!({
            "model": self.config.model,
            "messages": api_messages,
        })
    }
}

#[async_trait::async_trait]
impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, messages: &[Message]) -> Result<String> {
        let url = format!("{}/chat/completions", self.config.base_url);

        tracing::debug!(
            "Completion request: model={}, messages={}",
            self.config.model,
            messages.len()
        );

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.config.api_key.unsecure()),
            )
            .json(&self.request_body(messages))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::ConnectionFailed("request timed out".to_string())
                } else if e.is_connect() {
                    CompletionError::ConnectionFailed(format!(
                        "cannot connect to {}",
                        self.config.base_url
                    ))
                } else {
                    classify_failure_text(&e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(match status.as_u16() {
                401 | 403 => CompletionError::AuthenticationFailed(text),
                429 => CompletionError::RateLimited,
                _ => CompletionError::InvalidRequest(format!("{}: {}", status, text)),
            });
        }

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| CompletionError::ParseError(e.to_string()))?;

        let content = data
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .ok_or_else(|| {
                CompletionError::ParseError("No message content in response".to_string())
            })?;

        Ok(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::SecretString;

    fn test_config() -> CompletionConfig {
        CompletionConfig {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: SecretString::new("sk-test"),
        }
    }

    #[test]
    fn test_provider_name() {
        let provider = OpenAiProvider::new(test_config());
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn test_request_body_shape() {
        let provider = OpenAiProvider::new(test_config());
        let messages = vec![
            Message::system("You are a Spanish tutor"),
            Message::user("How do I order coffee?"),
        ];

        let body = provider.request_body(&messages);

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"].as_array().unwrap().len(), 2);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "How do I order coffee?");
    }
}
