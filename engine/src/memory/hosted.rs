//! Hosted Memory Store
//!
//! Client for the managed memory service. Every request carries the
//! account token; responses for list and search calls arrive as either a
//! bare sequence or a `results` envelope and go through
//! [`super::normalize_facts`].

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

use super::{normalize_facts, Fact, MemoryError, MemoryStore, Result};
use crate::secrets::SecretString;

/// Client for the hosted memory service
pub struct HostedStore {
    /// Base URL of the service API (e.g., "https://api.mem0.ai/v1")
    base_url: String,

    /// Account API token
    api_key: SecretString,

    /// HTTP client for API requests
    client: Client,
}

impl HostedStore {
    /// Create a new hosted store client
    pub fn new(base_url: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    fn auth_header(&self) -> String {
        format!("Token {}", self.api_key.unsecure())
    }

    fn map_send_error(&self, e: reqwest::Error) -> MemoryError {
        if e.is_timeout() {
            MemoryError::NetworkError("request timed out".to_string())
        } else if e.is_connect() {
            MemoryError::Unavailable(format!("cannot connect to {}", self.base_url))
        } else {
            MemoryError::NetworkError(e.to_string())
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        Err(match status.as_u16() {
            401 | 403 => MemoryError::AuthenticationFailed(text),
            _ => MemoryError::Unavailable(format!("store API error ({}): {}", status, text)),
        })
    }
}

#[async_trait]
impl MemoryStore for HostedStore {
    fn name(&self) -> &str {
        "hosted"
    }

    async fn add(&self, user_id: &str, text: &str) -> Result<()> {
        let url = format!("{}/memories/", self.base_url);
        let payload = json!({
            "messages": [{"role": "user", "content": text}],
            "user_id": user_id,
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.auth_header())
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        Self::check_status(response).await?;
        tracing::debug!("Fact candidate submitted for user {}", user_id);
        Ok(())
    }

    async fn search(&self, user_id: &str, query: &str) -> Result<Vec<Fact>> {
        let url = format!("{}/memories/search/", self.base_url);
        let payload = json!({"query": query, "user_id": user_id});

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.auth_header())
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let data: serde_json::Value = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| MemoryError::ParseError(e.to_string()))?;

        normalize_facts(data)
    }

    async fn list_all(&self, user_id: &str) -> Result<Vec<Fact>> {
        let url = format!("{}/memories/", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("user_id", user_id)])
            .header("Authorization", self.auth_header())
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let data: serde_json::Value = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| MemoryError::ParseError(e.to_string()))?;

        normalize_facts(data)
    }

    async fn delete(&self, _user_id: &str, fact_id: &str) -> Result<()> {
        let url = format!("{}/memories/{}/", self.base_url, fact_id);

        let response = self
            .client
            .delete(&url)
            .header("Authorization", self.auth_header())
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if response.status().as_u16() == 404 {
            return Err(MemoryError::NotFound(fact_id.to_string()));
        }

        Self::check_status(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_name() {
        let store = HostedStore::new("https://api.mem0.ai/v1", SecretString::new("m0-test"));
        assert_eq!(store.name(), "hosted");
    }

    #[test]
    fn test_auth_header_uses_token_scheme() {
        let store = HostedStore::new("https://api.mem0.ai/v1", SecretString::new("m0-test"));
        assert_eq!(store.auth_header(), "Token m0-test");
    }
}
