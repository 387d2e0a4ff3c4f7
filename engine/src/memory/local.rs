//! Self-Hosted Memory Store
//!
//! Client for a memory store server running on the user's own machine,
//! typically at http://localhost:8000. No credentials are required; the
//! server owns its on-disk index, so this process holds exactly one
//! handle to it for the session's lifetime.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

use super::{normalize_facts, Fact, MemoryError, MemoryStore, Result};

/// Client for a self-hosted memory store server
pub struct SelfHostedStore {
    /// Base URL of the local server (e.g., "http://localhost:8000")
    base_url: String,

    /// HTTP client for API requests
    client: Client,
}

impl SelfHostedStore {
    /// Create a new self-hosted store client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    fn map_send_error(&self, e: reqwest::Error) -> MemoryError {
        if e.is_timeout() {
            MemoryError::NetworkError("request timed out".to_string())
        } else if e.is_connect() {
            MemoryError::Unavailable(format!(
                "cannot connect to the memory store at {}. Is the server running?",
                self.base_url
            ))
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
        Err(MemoryError::Unavailable(format!(
            "store API error ({}): {}",
            status, text
        )))
    }
}

#[async_trait]
impl MemoryStore for SelfHostedStore {
    fn name(&self) -> &str {
        "self-hosted"
    }

    async fn add(&self, user_id: &str, text: &str) -> Result<()> {
        let url = format!("{}/memories", self.base_url);
        let payload = json!({
            "messages": [{"role": "user", "content": text}],
            "user_id": user_id,
        });

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn search(&self, user_id: &str, query: &str) -> Result<Vec<Fact>> {
        let url = format!("{}/search", self.base_url);
        let payload = json!({"query": query, "user_id": user_id});

        let response = self
            .client
            .post(&url)
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
        let url = format!("{}/memories", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("user_id", user_id)])
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
        let url = format!("{}/memories/{}", self.base_url, fact_id);

        let response = self
            .client
            .delete(&url)
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
        let store = SelfHostedStore::new("http://localhost:8000");
        assert_eq!(store.name(), "self-hosted");
    }
}
