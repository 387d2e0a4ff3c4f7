//! Completion Service Gateway
//!
//! This module provides the contract for the stateless completion service
//! that generates tutor replies. The CompletionProvider trait defines what
//! the session controller needs: a message list in, generated text out,
//! with failures classified into a closed set of variants.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod openai;

/// Result type for completion operations
pub type Result<T> = std::result::Result<T, CompletionError>;

/// Errors that can occur while generating a reply
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Completion failed: {0}")]
    Other(String),
}

/// Classify an unstructured failure message into a [`CompletionError`].
///
/// Fallback adapter only: callers must prefer the collaborator's
/// structured signals (HTTP status, reqwest error kind) and reach for
/// substring matching when none exist.
pub fn classify_failure_text(message: &str) -> CompletionError {
    let lowered = message.to_lowercase();

    if lowered.contains("authentication") || lowered.contains("api key") {
        CompletionError::AuthenticationFailed(message.to_string())
    } else if lowered.contains("connection") || lowered.contains("refused") {
        CompletionError::ConnectionFailed(message.to_string())
    } else {
        CompletionError::Other(message.to_string())
    }
}

/// Message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Role of the message sender (system, user, assistant)
    pub role: MessageRole,

    /// Content of the message
    pub content: String,
}

impl Message {
    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System message
    System,

    /// User message
    User,

    /// Assistant message
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// Completion provider trait implemented by every completion backend
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the name of the provider (e.g., "openai")
    fn name(&self) -> &str;

    /// Generate a reply from the conversation so far
    ///
    /// # Arguments
    /// * `messages` - System context followed by the user's message
    ///
    /// # Returns
    /// * `Ok(String)` - The generated reply text
    /// * `Err(CompletionError)` - If the request fails
    async fn generate(&self, messages: &[Message]) -> Result<String>;
}
