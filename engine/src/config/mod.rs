//! Configuration management
//!
//! This module handles loading and validation of the lingo configuration.
//! All settings are sourced from environment variables, read once at
//! startup (a `.env` file is honored if present).
//!
//! # Configuration Sections
//!
//! - **session**: User identifier and target language
//! - **store**: Memory store backend selection and connection parameters
//! - **completion**: Completion service endpoint, model, and credentials
//!
//! # Environment Variables
//!
//! | Variable               | Default                      |
//! |------------------------|------------------------------|
//! | `LINGO_USER_ID`        | `student`                    |
//! | `LINGO_LANGUAGE`       | `Spanish`                    |
//! | `LINGO_LOG`            | `info`                       |
//! | `LINGO_STORE_BACKEND`  | `self-hosted`                |
//! | `LINGO_STORE_URL`      | backend-dependent, see below |
//! | `MEM0_API_KEY`         | required for `hosted`        |
//! | `LINGO_COMPLETION_URL` | `https://api.openai.com/v1`  |
//! | `LINGO_MODEL`          | `gpt-4o-mini`                |
//! | `OPENAI_API_KEY`       | required                     |

use std::fmt;

use crate::secrets::SecretString;

/// Errors produced while reading configuration from the environment.
///
/// These are the only fatal errors in the program: they abort startup
/// before any session state exists.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Required environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("Invalid store backend '{0}'. Must be one of: hosted, self-hosted")]
    InvalidBackend(String),

    #[error("Invalid log level '{0}'. Must be one of: error, warn, info, debug, trace")]
    InvalidLogLevel(String),
}

/// Main configuration structure
///
/// Built once from the environment at startup and treated as immutable
/// for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct Config {
    /// Session identity settings
    pub session: SessionConfig,

    /// Memory store settings
    pub store: StoreConfig,

    /// Completion service settings
    pub completion: CompletionConfig,

    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

/// Session identity configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Owner of every fact this session reads or writes
    pub user_id: String,

    /// Language the tutor teaches (e.g. "Spanish")
    pub language: String,
}

/// Which memory store backend the session talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Managed memory service, authenticated with an API token
    Hosted,

    /// Store server running on the user's own machine
    SelfHosted,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Hosted => write!(f, "hosted"),
            StoreBackend::SelfHosted => write!(f, "self-hosted"),
        }
    }
}

/// Memory store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Selected backend
    pub backend: StoreBackend,

    /// Base URL of the store API
    pub base_url: String,

    /// API token, required when the backend is `Hosted`
    pub api_key: Option<SecretString>,
}

/// Completion service configuration
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// Base URL of the chat-completions API
    pub base_url: String,

    /// Model name
    pub model: String,

    /// API key for the completion service
    pub api_key: SecretString,
}

// Default value functions
fn default_user_id() -> String {
    "student".to_string()
}

fn default_language() -> String {
    "Spanish".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_hosted_store_url() -> String {
    "https://api.mem0.ai/v1".to_string()
}

fn default_self_hosted_store_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_completion_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

impl Config {
    /// Load configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A required credential is absent
    /// - The backend or log level name is not recognized
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// `from_env` delegates here; tests inject plain maps instead of
    /// mutating process-wide environment state.
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let nonempty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = match nonempty("LINGO_STORE_BACKEND") {
            None => StoreBackend::SelfHosted,
            Some(raw) => match raw.trim() {
                "hosted" => StoreBackend::Hosted,
                "self-hosted" => StoreBackend::SelfHosted,
                other => return Err(ConfigError::InvalidBackend(other.to_string())),
            },
        };

        let store_api_key = nonempty("MEM0_API_KEY").map(SecretString::from);
        if backend == StoreBackend::Hosted && store_api_key.is_none() {
            return Err(ConfigError::MissingVar("MEM0_API_KEY"));
        }

        let store_base_url = nonempty("LINGO_STORE_URL").unwrap_or_else(|| match backend {
            StoreBackend::Hosted => default_hosted_store_url(),
            StoreBackend::SelfHosted => default_self_hosted_store_url(),
        });

        let completion_api_key = nonempty("OPENAI_API_KEY")
            .map(SecretString::from)
            .ok_or(ConfigError::MissingVar("OPENAI_API_KEY"))?;

        let log_level = nonempty("LINGO_LOG").unwrap_or_else(default_log_level);
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&log_level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(log_level));
        }

        Ok(Self {
            session: SessionConfig {
                user_id: nonempty("LINGO_USER_ID").unwrap_or_else(default_user_id),
                language: nonempty("LINGO_LANGUAGE").unwrap_or_else(default_language),
            },
            store: StoreConfig {
                backend,
                base_url: store_base_url,
                api_key: store_api_key,
            },
            completion: CompletionConfig {
                base_url: nonempty("LINGO_COMPLETION_URL").unwrap_or_else(default_completion_url),
                model: nonempty("LINGO_MODEL").unwrap_or_else(default_model),
                api_key: completion_api_key,
            },
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_minimal_environment() {
        let lookup = lookup_from(&[("OPENAI_API_KEY", "sk-test")]);
        let config = Config::from_lookup(&lookup).unwrap();

        assert_eq!(config.session.user_id, "student");
        assert_eq!(config.session.language, "Spanish");
        assert_eq!(config.store.backend, StoreBackend::SelfHosted);
        assert_eq!(config.store.base_url, "http://localhost:8000");
        assert_eq!(config.completion.model, "gpt-4o-mini");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_missing_completion_key_is_fatal() {
        let lookup = lookup_from(&[]);
        let err = Config::from_lookup(&lookup).unwrap_err();

        assert!(matches!(err, ConfigError::MissingVar("OPENAI_API_KEY")));
    }

    #[test]
    fn test_hosted_backend_requires_store_token() {
        let lookup = lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("LINGO_STORE_BACKEND", "hosted"),
        ]);
        let err = Config::from_lookup(&lookup).unwrap_err();

        assert!(matches!(err, ConfigError::MissingVar("MEM0_API_KEY")));
    }

    #[test]
    fn test_hosted_backend_with_token_and_default_url() {
        let lookup = lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("LINGO_STORE_BACKEND", "hosted"),
            ("MEM0_API_KEY", "m0-abc"),
        ]);
        let config = Config::from_lookup(&lookup).unwrap();

        assert_eq!(config.store.backend, StoreBackend::Hosted);
        assert_eq!(config.store.base_url, "https://api.mem0.ai/v1");
        assert_eq!(config.store.api_key.unwrap().unsecure(), "m0-abc");
    }

    #[test]
    fn test_invalid_backend_name() {
        let lookup = lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("LINGO_STORE_BACKEND", "cloud"),
        ]);
        let err = Config::from_lookup(&lookup).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidBackend(name) if name == "cloud"));
    }

    #[test]
    fn test_invalid_log_level() {
        let lookup = lookup_from(&[("OPENAI_API_KEY", "sk-test"), ("LINGO_LOG", "verbose")]);
        let err = Config::from_lookup(&lookup).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidLogLevel(level) if level == "verbose"));
    }

    #[test]
    fn test_explicit_overrides_are_respected() {
        let lookup = lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("LINGO_USER_ID", "beau_01"),
            ("LINGO_LANGUAGE", "Portuguese"),
            ("LINGO_STORE_URL", "http://127.0.0.1:9999"),
            ("LINGO_MODEL", "gpt-4o"),
        ]);
        let config = Config::from_lookup(&lookup).unwrap();

        assert_eq!(config.session.user_id, "beau_01");
        assert_eq!(config.session.language, "Portuguese");
        assert_eq!(config.store.base_url, "http://127.0.0.1:9999");
        assert_eq!(config.completion.model, "gpt-4o");
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let lookup = lookup_from(&[("OPENAI_API_KEY", "sk-test"), ("LINGO_LANGUAGE", "  ")]);
        let config = Config::from_lookup(&lookup).unwrap();

        assert_eq!(config.session.language, "Spanish");
    }
}
