//! Memory Store Gateway
//!
//! This module provides the contract for the durable per-user fact store.
//! The MemoryStore trait defines the four operations the session needs
//! (add, search, list, delete), and `normalize_facts` is the single place
//! that maps the store's heterogeneous response shapes onto the canonical
//! [`Fact`] record. Everything above this module depends only on `Fact`.

use async_trait::async_trait;

pub mod hosted;
pub mod local;

/// Result type for memory store operations
pub type Result<T> = std::result::Result<T, MemoryError>;

/// Errors that can occur while talking to the memory store
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    #[error("No stored memory with id {0}")]
    NotFound(String),

    #[error("Memory store authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Memory store unavailable: {0}")]
    Unavailable(String),

    #[error("Memory store network error: {0}")]
    NetworkError(String),

    #[error("Malformed memory store response: {0}")]
    ParseError(String),
}

/// A durable unit of remembered information about a user.
///
/// The id is an opaque token assigned by the store; the text is
/// free-form content the session never interprets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fact {
    /// Store-assigned identifier, unique within the user's scope
    pub id: String,

    /// Natural-language content
    pub text: String,
}

/// Memory store trait implemented by every storage backend
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Returns the name of the backend (e.g., "hosted", "self-hosted")
    fn name(&self) -> &str;

    /// Persist a new fact candidate derived from `text`.
    ///
    /// The store may extract zero or more atomic facts from the text;
    /// callers must not assume a 1:1 mapping.
    async fn add(&self, user_id: &str, text: &str) -> Result<()>;

    /// Facts relevant to `query`, in the store's relevance order.
    async fn search(&self, user_id: &str, query: &str) -> Result<Vec<Fact>>;

    /// Every fact stored for the user, in the store's listing order.
    ///
    /// An empty list is a valid outcome, not an error.
    async fn list_all(&self, user_id: &str) -> Result<Vec<Fact>>;

    /// Delete one fact by its store-assigned id.
    ///
    /// Returns [`MemoryError::NotFound`] when the id is already gone.
    async fn delete(&self, user_id: &str, fact_id: &str) -> Result<()>;
}

/// Normalize a store response into an ordered sequence of facts.
///
/// Stores answer list and search calls with either a bare JSON sequence
/// or an envelope object carrying a `results` field, and name the
/// content key either `memory` or `text`. Records missing an id or a
/// content key are dropped rather than failing the whole response.
pub fn normalize_facts(value: serde_json::Value) -> Result<Vec<Fact>> {
    let items = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut envelope) => match envelope.remove("results") {
            Some(serde_json::Value::Array(items)) => items,
            Some(other) => {
                return Err(MemoryError::ParseError(format!(
                    "'results' field is not a sequence: {other}"
                )))
            }
            None => {
                return Err(MemoryError::ParseError(
                    "response object has no 'results' field".to_string(),
                ))
            }
        },
        other => {
            return Err(MemoryError::ParseError(format!(
                "expected a sequence or envelope, got: {other}"
            )))
        }
    };

    let facts = items
        .iter()
        .filter_map(|item| {
            let id = item.get("id")?.as_str()?;
            let text = item
                .get("memory")
                .or_else(|| item.get("text"))?
                .as_str()?;
            if id.is_empty() || text.is_empty() {
                return None;
            }
            Some(Fact {
                id: id.to_string(),
                text: text.to_string(),
            })
        })
        .collect();

    Ok(facts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_bare_sequence() {
        let value = json!([
            {"id": "a1", "memory": "likes tacos"},
            {"id": "b2", "memory": "is vegetarian"},
        ]);

        let facts = normalize_facts(value).unwrap();

        assert_eq!(facts.len(), 2);
        assert_eq!(facts[0], Fact { id: "a1".into(), text: "likes tacos".into() });
        assert_eq!(facts[1].id, "b2");
    }

    #[test]
    fn test_normalize_results_envelope() {
        let value = json!({
            "results": [{"id": "a1", "memory": "likes tacos"}],
        });

        let facts = normalize_facts(value).unwrap();

        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].text, "likes tacos");
    }

    #[test]
    fn test_normalize_accepts_text_content_key() {
        let value = json!([{"id": "a1", "text": "prefers formal usted"}]);

        let facts = normalize_facts(value).unwrap();

        assert_eq!(facts[0].text, "prefers formal usted");
    }

    #[test]
    fn test_normalize_preserves_order() {
        let value = json!([
            {"id": "3", "memory": "third"},
            {"id": "1", "memory": "first"},
            {"id": "2", "memory": "second"},
        ]);

        let facts = normalize_facts(value).unwrap();
        let ids: Vec<&str> = facts.iter().map(|f| f.id.as_str()).collect();

        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_normalize_drops_incomplete_records() {
        let value = json!([
            {"id": "a1", "memory": "kept"},
            {"memory": "no id"},
            {"id": "b2"},
            {"id": "", "memory": "blank id"},
            "just a string",
        ]);

        let facts = normalize_facts(value).unwrap();

        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].id, "a1");
    }

    #[test]
    fn test_normalize_empty_sequence_is_not_an_error() {
        assert_eq!(normalize_facts(json!([])).unwrap(), vec![]);
        assert_eq!(normalize_facts(json!({"results": []})).unwrap(), vec![]);
    }

    #[test]
    fn test_normalize_rejects_unexpected_shapes() {
        assert!(matches!(
            normalize_facts(json!("nope")),
            Err(MemoryError::ParseError(_))
        ));
        assert!(matches!(
            normalize_facts(json!({"memories": []})),
            Err(MemoryError::ParseError(_))
        ));
        assert!(matches!(
            normalize_facts(json!({"results": "nope"})),
            Err(MemoryError::ParseError(_))
        ));
    }
}
