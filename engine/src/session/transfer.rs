//! Import/Export document shaping
//!
//! An export is a point-in-time snapshot of every fact the store holds
//! for the user. Import reads only the `text` of each entry; the store
//! assigns fresh ids, so a round-trip never reuses identifiers.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::memory::Fact;

/// Serializable snapshot of a user's stored facts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDocument {
    /// Owner of the exported facts
    pub user_id: String,

    /// Target language of the session that produced the export
    pub language: String,

    /// When the snapshot was taken
    pub export_date: DateTime<Utc>,

    /// Number of entries in `memories`
    pub total_memories: usize,

    /// The facts, in listing order
    pub memories: Vec<ExportedMemory>,
}

/// One exported fact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedMemory {
    /// Natural-language content; the only field import reads
    pub text: String,

    /// The id the fact had at export time, kept for traceability
    pub id: String,
}

impl ExportDocument {
    /// Build a snapshot of `facts` taken at `export_date`
    pub fn new(
        user_id: impl Into<String>,
        language: impl Into<String>,
        export_date: DateTime<Utc>,
        facts: &[Fact],
    ) -> Self {
        Self {
            user_id: user_id.into(),
            language: language.into(),
            export_date,
            total_memories: facts.len(),
            memories: facts
                .iter()
                .map(|fact| ExportedMemory {
                    text: fact.text.clone(),
                    id: fact.id.clone(),
                })
                .collect(),
        }
    }
}

/// File name for an export taken at `at`: `memories_<user_id>_<timestamp>.json`
pub fn export_filename(user_id: &str, at: DateTime<Utc>) -> String {
    format!("memories_{}_{}.json", user_id, at.format("%Y%m%d_%H%M%S"))
}

/// Write an export document into `dir`, returning the file's path
pub async fn write_document(document: &ExportDocument, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(export_filename(&document.user_id, document.export_date));
    let contents =
        serde_json::to_string_pretty(document).context("Failed to serialize export document")?;

    tokio::fs::write(&path, contents)
        .await
        .with_context(|| format!("Failed to write export file {}", path.display()))?;

    Ok(path)
}

/// Read and parse an export document from `path`
pub async fn read_document(path: &Path) -> Result<ExportDocument> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Cannot read import file {}", path.display()))?;

    serde_json::from_str(&contents)
        .with_context(|| format!("Malformed export document in {}", path.display()))
}
