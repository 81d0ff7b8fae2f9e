//! Core data models used by the library.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{DistanceKind, ServerlessPlacement};

/// One line of input text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    pub text: String,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Metadata stored alongside each vector: the original line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub text: String,
}

/// `(id, vector, metadata)` triple sent to the index.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IndexRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: RecordMetadata,
}

/// Parameters for create-if-absent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexSpec {
    pub name: String,
    pub dimension: usize,
    pub metric: DistanceKind,
    pub placement: ServerlessPlacement,
}

/// Handle to an existing remote index, usable for upserts and queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteIndexHandle {
    pub name: String,
    /// Data-plane address (bare host or full URL).
    pub host: String,
    /// Dimension reported by the provider.
    pub dimension: Option<usize>,
}

/// Raw match as returned by the provider.
#[derive(Clone, Debug, Deserialize)]
pub struct ScoredMatch {
    pub id: String,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

/// A validated search hit: score plus the original document text.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchHit {
    pub id: String,
    pub score: f32,
    pub text: String,
}

impl fmt::Display for SearchHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}: {}", self.score, self.text)
    }
}

/// Index statistics as reported by `describe_index_stats`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    #[serde(default)]
    pub dimension: Option<usize>,
    #[serde(default)]
    pub index_fullness: f32,
    #[serde(default)]
    pub total_vector_count: u64,
    #[serde(default)]
    pub namespaces: BTreeMap<String, NamespaceStats>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceStats {
    #[serde(default)]
    pub vector_count: u64,
}

impl fmt::Display for IndexStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dimension={} total_vector_count={} index_fullness={}",
            self.dimension
                .map(|d| d.to_string())
                .unwrap_or_else(|| "?".into()),
            self.total_vector_count,
            self.index_fullness
        )?;
        for (ns, s) in &self.namespaces {
            let name = if ns.is_empty() { "<default>" } else { ns.as_str() };
            write!(f, " ns[{name}]={}", s.vector_count)?;
        }
        Ok(())
    }
}

/// Outcome of a full index build.
#[derive(Clone, Debug)]
pub struct BuildReport {
    pub handle: RemoteIndexHandle,
    /// Dimension used when creating the index (first vector length).
    pub dimension: usize,
    /// Whether this run created the index.
    pub created: bool,
    /// Number of upsert calls issued.
    pub batches: usize,
    /// Sum of `upsertedCount` over all batches.
    pub upserted: u64,
    pub stats: IndexStats,
}
