//! In-memory fakes for the provider traits, shared by unit tests.

use std::collections::BTreeMap;
use std::future::ready;
use std::sync::Mutex;

use embed_service::{ConfigError, EmbedError};
use futures::future::BoxFuture;

use crate::embed::{EmbedMode, EmbeddingsProvider};
use crate::errors::RagError;
use crate::index_api::{IndexDescription, VectorIndexApi};
use crate::record::{IndexRecord, IndexSpec, IndexStats, NamespaceStats, RemoteIndexHandle, ScoredMatch};

/// Deterministic bag-of-bytes embedder.
pub struct FakeEmbedder {
    pub dim: usize,
    /// Overrides the vector length of every text except the first.
    pub tail_dim: Option<usize>,
    pub unauthorized: bool,
    /// Drop the last vector from every answer.
    pub short_answer: bool,
    pub calls: Mutex<Vec<(usize, EmbedMode)>>,
}

impl FakeEmbedder {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            tail_dim: None,
            unauthorized: false,
            short_answer: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn unauthorized() -> Self {
        Self {
            unauthorized: true,
            ..Self::new(8)
        }
    }

    pub fn vector_for(text: &str, dim: usize) -> Vec<f32> {
        let n = dim.max(1);
        let mut v = vec![0.0_f32; n];
        for b in text.bytes() {
            v[b as usize % n] += 1.0;
        }
        v.truncate(dim);
        v
    }
}

impl EmbeddingsProvider for FakeEmbedder {
    fn embed<'a>(
        &'a self,
        texts: &'a [String],
        mode: EmbedMode,
    ) -> BoxFuture<'a, Result<Vec<Vec<f32>>, RagError>> {
        self.calls.lock().unwrap().push((texts.len(), mode));
        let out = if self.unauthorized {
            Err(RagError::Embedding(EmbedError::Config(ConfigError::MissingVar(
                "COHERE_API_KEY",
            ))))
        } else {
            let mut vectors: Vec<Vec<f32>> = texts
                .iter()
                .enumerate()
                .map(|(i, t)| {
                    let dim = if i == 0 { self.dim } else { self.tail_dim.unwrap_or(self.dim) };
                    Self::vector_for(t, dim)
                })
                .collect();
            if self.short_answer {
                vectors.pop();
            }
            Ok(vectors)
        };
        Box::pin(ready(out))
    }
}

/// In-memory stand-in for the hosted index.
#[derive(Default)]
pub struct FakeIndex {
    pub existing: Mutex<Vec<String>>,
    pub created: Mutex<Vec<IndexSpec>>,
    /// Ids of each upsert call, in call order.
    pub batches: Mutex<Vec<Vec<String>>>,
    pub store: Mutex<BTreeMap<String, (Vec<f32>, String)>>,
    /// Zero-based upsert call that fails.
    pub fail_upsert_at: Option<usize>,
    pub never_ready: bool,
    /// Returned verbatim by `query` when set.
    pub canned_matches: Option<Vec<ScoredMatch>>,
    pub queries: Mutex<Vec<u64>>,
}

impl FakeIndex {
    pub fn with_existing(name: &str) -> Self {
        let idx = Self::default();
        idx.existing.lock().unwrap().push(name.to_string());
        idx
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().unwrap().iter().map(|b| b.len()).collect()
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 { 0.0 } else { dot / (na * nb) }
}

impl VectorIndexApi for FakeIndex {
    fn list_index_names(&self) -> BoxFuture<'_, Result<Vec<String>, RagError>> {
        Box::pin(ready(Ok(self.existing.lock().unwrap().clone())))
    }

    fn create_index<'a>(&'a self, spec: &'a IndexSpec) -> BoxFuture<'a, Result<(), RagError>> {
        self.created.lock().unwrap().push(spec.clone());
        self.existing.lock().unwrap().push(spec.name.clone());
        Box::pin(ready(Ok(())))
    }

    fn describe_index<'a>(
        &'a self,
        name: &'a str,
    ) -> BoxFuture<'a, Result<IndexDescription, RagError>> {
        let dimension = self
            .created
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.dimension);
        Box::pin(ready(Ok(IndexDescription {
            name: name.to_string(),
            dimension,
            host: if self.never_ready { String::new() } else { format!("{name}.fake.local") },
            ready: !self.never_ready,
        })))
    }

    fn upsert<'a>(
        &'a self,
        _index: &'a RemoteIndexHandle,
        records: &'a [IndexRecord],
    ) -> BoxFuture<'a, Result<u64, RagError>> {
        let call = self.batches.lock().unwrap().len();
        if self.fail_upsert_at == Some(call) {
            return Box::pin(ready(Err(RagError::Pinecone {
                status: 400,
                url: "fake://upsert".into(),
                snippet: "Vector dimension 6 does not match the dimension of the index 4".into(),
            })));
        }
        self.batches
            .lock()
            .unwrap()
            .push(records.iter().map(|r| r.id.clone()).collect());
        let mut store = self.store.lock().unwrap();
        for r in records {
            store.insert(r.id.clone(), (r.values.clone(), r.metadata.text.clone()));
        }
        Box::pin(ready(Ok(records.len() as u64)))
    }

    fn query<'a>(
        &'a self,
        _index: &'a RemoteIndexHandle,
        vector: &'a [f32],
        top_k: u64,
    ) -> BoxFuture<'a, Result<Vec<ScoredMatch>, RagError>> {
        self.queries.lock().unwrap().push(top_k);
        if let Some(canned) = &self.canned_matches {
            return Box::pin(ready(Ok(canned.clone())));
        }
        let mut scored: Vec<ScoredMatch> = self
            .store
            .lock()
            .unwrap()
            .iter()
            .map(|(id, (values, text))| {
                let mut metadata = serde_json::Map::new();
                metadata.insert("text".into(), serde_json::Value::String(text.clone()));
                ScoredMatch {
                    id: id.clone(),
                    score: cosine(vector, values),
                    metadata: Some(metadata),
                }
            })
            .collect();
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k as usize);
        Box::pin(ready(Ok(scored)))
    }

    fn describe_index_stats<'a>(
        &'a self,
        _index: &'a RemoteIndexHandle,
    ) -> BoxFuture<'a, Result<IndexStats, RagError>> {
        let store = self.store.lock().unwrap();
        let total = store.len() as u64;
        let dimension = store.values().next().map(|(v, _)| v.len());
        let mut namespaces = BTreeMap::new();
        namespaces.insert(String::new(), NamespaceStats { vector_count: total });
        Box::pin(ready(Ok(IndexStats {
            dimension,
            index_fullness: 0.0,
            total_vector_count: total,
            namespaces,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_for_buckets_bytes_by_dimension() {
        // 'a' = 97, 'b' = 98, 'e' = 101 → buckets 1, 2, 1 for dim 4.
        assert_eq!(FakeEmbedder::vector_for("abe", 4), vec![0.0, 2.0, 1.0, 0.0]);
        assert!(FakeEmbedder::vector_for("abe", 0).is_empty());
    }
}
