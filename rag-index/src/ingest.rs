//! Index builder: embed documents → ensure index → upsert in batches → stats.
//!
//! Batches are submitted strictly in order, one at a time. The first failing
//! batch aborts the build; batches already accepted stay in the remote index.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::IndexConfig;
use crate::embed::{EmbedMode, EmbeddingsProvider};
use crate::errors::RagError;
use crate::ids::IdStrategy;
use crate::index_api::{IndexDescription, VectorIndexApi};
use crate::record::{
    BuildReport, Document, IndexRecord, IndexSpec, RecordMetadata, RemoteIndexHandle,
};

const TARGET: &str = "rag_index::ingest";

/// Embeds `documents`, makes sure the configured index exists, and uploads
/// every `(id, vector, {text})` record.
///
/// The index dimension is the length of the first vector. Other vectors are
/// not checked here; a mismatch surfaces as a provider error during upsert.
///
/// # Errors
/// - [`RagError::EmptyInput`] if there is nothing to index (no network call is made)
/// - embedding failures, including a missing or rejected API key
/// - any Pinecone failure while listing, creating, describing or upserting
pub async fn build_index(
    cfg: &IndexConfig,
    documents: &[Document],
    embedder: &dyn EmbeddingsProvider,
    api: &dyn VectorIndexApi,
) -> Result<BuildReport, RagError> {
    info!(target: TARGET, index = %cfg.index_name, documents = documents.len(), "build_index: start");
    if documents.is_empty() {
        return Err(RagError::EmptyInput);
    }
    let started = Instant::now();

    let texts: Vec<String> = documents.iter().map(|d| d.text.clone()).collect();
    let vectors = embedder.embed(&texts, EmbedMode::Document).await?;
    if vectors.len() != texts.len() {
        return Err(RagError::EmbeddingShape {
            texts: texts.len(),
            vectors: vectors.len(),
        });
    }

    let dimension = vectors.first().map(Vec::len).unwrap_or_default();
    info!(target: TARGET, "Embeddings shape: ({}, {})", vectors.len(), dimension);

    let (handle, created) = ensure_index(cfg, dimension, api).await?;

    let records = build_records(cfg.id_strategy, documents, vectors);

    let mut upserted: u64 = 0;
    let mut batches = 0usize;
    for chunk in records.chunks(cfg.upsert_batch.max(1)) {
        debug!(
            target: TARGET,
            batch = batches,
            first_id = %chunk[0].id,
            size = chunk.len(),
            "upserting batch"
        );
        upserted += api.upsert(&handle, chunk).await?;
        batches += 1;
    }

    let stats = api.describe_index_stats(&handle).await?;
    info!(target: TARGET, index = %handle.name, "{stats}");

    info!(
        target: TARGET,
        index = %handle.name,
        created,
        batches,
        upserted,
        duration_ms = started.elapsed().as_millis(),
        "build_index: finished"
    );

    Ok(BuildReport {
        handle,
        dimension,
        created,
        batches,
        upserted,
        stats,
    })
}

/// Create-if-absent keyed on the index name, then resolve its data-plane host.
///
/// An existing index is reused as-is, whatever its dimension. Returns the
/// handle and whether this call created the index.
pub async fn ensure_index(
    cfg: &IndexConfig,
    dimension: usize,
    api: &dyn VectorIndexApi,
) -> Result<(RemoteIndexHandle, bool), RagError> {
    let names = api.list_index_names().await?;
    let exists = names.iter().any(|n| n == &cfg.index_name);

    if exists {
        debug!(target: TARGET, index = %cfg.index_name, "index exists, reusing");
        let desc = api.describe_index(&cfg.index_name).await?;
        if let Some(existing) = desc.dimension {
            if existing != dimension {
                // Left to the provider: the upsert will be rejected.
                warn!(
                    target: TARGET,
                    index = %cfg.index_name,
                    existing,
                    embedding = dimension,
                    "existing index dimension differs from embeddings"
                );
            }
        }
        if desc.host.trim().is_empty() {
            return Err(RagError::Decode(format!(
                "index '{}' has no host",
                cfg.index_name
            )));
        }
        return Ok((desc.handle(), false));
    }

    let spec = IndexSpec {
        name: cfg.index_name.clone(),
        dimension,
        metric: cfg.metric,
        placement: cfg.placement.clone(),
    };
    api.create_index(&spec).await?;
    let desc = wait_until_ready(cfg, api).await?;
    Ok((desc.handle(), true))
}

/// Polls describe until the index reports ready with a host.
async fn wait_until_ready(
    cfg: &IndexConfig,
    api: &dyn VectorIndexApi,
) -> Result<IndexDescription, RagError> {
    let started = Instant::now();
    let limit = Duration::from_secs(cfg.ready_timeout_secs);
    loop {
        let desc = api.describe_index(&cfg.index_name).await?;
        if desc.ready && !desc.host.trim().is_empty() {
            info!(
                target: TARGET,
                index = %desc.name,
                host = %desc.host,
                waited_ms = started.elapsed().as_millis(),
                "index ready"
            );
            return Ok(desc);
        }
        if started.elapsed() >= limit {
            return Err(RagError::IndexNotReady {
                name: cfg.index_name.clone(),
                waited_secs: started.elapsed().as_secs(),
            });
        }
        debug!(target: TARGET, index = %cfg.index_name, "index not ready yet");
        tokio::time::sleep(Duration::from_millis(cfg.ready_poll_ms)).await;
    }
}

/// Zips documents with their vectors into upsert records.
pub fn build_records(
    strategy: IdStrategy,
    documents: &[Document],
    vectors: Vec<Vec<f32>>,
) -> Vec<IndexRecord> {
    documents
        .iter()
        .zip(vectors)
        .enumerate()
        .map(|(i, (doc, values))| IndexRecord {
            id: strategy.id_for(i, &doc.text),
            values,
            metadata: RecordMetadata {
                text: doc.text.clone(),
            },
        })
        .collect()
}
