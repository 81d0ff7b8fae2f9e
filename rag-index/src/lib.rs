//! Semantic index over a hosted Pinecone index.
//!
//! This crate provides:
//! - an index builder: embed plain-text documents, create the index if absent,
//!   and upsert `(id, vector, {text})` records in ordered batches
//! - a query runner: embed a question and return the top-K hits with their text
//!
//! Embedding and index providers sit behind [`EmbeddingsProvider`] and
//! [`VectorIndexApi`], so either side can be replaced.

mod config;
mod embed;
mod errors;
mod ids;
mod index_api;
mod ingest;
mod io_text;
mod pinecone_facade;
mod record;
mod retrieve;

#[cfg(test)]
mod testing;

pub use config::{DistanceKind, IndexConfig, ServerlessPlacement};
pub use embed::cohere::CohereEmbedder;
pub use embed::{EmbedMode, EmbeddingsProvider};
pub use errors::RagError;
pub use ids::IdStrategy;
pub use index_api::{IndexDescription, VectorIndexApi};
pub use io_text::read_documents;
pub use pinecone_facade::PineconeFacade;
pub use record::{
    BuildReport, Document, IndexRecord, IndexSpec, IndexStats, NamespaceStats, RecordMetadata,
    RemoteIndexHandle, ScoredMatch, SearchHit,
};

use tracing::trace;

/// High-level facade that wires configuration and the index provider.
///
/// This is the single entry point recommended for application code.
pub struct SemanticIndex {
    cfg: IndexConfig,
    api: Box<dyn VectorIndexApi>,
}

impl SemanticIndex {
    /// Constructs an index backed by Pinecone.
    ///
    /// # Errors
    /// Returns `RagError::Config` on invalid configuration or
    /// `RagError::Transport` if the HTTP client cannot be built.
    pub fn new(cfg: IndexConfig) -> Result<Self, RagError> {
        trace!("SemanticIndex::new index={}", cfg.index_name);
        let api = PineconeFacade::new(&cfg)?;
        Ok(Self {
            cfg,
            api: Box::new(api),
        })
    }

    /// Constructs an index over any provider implementation.
    pub fn with_api(cfg: IndexConfig, api: Box<dyn VectorIndexApi>) -> Self {
        Self { cfg, api }
    }

    pub fn config(&self) -> &IndexConfig {
        &self.cfg
    }

    /// Embeds and uploads `documents`, creating the index when it is absent.
    ///
    /// # Errors
    /// See [`ingest::build_index`].
    pub async fn build_index(
        &self,
        documents: &[Document],
        embedder: &dyn EmbeddingsProvider,
    ) -> Result<BuildReport, RagError> {
        trace!("SemanticIndex::build_index documents={}", documents.len());
        ingest::build_index(&self.cfg, documents, embedder, self.api.as_ref()).await
    }

    /// Returns the top hits for `query`. `top_k` falls back to the configured default.
    ///
    /// # Errors
    /// See [`retrieve::search`].
    pub async fn search(
        &self,
        handle: &RemoteIndexHandle,
        query: &str,
        top_k: Option<u64>,
        embedder: &dyn EmbeddingsProvider,
    ) -> Result<Vec<SearchHit>, RagError> {
        let top_k = top_k.unwrap_or(self.cfg.top_k);
        trace!("SemanticIndex::search top_k={top_k}");
        retrieve::search(handle, query, top_k, embedder, self.api.as_ref()).await
    }
}
