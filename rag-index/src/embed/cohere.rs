//! Cohere embedding provider.
//!
//! Adapts [`embed_service::CohereService`] to [`EmbeddingsProvider`], mapping
//! [`EmbedMode`] onto Cohere's `input_type`.

use std::sync::Arc;

use embed_service::{CohereService, InputType};
use futures::future::BoxFuture;

use crate::embed::{EmbedMode, EmbeddingsProvider};
use crate::errors::RagError;

impl From<EmbedMode> for InputType {
    fn from(mode: EmbedMode) -> Self {
        match mode {
            EmbedMode::Document => InputType::SearchDocument,
            EmbedMode::Query => InputType::SearchQuery,
        }
    }
}

#[derive(Clone)]
pub struct CohereEmbedder {
    svc: Arc<CohereService>,
}

impl CohereEmbedder {
    pub fn new(svc: Arc<CohereService>) -> Self {
        Self { svc }
    }
}

impl EmbeddingsProvider for CohereEmbedder {
    fn embed<'a>(
        &'a self,
        texts: &'a [String],
        mode: EmbedMode,
    ) -> BoxFuture<'a, Result<Vec<Vec<f32>>, RagError>> {
        Box::pin(async move {
            let vectors = self.svc.embed(texts, mode.into()).await?;
            if vectors.len() != texts.len() {
                return Err(RagError::EmbeddingShape {
                    texts: texts.len(),
                    vectors: vectors.len(),
                });
            }
            Ok(vectors)
        })
    }
}
