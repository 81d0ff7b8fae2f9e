use futures::future::BoxFuture;

use crate::errors::RagError;

/// Role of the texts being embedded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmbedMode {
    /// Corpus documents written into the index.
    Document,
    /// A search query compared against the corpus.
    Query,
}

/// Provider interface for embedding generation.
///
/// Implementations return exactly one vector per input text, in input order.
/// Async is required because real providers perform HTTP requests.
pub trait EmbeddingsProvider: Send + Sync {
    fn embed<'a>(
        &'a self,
        texts: &'a [String],
        mode: EmbedMode,
    ) -> BoxFuture<'a, Result<Vec<Vec<f32>>, RagError>>;
}

pub mod cohere;
