//! Unified error types for the crate.

use embed_service::EmbedError;
use thiserror::Error;

/// Top-level error for rag-index operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// I/O or filesystem errors (reading the document file).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// A provider call needs an API key that was never configured.
    #[error("missing API key: set {0}")]
    MissingApiKey(&'static str),

    /// Embedding provider failure (wrapped as-is).
    #[error(transparent)]
    Embedding(#[from] EmbedError),

    /// The provider returned a different number of vectors than texts sent.
    #[error("embedding shape mismatch: sent {texts} texts, got {vectors} vectors")]
    EmbeddingShape { texts: usize, vectors: usize },

    /// Nothing to index.
    #[error("no documents to index")]
    EmptyInput,

    /// Non-success HTTP status from Pinecone.
    #[error("pinecone HTTP {status} from {url}: {snippet}")]
    Pinecone {
        status: u16,
        url: String,
        snippet: String,
    },

    /// Pinecone answered 2xx with a body we could not use.
    #[error("pinecone decode error: {0}")]
    Decode(String),

    /// Network/TLS/timeout errors from the HTTP client.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A freshly created index did not become ready in time.
    #[error("index '{name}' not ready after {waited_secs}s")]
    IndexNotReady { name: String, waited_secs: u64 },
}

impl RagError {
    /// True for credential problems on either provider.
    pub fn is_auth(&self) -> bool {
        match self {
            RagError::MissingApiKey(_) => true,
            RagError::Embedding(e) => e.is_auth(),
            RagError::Pinecone { status, .. } => *status == 401 || *status == 403,
            _ => false,
        }
    }
}
