//! Runtime and index configuration.
//!
//! Environment variables:
//! - `PINECONE_API_KEY` (optional here; a missing key fails on the first call)
//! - `PINECONE_CONTROLLER_URL` (default: `https://api.pinecone.io`)
//! - `PINECONE_API_VERSION` (default: `2024-07`)
//! - `PINECONE_INDEX` (default: `cohere-pinecone-scraped-data`)
//! - `PINECONE_METRIC` (`cosine` | `dotproduct` | `euclidean`; default: `cosine`)
//! - `PINECONE_CLOUD` / `PINECONE_REGION` (default: `aws` / `us-east-1`)
//! - `PINECONE_UPSERT_BATCH` (default: 128)
//! - `PINECONE_TIMEOUT_SECS` (default: 30)
//! - `PINECONE_READY_TIMEOUT_SECS` (default: 300)
//! - `DOC_ID_STRATEGY` (`positional` | `content_hash`; default: `positional`)
//! - `SEARCH_TOP_K` (default: 5)

use serde::Serialize;

use crate::errors::RagError;
use crate::ids::IdStrategy;

pub const DEFAULT_CONTROLLER_URL: &str = "https://api.pinecone.io";
pub const DEFAULT_API_VERSION: &str = "2024-07";
pub const DEFAULT_INDEX_NAME: &str = "cohere-pinecone-scraped-data";
pub const DEFAULT_UPSERT_BATCH: usize = 128;
pub const DEFAULT_TOP_K: u64 = 5;

/// Similarity metric of the index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceKind {
    /// Cosine similarity (recommended for Cohere embeddings).
    Cosine,
    /// Dot product.
    #[serde(rename = "dotproduct")]
    Dot,
    /// Euclidean distance.
    #[serde(rename = "euclidean")]
    Euclid,
}

impl DistanceKind {
    /// Parses a metric name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "cosine" => Some(DistanceKind::Cosine),
            "dot" | "dotproduct" => Some(DistanceKind::Dot),
            "euclid" | "euclidean" | "l2" => Some(DistanceKind::Euclid),
            _ => None,
        }
    }
}

/// Serverless placement of a newly created index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerlessPlacement {
    pub cloud: String,
    pub region: String,
}

/// Configuration for index creation, ingestion and retrieval.
#[derive(Clone)]
pub struct IndexConfig {
    /// Pinecone API key; `None` is accepted until the first request.
    pub api_key: Option<String>,
    /// Control-plane base URL.
    pub controller_url: String,
    /// Value of the `X-Pinecone-API-Version` header.
    pub api_version: String,
    /// Target index name.
    pub index_name: String,
    /// Similarity metric used when the index has to be created.
    pub metric: DistanceKind,
    /// Where a new index is hosted.
    pub placement: ServerlessPlacement,
    /// Records per upsert call.
    pub upsert_batch: usize,
    /// How document ids are derived.
    pub id_strategy: IdStrategy,
    /// Default number of hits returned by a search.
    pub top_k: u64,
    /// Per-request HTTP timeout.
    pub timeout_secs: u64,
    /// Upper bound on waiting for a new index to report ready.
    pub ready_timeout_secs: u64,
    /// Delay between readiness polls.
    pub ready_poll_ms: u64,
}

impl std::fmt::Debug for IndexConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("controller_url", &self.controller_url)
            .field("api_version", &self.api_version)
            .field("index_name", &self.index_name)
            .field("metric", &self.metric)
            .field("placement", &self.placement)
            .field("upsert_batch", &self.upsert_batch)
            .field("id_strategy", &self.id_strategy)
            .field("top_k", &self.top_k)
            .field("timeout_secs", &self.timeout_secs)
            .field("ready_timeout_secs", &self.ready_timeout_secs)
            .finish()
    }
}

impl IndexConfig {
    /// Creates a default config for the given index name.
    pub fn new_default(index_name: impl Into<String>) -> Self {
        Self {
            api_key: None,
            controller_url: DEFAULT_CONTROLLER_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            index_name: index_name.into(),
            metric: DistanceKind::Cosine,
            placement: ServerlessPlacement {
                cloud: "aws".to_string(),
                region: "us-east-1".to_string(),
            },
            upsert_batch: DEFAULT_UPSERT_BATCH,
            id_strategy: IdStrategy::Positional,
            top_k: DEFAULT_TOP_K,
            timeout_secs: 30,
            ready_timeout_secs: 300,
            ready_poll_ms: 1_000,
        }
    }

    /// Builds configuration from the process environment.
    pub fn from_env() -> Result<Self, RagError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// # Errors
    /// Returns `RagError::Config` on malformed values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RagError> {
        let get = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());

        let mut cfg = Self::new_default(
            get("PINECONE_INDEX").unwrap_or_else(|| DEFAULT_INDEX_NAME.to_string()),
        );
        cfg.api_key = get("PINECONE_API_KEY");

        if let Some(url) = get("PINECONE_CONTROLLER_URL") {
            cfg.controller_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(v) = get("PINECONE_API_VERSION") {
            cfg.api_version = v.trim().to_string();
        }
        if let Some(m) = get("PINECONE_METRIC") {
            cfg.metric = DistanceKind::parse(&m)
                .ok_or_else(|| RagError::Config(format!("PINECONE_METRIC: unknown metric '{m}'")))?;
        }
        if let Some(c) = get("PINECONE_CLOUD") {
            cfg.placement.cloud = c.trim().to_string();
        }
        if let Some(r) = get("PINECONE_REGION") {
            cfg.placement.region = r.trim().to_string();
        }
        if let Some(s) = get("DOC_ID_STRATEGY") {
            cfg.id_strategy = IdStrategy::parse(&s).ok_or_else(|| {
                RagError::Config(format!(
                    "DOC_ID_STRATEGY: expected 'positional' or 'content_hash', got '{s}'"
                ))
            })?;
        }
        if let Some(n) = parse_u64(&get, "PINECONE_UPSERT_BATCH")? {
            cfg.upsert_batch = n as usize;
        }
        if let Some(n) = parse_u64(&get, "SEARCH_TOP_K")? {
            cfg.top_k = n;
        }
        if let Some(n) = parse_u64(&get, "PINECONE_TIMEOUT_SECS")? {
            cfg.timeout_secs = n;
        }
        if let Some(n) = parse_u64(&get, "PINECONE_READY_TIMEOUT_SECS")? {
            cfg.ready_timeout_secs = n;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), RagError> {
        if !(self.controller_url.starts_with("http://") || self.controller_url.starts_with("https://"))
        {
            return Err(RagError::Config(
                "controller_url must start with http:// or https://".into(),
            ));
        }
        if self.index_name.trim().is_empty() {
            return Err(RagError::Config("index_name is empty".into()));
        }
        if self.upsert_batch == 0 {
            return Err(RagError::Config("upsert_batch must be > 0".into()));
        }
        if self.top_k == 0 {
            return Err(RagError::Config("top_k must be > 0".into()));
        }
        Ok(())
    }
}

fn parse_u64(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<u64>, RagError> {
    match get(key) {
        Some(v) => v
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| RagError::Config(format!("{key}: expected unsigned integer, got '{v}'"))),
        None => Ok(None),
    }
}
