//! Cohere embedding config loaded from environment variables.
//!
//! # Environment variables
//!
//! - `COHERE_API_KEY`      = API key (optional here; a missing key fails on the first call)
//! - `COHERE_BASE_URL`     = API base (default `https://api.cohere.com`)
//! - `COHERE_EMBED_MODEL`  = model id (default `embed-english-v3.0`)
//! - `COHERE_TRUNCATE`     = `NONE` | `START` | `END` (default `END`)
//! - `COHERE_TIMEOUT_SECS` = HTTP timeout (default 60)
//! - `COHERE_MAX_BATCH`    = texts per request (default 96, the provider limit)

use crate::config::embed_options::Truncate;
use crate::error_handler::{
    ConfigError, EmbedError, opt_u64, opt_var, validate_http_endpoint,
};

pub const DEFAULT_BASE_URL: &str = "https://api.cohere.com";
pub const DEFAULT_MODEL: &str = "embed-english-v3.0";
pub const MAX_TEXTS_PER_CALL: usize = 96;

/// Configuration for the Cohere embedding client.
#[derive(Clone)]
pub struct CohereConfig {
    /// API base URL without the `/v1/...` suffix.
    pub endpoint: String,
    /// Bearer token; `None` is accepted at construction time.
    pub api_key: Option<String>,
    /// Embedding model identifier.
    pub model: String,
    /// Truncation policy for over-long inputs.
    pub truncate: Truncate,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum number of texts per `embed` request.
    pub max_batch: usize,
}

impl std::fmt::Debug for CohereConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CohereConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("truncate", &self.truncate)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_batch", &self.max_batch)
            .finish()
    }
}

impl CohereConfig {
    /// Defaults pointing at the public Cohere API.
    pub fn new_default(api_key: Option<String>) -> Self {
        Self {
            endpoint: DEFAULT_BASE_URL.to_string(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            truncate: Truncate::End,
            timeout_secs: 60,
            max_batch: MAX_TEXTS_PER_CALL,
        }
    }

    /// Builds the config from the process environment.
    ///
    /// # Errors
    /// Returns [`EmbedError::Config`] on malformed values.
    pub fn from_env() -> Result<Self, EmbedError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, EmbedError> {
        let mut cfg = Self::new_default(opt_var(&lookup, "COHERE_API_KEY"));

        if let Some(url) = opt_var(&lookup, "COHERE_BASE_URL") {
            cfg.endpoint = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(model) = lookup("COHERE_EMBED_MODEL") {
            cfg.model = model.trim().to_string();
        }
        if let Some(t) = opt_var(&lookup, "COHERE_TRUNCATE") {
            cfg.truncate = t.parse()?;
        }
        if let Some(secs) = opt_u64(&lookup, "COHERE_TIMEOUT_SECS")? {
            cfg.timeout_secs = secs;
        }
        if let Some(n) = opt_u64(&lookup, "COHERE_MAX_BATCH")? {
            cfg.max_batch = n as usize;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values. The API key is intentionally not checked here.
    pub fn validate(&self) -> Result<(), EmbedError> {
        validate_http_endpoint("COHERE_BASE_URL", &self.endpoint)?;
        if self.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }
        if self.max_batch == 0 || self.max_batch > MAX_TEXTS_PER_CALL {
            return Err(ConfigError::InvalidNumber {
                var: "COHERE_MAX_BATCH",
                reason: "expected 1..=96",
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let cfg = CohereConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(cfg.endpoint, DEFAULT_BASE_URL);
        assert_eq!(cfg.model, "embed-english-v3.0");
        assert_eq!(cfg.truncate, Truncate::End);
        assert_eq!(cfg.max_batch, 96);
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn env_overrides_are_applied() {
        let cfg = CohereConfig::from_lookup(lookup_from(&[
            ("COHERE_API_KEY", "secret"),
            ("COHERE_BASE_URL", "http://localhost:9999/"),
            ("COHERE_TRUNCATE", "none"),
            ("COHERE_MAX_BATCH", "10"),
        ]))
        .unwrap();
        assert_eq!(cfg.api_key.as_deref(), Some("secret"));
        assert_eq!(cfg.endpoint, "http://localhost:9999");
        assert_eq!(cfg.truncate, Truncate::None);
        assert_eq!(cfg.max_batch, 10);
    }

    #[test]
    fn blank_key_is_treated_as_missing() {
        let cfg = CohereConfig::from_lookup(lookup_from(&[("COHERE_API_KEY", "  ")])).unwrap();
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(CohereConfig::from_lookup(lookup_from(&[("COHERE_BASE_URL", "api.cohere.com")])).is_err());
        assert!(CohereConfig::from_lookup(lookup_from(&[("COHERE_EMBED_MODEL", "")])).is_err());
        assert!(CohereConfig::from_lookup(lookup_from(&[("COHERE_MAX_BATCH", "500")])).is_err());
    }

    #[test]
    fn debug_redacts_key() {
        let cfg = CohereConfig::new_default(Some("top-secret".into()));
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("top-secret"));
        assert!(dbg.contains("<redacted>"));
    }
}
