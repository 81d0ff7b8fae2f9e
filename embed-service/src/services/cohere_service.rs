//! Cohere embedding client.
//!
//! Thin, non-streaming client around the Cohere REST API:
//! - `POST {endpoint}/v1/embed`: embeddings for a list of texts
//!
//! Inputs longer than [`CohereConfig::max_batch`] are split into consecutive
//! requests that run one after another; the vectors are concatenated so the
//! output always lines up index-for-index with the input.
//!
//! A missing API key is only reported when [`CohereService::embed`] is called,
//! so wiring the pipeline never fails on credentials alone.

use std::time::{Duration, Instant};

use reqwest::{StatusCode, header};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::{
    config::{
        cohere_config::CohereConfig,
        embed_options::{InputType, Truncate},
    },
    error_handler::{
        ConfigError, EmbedError, HttpError, Provider, ProviderError, ProviderErrorKind,
        make_snippet, validate_http_endpoint,
    },
};

const TARGET: &str = "embed_service::cohere";

/// Client for the Cohere `embed` endpoint.
///
/// Constructed once from a complete [`CohereConfig`]; keeps a preconfigured
/// `reqwest::Client` with timeout and JSON content type.
#[derive(Debug)]
pub struct CohereService {
    client: reqwest::Client,
    cfg: CohereConfig,
    url_embed: String,
}

impl CohereService {
    /// Creates a new [`CohereService`].
    ///
    /// # Errors
    /// - [`EmbedError::Config`] if the endpoint or model is invalid
    /// - [`EmbedError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: CohereConfig) -> Result<Self, EmbedError> {
        validate_http_endpoint("COHERE_BASE_URL", cfg.endpoint.trim())?;
        if cfg.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .default_headers(headers)
            .build()?;

        let base = cfg.endpoint.trim().trim_end_matches('/').to_string();
        let url_embed = format!("{base}/v1/embed");

        info!(
            target: TARGET,
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = cfg.timeout_secs,
            has_api_key = cfg.api_key.is_some(),
            "CohereService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_embed,
        })
    }

    pub fn model(&self) -> &str {
        &self.cfg.model
    }

    /// Embeds `texts` and returns one vector per text, in input order.
    ///
    /// # Errors
    /// - [`EmbedError::Config`] with `MissingVar("COHERE_API_KEY")` if no key is configured
    /// - [`EmbedError::Provider`] with `Unauthorized` for 401/403 responses
    /// - [`EmbedError::Provider`] with `HttpStatus` for other non-2xx responses
    /// - [`EmbedError::Provider`] with `Decode` if the body is not the expected shape
    /// - [`EmbedError::HttpTransport`] for network failures and timeouts
    pub async fn embed(
        &self,
        texts: &[String],
        input_type: InputType,
    ) -> Result<Vec<Vec<f32>>, EmbedError> {
        let api_key = self
            .cfg
            .api_key
            .as_deref()
            .ok_or(ConfigError::MissingVar("COHERE_API_KEY"))?;

        let mut out = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(self.cfg.max_batch.max(1)) {
            let vectors = self.embed_chunk(api_key, chunk, input_type).await?;
            out.extend(vectors);
        }
        Ok(out)
    }

    async fn embed_chunk(
        &self,
        api_key: &str,
        texts: &[String],
        input_type: InputType,
    ) -> Result<Vec<Vec<f32>>, EmbedError> {
        let started = Instant::now();
        let body = EmbedRequest {
            texts,
            model: &self.cfg.model,
            input_type,
            truncate: self.cfg.truncate,
        };

        debug!(
            target: TARGET,
            model = %self.cfg.model,
            texts = texts.len(),
            input_type = input_type.as_str(),
            "POST {}", self.url_embed
        );

        let resp = self
            .client
            .post(&self.url_embed)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let url = self.url_embed.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                target: TARGET,
                %status,
                %url,
                %snippet,
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "Cohere /v1/embed returned non-success status"
            );

            let http = HttpError {
                status,
                url,
                snippet,
            };
            let kind = match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    ProviderErrorKind::Unauthorized(http)
                }
                _ => ProviderErrorKind::HttpStatus(http),
            };
            return Err(ProviderError::new(Provider::Cohere, kind).into());
        }

        let parsed: EmbedResponse = resp.json().await.map_err(|e| {
            ProviderError::new(
                Provider::Cohere,
                ProviderErrorKind::Decode(format!("serde error: {e}; expected `embeddings`")),
            )
        })?;

        if parsed.embeddings.len() != texts.len() {
            return Err(ProviderError::new(
                Provider::Cohere,
                ProviderErrorKind::Decode(format!(
                    "expected {} embeddings, got {}",
                    texts.len(),
                    parsed.embeddings.len()
                )),
            )
            .into());
        }

        debug!(
            target: TARGET,
            texts = texts.len(),
            dim = parsed.embeddings.first().map(|v| v.len()).unwrap_or(0),
            latency_ms = started.elapsed().as_millis(),
            "embed batch completed"
        );

        Ok(parsed.embeddings)
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

/// Request body for `/v1/embed`.
#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    texts: &'a [String],
    model: &'a str,
    input_type: InputType,
    truncate: Truncate,
}

/// Response body for `/v1/embed` (float embeddings only).
#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}
