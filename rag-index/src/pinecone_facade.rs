//! Thin adapter around the Pinecone REST API.
//!
//! This facade concentrates all Pinecone interactions behind
//! [`VectorIndexApi`], keeping the rest of the crate decoupled from wire
//! formats:
//! - control plane (`{controller}/indexes`): list, create, describe
//! - data plane (`https://{host}`): upsert, query, describe_index_stats
//!
//! Every request carries `Api-Key` and `X-Pinecone-API-Version`. Responses are
//! decoded into typed structs at this boundary.

use std::time::{Duration, Instant};

use embed_service::error_handler::make_snippet;
use futures::future::BoxFuture;
use reqwest::{Method, RequestBuilder, StatusCode, header};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::IndexConfig;
use crate::errors::RagError;
use crate::index_api::{IndexDescription, VectorIndexApi};
use crate::record::{IndexRecord, IndexSpec, IndexStats, RemoteIndexHandle, ScoredMatch};

const TARGET: &str = "rag_index::pinecone";

/// A facade over the Pinecone REST API.
pub struct PineconeFacade {
    client: reqwest::Client,
    api_key: Option<String>,
    controller_url: String,
}

impl PineconeFacade {
    /// Creates a new facade from the given configuration.
    ///
    /// The API key is not required here; requests fail with
    /// `RagError::MissingApiKey` when it is absent.
    pub fn new(cfg: &IndexConfig) -> Result<Self, RagError> {
        cfg.validate()?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            "x-pinecone-api-version",
            header::HeaderValue::from_str(&cfg.api_version)
                .map_err(|e| RagError::Config(format!("PINECONE_API_VERSION: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .default_headers(headers)
            .build()?;

        info!(
            target: TARGET,
            controller = %cfg.controller_url,
            api_version = %cfg.api_version,
            has_api_key = cfg.api_key.is_some(),
            "PineconeFacade initialized"
        );

        Ok(Self {
            client,
            api_key: cfg.api_key.clone(),
            controller_url: cfg.controller_url.trim_end_matches('/').to_string(),
        })
    }

    fn request(&self, method: Method, url: &str) -> Result<RequestBuilder, RagError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(RagError::MissingApiKey("PINECONE_API_KEY"))?;
        Ok(self.client.request(method, url).header("api-key", key))
    }

    /// Sends the request and decodes a JSON body from a 2xx answer.
    async fn send_json<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        url: &str,
    ) -> Result<T, RagError> {
        let started = Instant::now();
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(status_error(resp, url, started).await);
        }
        let text = resp.text().await?;
        serde_json::from_str(&text).map_err(|e| RagError::Decode(format!("{url}: {e}")))
    }
}

/// Builds `RagError::Pinecone` from a non-success response.
async fn status_error(resp: reqwest::Response, url: &str, started: Instant) -> RagError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    let snippet = make_snippet(&body);
    error!(
        target: TARGET,
        %status,
        %url,
        %snippet,
        latency_ms = started.elapsed().as_millis(),
        "Pinecone returned non-success status"
    );
    RagError::Pinecone {
        status: status.as_u16(),
        url: url.to_string(),
        snippet,
    }
}

/// Resolves a data-plane URL; bare hosts get `https://`.
pub(crate) fn data_url(host: &str, path: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        format!("{host}{path}")
    } else {
        format!("https://{host}{path}")
    }
}

impl VectorIndexApi for PineconeFacade {
    fn list_index_names(&self) -> BoxFuture<'_, Result<Vec<String>, RagError>> {
        Box::pin(async move {
            let url = format!("{}/indexes", self.controller_url);
            debug!(target: TARGET, "GET {url}");
            let req = self.request(Method::GET, &url)?;
            let list: IndexList = self.send_json(req, &url).await?;
            Ok(list.indexes.into_iter().map(|i| i.name).collect())
        })
    }

    fn create_index<'a>(&'a self, spec: &'a IndexSpec) -> BoxFuture<'a, Result<(), RagError>> {
        Box::pin(async move {
            let url = format!("{}/indexes", self.controller_url);
            let body = CreateIndexRequest::from_spec(spec);
            info!(
                target: TARGET,
                index = %spec.name,
                dimension = spec.dimension,
                metric = ?spec.metric,
                cloud = %spec.placement.cloud,
                region = %spec.placement.region,
                "creating index"
            );

            let started = Instant::now();
            let resp = self.request(Method::POST, &url)?.json(&body).send().await?;
            match resp.status() {
                s if s.is_success() => Ok(()),
                StatusCode::CONFLICT => {
                    debug!(target: TARGET, index = %spec.name, "index already exists");
                    Ok(())
                }
                _ => Err(status_error(resp, &url, started).await),
            }
        })
    }

    fn describe_index<'a>(
        &'a self,
        name: &'a str,
    ) -> BoxFuture<'a, Result<IndexDescription, RagError>> {
        Box::pin(async move {
            let url = format!("{}/indexes/{}", self.controller_url, name);
            debug!(target: TARGET, "GET {url}");
            let req = self.request(Method::GET, &url)?;
            let model: IndexModel = self.send_json(req, &url).await?;
            Ok(IndexDescription {
                name: model.name,
                dimension: model.dimension,
                host: model.host.unwrap_or_default(),
                ready: model.status.map(|s| s.ready).unwrap_or(false),
            })
        })
    }

    fn upsert<'a>(
        &'a self,
        index: &'a RemoteIndexHandle,
        records: &'a [IndexRecord],
    ) -> BoxFuture<'a, Result<u64, RagError>> {
        Box::pin(async move {
            let url = data_url(&index.host, "/vectors/upsert");
            debug!(target: TARGET, index = %index.name, records = records.len(), "POST {url}");
            let req = self
                .request(Method::POST, &url)?
                .json(&UpsertRequest { vectors: records });
            let resp: UpsertResponse = self.send_json(req, &url).await?;
            Ok(resp.upserted_count)
        })
    }

    fn query<'a>(
        &'a self,
        index: &'a RemoteIndexHandle,
        vector: &'a [f32],
        top_k: u64,
    ) -> BoxFuture<'a, Result<Vec<ScoredMatch>, RagError>> {
        Box::pin(async move {
            let url = data_url(&index.host, "/query");
            debug!(target: TARGET, index = %index.name, top_k, "POST {url}");
            let body = QueryRequest {
                vector,
                top_k,
                include_metadata: true,
                include_values: false,
            };
            let req = self.request(Method::POST, &url)?.json(&body);
            let resp: QueryResponse = self.send_json(req, &url).await?;
            Ok(resp.matches)
        })
    }

    fn describe_index_stats<'a>(
        &'a self,
        index: &'a RemoteIndexHandle,
    ) -> BoxFuture<'a, Result<IndexStats, RagError>> {
        Box::pin(async move {
            let url = data_url(&index.host, "/describe_index_stats");
            debug!(target: TARGET, index = %index.name, "POST {url}");
            let req = self
                .request(Method::POST, &url)?
                .json(&serde_json::json!({}));
            self.send_json(req, &url).await
        })
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

#[derive(Debug, Deserialize)]
struct IndexList {
    #[serde(default)]
    indexes: Vec<IndexModel>,
}

#[derive(Debug, Deserialize)]
struct IndexModel {
    name: String,
    #[serde(default)]
    dimension: Option<usize>,
    #[serde(default)]
    host: Option<String>,
    #[serde(default)]
    status: Option<IndexStatus>,
}

#[derive(Debug, Deserialize)]
struct IndexStatus {
    #[serde(default)]
    ready: bool,
}

#[derive(Debug, Serialize)]
struct CreateIndexRequest<'a> {
    name: &'a str,
    dimension: usize,
    metric: crate::config::DistanceKind,
    spec: CreateIndexSpec<'a>,
}

#[derive(Debug, Serialize)]
struct CreateIndexSpec<'a> {
    serverless: Serverless<'a>,
}

#[derive(Debug, Serialize)]
struct Serverless<'a> {
    cloud: &'a str,
    region: &'a str,
}

impl<'a> CreateIndexRequest<'a> {
    fn from_spec(spec: &'a IndexSpec) -> Self {
        Self {
            name: &spec.name,
            dimension: spec.dimension,
            metric: spec.metric,
            spec: CreateIndexSpec {
                serverless: Serverless {
                    cloud: &spec.placement.cloud,
                    region: &spec.placement.region,
                },
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct UpsertRequest<'a> {
    vectors: &'a [IndexRecord],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
    #[serde(default)]
    upserted_count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: u64,
    include_metadata: bool,
    include_values: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<ScoredMatch>,
}
