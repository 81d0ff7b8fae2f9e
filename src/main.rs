use std::error::Error;
use std::sync::Arc;

use embed_service::{CohereConfig, CohereService, telemetry};
use rag_index::{CohereEmbedder, IndexConfig, SemanticIndex, read_documents};
use tracing::{Level, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_DOCUMENTS_PATH: &str = "scraped.txt";

const QUERY: &str = "What protection does the Financial Services Compensation Scheme (FSCS) \
                     provide for Moneybox Junior ISA holders?";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file if present.
    dotenvy::dotenv().ok();

    let filter = telemetry::env_filter_with_level(
        "info",
        &["semantic_search", "rag_index", "embed_service"],
        Level::INFO,
    );
    tracing_subscriber::registry()
        .with(filter)
        .with(telemetry::layer())
        .try_init()?;

    let embedder = CohereEmbedder::new(Arc::new(CohereService::new(CohereConfig::from_env()?)?));
    let index = SemanticIndex::new(IndexConfig::from_env()?)?;

    let path =
        std::env::var("DOCUMENTS_PATH").unwrap_or_else(|_| DEFAULT_DOCUMENTS_PATH.to_string());
    let documents = read_documents(&path)?;
    info!(path = %path, documents = documents.len(), "documents loaded");

    let report = index.build_index(&documents, &embedder).await?;

    let hits = index.search(&report.handle, QUERY, None, &embedder).await?;
    for hit in &hits {
        println!("{hit}");
    }

    Ok(())
}
