//! Query runner: embed the query text and ask the index for the closest records.

use tracing::{info, trace};

use crate::embed::{EmbedMode, EmbeddingsProvider};
use crate::errors::RagError;
use crate::index_api::VectorIndexApi;
use crate::record::{RemoteIndexHandle, ScoredMatch, SearchHit};

/// Embeds `query` and returns up to `top_k` hits in provider order
/// (descending similarity). Results are neither re-sorted nor truncated here.
///
/// # Errors
/// - [`RagError::EmbeddingShape`] if the provider does not return exactly one vector
/// - [`RagError::Decode`] if a match carries no `text` metadata
/// - embedding or Pinecone failures
pub async fn search(
    handle: &RemoteIndexHandle,
    query: &str,
    top_k: u64,
    embedder: &dyn EmbeddingsProvider,
    api: &dyn VectorIndexApi,
) -> Result<Vec<SearchHit>, RagError> {
    trace!("retrieve::search index={} top_k={top_k}", handle.name);

    let texts = [query.to_string()];
    let mut vectors = embedder.embed(&texts, EmbedMode::Query).await?;
    if vectors.len() != 1 {
        return Err(RagError::EmbeddingShape {
            texts: 1,
            vectors: vectors.len(),
        });
    }
    let qv = vectors.remove(0);
    info!(target: "rag_index::retrieve", "Query embedding shape: (1, {})", qv.len());

    let matches = api.query(handle, &qv, top_k).await?;

    let hits = matches
        .into_iter()
        .map(to_hit)
        .collect::<Result<Vec<_>, _>>()?;

    trace!("retrieve::search hits={}", hits.len());
    Ok(hits)
}

fn to_hit(m: ScoredMatch) -> Result<SearchHit, RagError> {
    let text = m
        .metadata
        .as_ref()
        .and_then(|md| md.get("text"))
        .and_then(|v| v.as_str())
        .ok_or_else(|| RagError::Decode(format!("match '{}' has no text metadata", m.id)))?
        .to_string();
    Ok(SearchHit {
        id: m.id,
        score: m.score,
        text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeEmbedder, FakeIndex};

    fn handle() -> RemoteIndexHandle {
        RemoteIndexHandle {
            name: "test-index".into(),
            host: "test-index.fake.local".into(),
            dimension: Some(16),
        }
    }

    fn scored(id: &str, score: f32, text: Option<&str>) -> ScoredMatch {
        let metadata = text.map(|t| {
            let mut md = serde_json::Map::new();
            md.insert("text".into(), serde_json::Value::String(t.into()));
            md
        });
        ScoredMatch {
            id: id.into(),
            score,
            metadata,
        }
    }

    fn seed(api: &FakeIndex, texts: &[&str]) {
        let mut store = api.store.lock().unwrap();
        for (i, t) in texts.iter().enumerate() {
            store.insert(i.to_string(), (FakeEmbedder::vector_for(t, 16), t.to_string()));
        }
    }

    #[tokio::test]
    async fn top_k_larger_than_corpus_returns_all_records() {
        let embedder = FakeEmbedder::new(16);
        let api = FakeIndex::default();
        seed(&api, &["alpha", "beta", "gamma"]);

        let hits = search(&handle(), "alpha", 5, &embedder, &api).await.unwrap();

        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].text, "alpha");
        assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(*api.queries.lock().unwrap(), vec![5]);
        assert_eq!(
            *embedder.calls.lock().unwrap(),
            vec![(1, EmbedMode::Query)]
        );
    }

    #[tokio::test]
    async fn provider_order_is_preserved() {
        let embedder = FakeEmbedder::new(16);
        let api = FakeIndex {
            canned_matches: Some(vec![
                scored("2", 0.91, Some("Your money is protected up to £85,000.")),
                scored("0", 0.40, Some("Junior ISA basics")),
                scored("1", 0.55, Some("Out of order on purpose")),
            ]),
            ..FakeIndex::default()
        };

        let hits = search(&handle(), "FSCS", 5, &embedder, &api).await.unwrap();

        let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "0", "1"]);
        assert_eq!(hits[0].to_string(), "0.91: Your money is protected up to £85,000.");
    }

    #[tokio::test]
    async fn match_without_text_is_a_decode_error() {
        let embedder = FakeEmbedder::new(16);
        let api = FakeIndex {
            canned_matches: Some(vec![scored("0", 0.9, Some("ok")), scored("1", 0.8, None)]),
            ..FakeIndex::default()
        };

        let err = search(&handle(), "q", 5, &embedder, &api).await.unwrap_err();
        assert!(matches!(err, RagError::Decode(msg) if msg.contains("'1'")));
    }

    #[tokio::test]
    async fn empty_answer_from_embedder_is_a_shape_error() {
        let mut embedder = FakeEmbedder::new(16);
        embedder.short_answer = true;
        let api = FakeIndex::default();

        let err = search(&handle(), "q", 5, &embedder, &api).await.unwrap_err();

        assert!(matches!(err, RagError::EmbeddingShape { texts: 1, vectors: 0 }));
        assert!(api.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_index_gives_no_hits() {
        let embedder = FakeEmbedder::new(16);
        let api = FakeIndex::default();

        let hits = search(&handle(), "anything", 3, &embedder, &api).await.unwrap();
        assert!(hits.is_empty());
    }
}
