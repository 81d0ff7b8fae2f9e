//! Vector-index provider interface.
//!
//! The builder and the query runner only talk to this trait, so the hosted
//! provider can be swapped for an in-memory fake in tests. Control-plane calls
//! are keyed by index name; data-plane calls go through a
//! [`RemoteIndexHandle`].

use futures::future::BoxFuture;

use crate::errors::RagError;
use crate::record::{IndexRecord, IndexSpec, IndexStats, RemoteIndexHandle, ScoredMatch};

/// Description of an index as reported by the control plane.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexDescription {
    pub name: String,
    pub dimension: Option<usize>,
    pub host: String,
    pub ready: bool,
}

impl IndexDescription {
    pub fn handle(&self) -> RemoteIndexHandle {
        RemoteIndexHandle {
            name: self.name.clone(),
            host: self.host.clone(),
            dimension: self.dimension,
        }
    }
}

pub trait VectorIndexApi: Send + Sync {
    /// Names of all indexes visible to the account.
    fn list_index_names(&self) -> BoxFuture<'_, Result<Vec<String>, RagError>>;

    /// Creates an index. An "already exists" answer is not an error.
    fn create_index<'a>(&'a self, spec: &'a IndexSpec) -> BoxFuture<'a, Result<(), RagError>>;

    fn describe_index<'a>(&'a self, name: &'a str)
    -> BoxFuture<'a, Result<IndexDescription, RagError>>;

    /// Inserts or overwrites records by id. Returns the provider's upserted count.
    fn upsert<'a>(
        &'a self,
        index: &'a RemoteIndexHandle,
        records: &'a [IndexRecord],
    ) -> BoxFuture<'a, Result<u64, RagError>>;

    /// Top-K similarity query with metadata attached.
    fn query<'a>(
        &'a self,
        index: &'a RemoteIndexHandle,
        vector: &'a [f32],
        top_k: u64,
    ) -> BoxFuture<'a, Result<Vec<ScoredMatch>, RagError>>;

    fn describe_index_stats<'a>(
        &'a self,
        index: &'a RemoteIndexHandle,
    ) -> BoxFuture<'a, Result<IndexStats, RagError>>;
}

impl<T: VectorIndexApi + ?Sized> VectorIndexApi for std::sync::Arc<T> {
    fn list_index_names(&self) -> BoxFuture<'_, Result<Vec<String>, RagError>> {
        (**self).list_index_names()
    }

    fn create_index<'a>(&'a self, spec: &'a IndexSpec) -> BoxFuture<'a, Result<(), RagError>> {
        (**self).create_index(spec)
    }

    fn describe_index<'a>(
        &'a self,
        name: &'a str,
    ) -> BoxFuture<'a, Result<IndexDescription, RagError>> {
        (**self).describe_index(name)
    }

    fn upsert<'a>(
        &'a self,
        index: &'a RemoteIndexHandle,
        records: &'a [IndexRecord],
    ) -> BoxFuture<'a, Result<u64, RagError>> {
        (**self).upsert(index, records)
    }

    fn query<'a>(
        &'a self,
        index: &'a RemoteIndexHandle,
        vector: &'a [f32],
        top_k: u64,
    ) -> BoxFuture<'a, Result<Vec<ScoredMatch>, RagError>> {
        (**self).query(index, vector, top_k)
    }

    fn describe_index_stats<'a>(
        &'a self,
        index: &'a RemoteIndexHandle,
    ) -> BoxFuture<'a, Result<IndexStats, RagError>> {
        (**self).describe_index_stats(index)
    }
}
