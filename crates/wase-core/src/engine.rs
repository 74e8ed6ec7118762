//! # Search Engine Boundary
//!
//! The contract the core needs from a document search engine. Implemented
//! over HTTP by `wase-io`; tests use in-memory fakes.

use crate::QuerySpec;

/// A captured request/response record, as stored by the engine.
pub type Document = serde_json::Value;

/// Lazy, finite, forward-only sequence of documents.
pub type DocumentStream<'a, E> = Box<dyn Iterator<Item = Result<Document, E>> + 'a>;

/// Result of a non-streaming query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResponse {
    /// Number of documents matching the query.
    pub total_hits: u64,
    /// Nested bucket tree keyed by the names from [`crate::aggregation::names`].
    /// `Null` when the query carried no aggregation.
    pub aggregations: serde_json::Value,
}

pub trait SearchEngine {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Run the query once and return hit count plus aggregation buckets.
    fn execute(&self, spec: QuerySpec) -> Result<SearchResponse, Self::Error>;

    /// Stream every matching document, bypassing aggregation.
    fn scan(&self, spec: QuerySpec) -> Result<DocumentStream<'_, Self::Error>, Self::Error>;
}
