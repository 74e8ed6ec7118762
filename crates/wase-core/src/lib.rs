//! # wase-core — Query Model of WASE Query
//!
//! Turns the four analyst intents (missing header, missing parameter,
//! header values, free-text search) into an engine-agnostic [`QuerySpec`],
//! and flattens the engine's nested bucket tree back into [`ResultRow`]s.
//!
//! Nothing in this crate performs I/O. The search engine is reached through
//! the [`engine::SearchEngine`] trait, implemented in `wase-io`.

pub mod aggregation;
pub mod engine;
pub mod error;
pub mod filters;
pub mod flatten;
pub mod translate;

pub use aggregation::{AggregationKind, AggregationNode};
pub use engine::{Document, DocumentStream, SearchEngine, SearchResponse};
pub use error::{FieldLookupError, QueryError};
pub use flatten::{FieldValue, ResultRow};

// =============================================================================
// Document Fields
// =============================================================================

/// Dotted field paths of a captured request/response document.
pub mod fields {
    pub const REQUEST_URL: &str = "request.url";
    pub const REQUEST_METHOD: &str = "request.method";
    pub const REQUEST_PARAMETER_NAMES: &str = "request.parameternames";
    pub const RESPONSE_STATUS: &str = "response.status";
    pub const RESPONSE_HEADER_NAMES: &str = "response.headernames";
    /// Nested sub-document array of `{name, value}` pairs.
    pub const RESPONSE_HEADERS: &str = "response.headers";
    pub const RESPONSE_HEADER_NAME: &str = "response.headers.name";
    pub const RESPONSE_HEADER_VALUE: &str = "response.headers.value";
}

// =============================================================================
// Predicates & Filters
// =============================================================================

/// The main (scoring) predicate of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Full-text match of `value` against `field`.
    MatchField { field: String, value: String },
    /// Documents NOT matching the inner predicate.
    Negate(Box<Predicate>),
    /// Engine query-string syntax, passed through untouched.
    FreeText(String),
}

impl Predicate {
    pub fn match_field(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::MatchField {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn negate(self) -> Self {
        Self::Negate(Box::new(self))
    }
}

/// A non-scoring restriction. All filters of a query are AND-ed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Field equals any of the values.
    TermsIn { field: String, values: Vec<String> },
    /// `low <= field <= high`.
    RangeInclusive { field: String, low: i64, high: i64 },
    /// Exact term match. Kept as a string so codes like `2*` reach the engine as-is.
    TermEquals { field: String, value: String },
}

// =============================================================================
// Query Specification
// =============================================================================

/// A complete engine-agnostic query: one main predicate, conjunctive filters
/// and an optional aggregation tree.
///
/// Built once per invocation and handed by value to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    main: Predicate,
    filters: Vec<Filter>,
    aggregation: Option<AggregationNode>,
}

impl QuerySpec {
    pub fn new(main: Predicate) -> Self {
        Self {
            main,
            filters: Vec::new(),
            aggregation: None,
        }
    }

    pub fn with_filters(mut self, filters: Vec<Filter>) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_aggregation(mut self, aggregation: AggregationNode) -> Self {
        self.aggregation = Some(aggregation);
        self
    }

    pub fn main(&self) -> &Predicate {
        &self.main
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn aggregation(&self) -> Option<&AggregationNode> {
        self.aggregation.as_ref()
    }
}
