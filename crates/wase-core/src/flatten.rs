//! # Result Flattener
//!
//! Walks the engine's nested bucket tree (or the raw document stream) and
//! emits flat [`ResultRow`]s. All functions are pure: flattening the same
//! input twice yields the same rows.

use serde_json::Value;

use crate::aggregation::names;
use crate::engine::Document;
use crate::error::FieldLookupError;
use crate::fields;

/// One line group of output.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultRow {
    /// A distinct URL from the default rollup.
    Url(String),
    /// A header value and (optionally) the URLs it was seen on.
    HeaderValue { value: String, urls: Vec<String> },
    /// One raw document with the requested fields.
    Document {
        url: FieldValue,
        fields: Vec<(String, FieldValue)>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Present(Value),
    /// Rendered as `-`.
    Missing,
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Present(Value::String(s)) => write!(f, "{}", s),
            Self::Present(other) => write!(f, "{}", other),
            Self::Missing => write!(f, "-"),
        }
    }
}

impl From<Result<&Value, FieldLookupError>> for FieldValue {
    fn from(lookup: Result<&Value, FieldLookupError>) -> Self {
        match lookup {
            Ok(value) => Self::Present(value.clone()),
            Err(e) => {
                tracing::trace!("{}", e);
                Self::Missing
            }
        }
    }
}

// =============================================================================
// Search Mode
// =============================================================================

/// One [`ResultRow::Url`] per bucket of the top-level `urls` aggregation.
pub fn flatten_urls(aggregations: &Value) -> Vec<ResultRow> {
    buckets(aggregations, &[names::URLS])
        .iter()
        .map(|bucket| ResultRow::Url(bucket_key(bucket)))
        .collect()
}

/// Resolve a dotted path with at most one level of nesting: `a.b` reads
/// `doc[a][b]`, anything else reads `doc[path]`.
pub fn lookup_field<'a>(doc: &'a Document, path: &str) -> Result<&'a Value, FieldLookupError> {
    let found = match path.split_once('.') {
        Some((outer, inner)) => doc.get(outer).and_then(|v| v.get(inner)),
        None => doc.get(path),
    };
    found.ok_or_else(|| FieldLookupError {
        path: path.to_string(),
    })
}

/// A [`ResultRow::Document`] carrying the URL and each requested field.
pub fn flatten_document(doc: &Document, requested: &[String]) -> ResultRow {
    ResultRow::Document {
        url: lookup_field(doc, fields::REQUEST_URL).into(),
        fields: requested
            .iter()
            .map(|path| (path.clone(), lookup_field(doc, path).into()))
            .collect(),
    }
}

/// Lazily flatten a document stream. Engine errors are passed through.
pub fn flatten_documents<'a, E>(
    documents: impl Iterator<Item = Result<Document, E>> + 'a,
    requested: &'a [String],
) -> impl Iterator<Item = Result<ResultRow, E>> + 'a {
    documents.map(move |doc| doc.map(|d| flatten_document(&d, requested)))
}

// =============================================================================
// Values Mode
// =============================================================================

/// One [`ResultRow::HeaderValue`] per bucket of
/// `response_headers.header.values`.
///
/// With `list_urls`, each row carries the `main.urls` keys in bucket order,
/// at most `max_urls` of them (`0` = all).
pub fn flatten_header_values(aggregations: &Value, list_urls: bool, max_urls: usize) -> Vec<ResultRow> {
    buckets(aggregations, &[names::RESPONSE_HEADERS, names::HEADER, names::VALUES])
        .iter()
        .map(|bucket| {
            let value = bucket_key(bucket);
            let urls = if list_urls {
                let limit = if max_urls == 0 { usize::MAX } else { max_urls };
                let list = bucket_list(bucket, &[names::MAIN, names::URLS]);
                // Past the cap the engine's cut-off is never visible.
                if list.buckets.len() < limit {
                    list.warn_if_truncated(&format!("values[{}].main.urls", value));
                }
                list.buckets.iter().take(limit).map(bucket_key).collect()
            } else {
                Vec::new()
            };
            ResultRow::HeaderValue { value, urls }
        })
        .collect()
}

// =============================================================================
// Helpers
// =============================================================================

/// A `buckets` array and the number of documents the engine left out of it.
struct BucketList<'a> {
    buckets: &'a [Value],
    /// `sum_other_doc_count`: documents in buckets beyond the size limit.
    omitted: u64,
}

impl BucketList<'_> {
    fn warn_if_truncated(&self, path: &str) {
        if self.omitted > 0 {
            tracing::warn!(
                "aggregation '{}' truncated: {} documents fall in buckets that were not returned",
                path,
                self.omitted
            );
        }
    }
}

/// Follow `path` through named aggregations to its bucket list.
fn bucket_list<'a>(tree: &'a Value, path: &[&str]) -> BucketList<'a> {
    let mut node = tree;
    for name in path {
        match node.get(name) {
            Some(next) => node = next,
            None => {
                tracing::debug!("aggregation '{}' missing from result", path.join("."));
                return BucketList {
                    buckets: &[],
                    omitted: 0,
                };
            }
        }
    }
    BucketList {
        buckets: node
            .get("buckets")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]),
        omitted: node
            .get("sum_other_doc_count")
            .and_then(Value::as_u64)
            .unwrap_or(0),
    }
}

/// The `buckets` array at `path`, warning when the engine truncated it.
fn buckets<'a>(tree: &'a Value, path: &[&str]) -> &'a [Value] {
    let list = bucket_list(tree, path);
    list.warn_if_truncated(&path.join("."));
    list.buckets
}

fn bucket_key(bucket: &Value) -> String {
    match bucket.get("key") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}
