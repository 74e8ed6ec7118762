//! # Query DSL Rendering
//!
//! The only place that speaks Elasticsearch vocabulary. Maps the
//! engine-agnostic [`QuerySpec`] (predicate, filters, aggregation tree) onto
//! request bodies, keeping aggregation names intact so results can be
//! addressed by the flattener.

use serde_json::{json, Map, Value};
use wase_core::{AggregationKind, AggregationNode, Filter, Predicate, QuerySpec};

use crate::config::EngineConfig;

pub fn render_predicate(predicate: &Predicate) -> Value {
    match predicate {
        Predicate::MatchField { field, value } => json!({ "match": { field.as_str(): value } }),
        Predicate::Negate(inner) => json!({ "bool": { "must_not": [render_predicate(inner)] } }),
        Predicate::FreeText(query) => json!({ "query_string": { "query": query } }),
    }
}

pub fn render_filter(filter: &Filter) -> Value {
    match filter {
        Filter::TermsIn { field, values } => json!({ "terms": { field.as_str(): values } }),
        Filter::RangeInclusive { field, low, high } => {
            json!({ "range": { field.as_str(): { "gte": low, "lte": high } } })
        }
        Filter::TermEquals { field, value } => json!({ "term": { field.as_str(): value } }),
    }
}

/// The `query` clause: the bare main predicate, or a `bool` wrapping it
/// together with the filters.
pub fn render_query(spec: &QuerySpec) -> Value {
    let main = render_predicate(spec.main());
    if spec.filters().is_empty() {
        return main;
    }
    let filters: Vec<Value> = spec.filters().iter().map(render_filter).collect();
    json!({ "bool": { "must": [main], "filter": filters } })
}

/// Render one aggregation node (and its children) as `{name: {...}}`.
pub fn render_aggregations(node: &AggregationNode, config: &EngineConfig) -> Value {
    let mut body = match &node.kind {
        AggregationKind::Terms { field } => {
            let field = format!("{}{}", field, config.keyword_suffix);
            json!({ "terms": { "field": field, "size": config.max_buckets } })
        }
        AggregationKind::Nested { path } => json!({ "nested": { "path": path } }),
        AggregationKind::Filter(predicate) => json!({ "filter": render_predicate(predicate) }),
        AggregationKind::ReverseNested => json!({ "reverse_nested": {} }),
    };

    if !node.children.is_empty() {
        let mut children = Map::new();
        for child in &node.children {
            if let Value::Object(rendered) = render_aggregations(child, config) {
                children.extend(rendered);
            }
        }
        body["aggs"] = Value::Object(children);
    }

    let mut wrapper = Map::new();
    wrapper.insert(node.name.clone(), body);
    Value::Object(wrapper)
}

/// Body for a single `_search` round trip. Only counts and buckets are
/// read back, so no hits are requested.
pub fn search_body(spec: &QuerySpec, config: &EngineConfig) -> Value {
    let mut body = json!({
        "query": render_query(spec),
        "size": 0,
    });
    if let Some(aggregation) = spec.aggregation() {
        body["aggs"] = render_aggregations(aggregation, config);
    }
    body
}

/// Body opening a scroll. Sorted by `_doc`, the cheapest order to page in.
pub fn scroll_body(spec: &QuerySpec, config: &EngineConfig) -> Value {
    json!({
        "query": render_query(spec),
        "size": config.scroll_page_size,
        "sort": ["_doc"],
    })
}
