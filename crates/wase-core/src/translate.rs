//! # Query Translator
//!
//! One entry point per intent. Each returns a [`QuerySpec`]; only
//! [`header_values`] carries its own aggregation tree, the others get the
//! default URL rollup from [`with_default_aggregation`].

use crate::aggregation;
use crate::error::QueryError;
use crate::filters::{build_filters, FilterArgs};
use crate::{fields, Predicate, QuerySpec};

/// Documents where `field` does not match `name`, or where it does when
/// `invert` is set.
pub fn missing(field: &str, name: &str, filters: &FilterArgs, invert: bool) -> Result<QuerySpec, QueryError> {
    let mut main = Predicate::match_field(field, name);
    if !invert {
        main = main.negate();
    }

    let filters = build_filters(&filters.methods, &filters.response_codes)?;
    Ok(QuerySpec::new(main).with_filters(filters))
}

pub fn missing_header(header: &str, filters: &FilterArgs, invert: bool) -> Result<QuerySpec, QueryError> {
    missing(fields::RESPONSE_HEADER_NAMES, header, filters, invert)
}

pub fn missing_parameter(parameter: &str, filters: &FilterArgs, invert: bool) -> Result<QuerySpec, QueryError> {
    missing(fields::REQUEST_PARAMETER_NAMES, parameter, filters, invert)
}

/// Documents carrying `header`, aggregated by header value and then by URL.
pub fn header_values(header: &str) -> QuerySpec {
    QuerySpec::new(Predicate::match_field(fields::RESPONSE_HEADER_NAMES, header))
        .with_aggregation(aggregation::header_value_rollup(header))
}

pub fn free_text(query: &str) -> QuerySpec {
    QuerySpec::new(Predicate::FreeText(query.to_string()))
}

/// Attach the distinct-URL rollup unless the spec already aggregates or the
/// caller wants raw document fields instead.
pub fn with_default_aggregation(spec: QuerySpec, raw_fields: bool) -> QuerySpec {
    if raw_fields || spec.aggregation().is_some() {
        return spec;
    }
    spec.with_aggregation(aggregation::url_rollup())
}
