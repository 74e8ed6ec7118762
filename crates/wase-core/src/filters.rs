//! # Filter Builder
//!
//! Converts method lists and response-code specifications into [`Filter`]s.
//!
//! Response-code entries are either a range (`200-299`) or a single term
//! (`404`, `2*`). Each entry becomes its own filter, so several
//! `--responsecode` flags are intersected rather than unioned.

use crate::error::QueryError;
use crate::{fields, Filter};

/// User-supplied restrictions shared by the "missing" intents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterArgs {
    pub methods: Vec<String>,
    pub response_codes: Vec<String>,
}

/// Build the filter list: method filter first, then one filter per
/// response-code entry in input order.
pub fn build_filters(methods: &[String], response_codes: &[String]) -> Result<Vec<Filter>, QueryError> {
    let mut filters = Vec::with_capacity(response_codes.len() + 1);

    if !methods.is_empty() {
        filters.push(Filter::TermsIn {
            field: fields::REQUEST_METHOD.to_string(),
            values: methods.to_vec(),
        });
    }

    for entry in response_codes {
        filters.push(parse_response_code(entry)?);
    }

    Ok(filters)
}

fn parse_response_code(entry: &str) -> Result<Filter, QueryError> {
    let parts: Vec<&str> = entry.split('-').collect();
    if let [low, high] = parts.as_slice() {
        let invalid = || QueryError::InvalidRange {
            entry: entry.to_string(),
        };
        let low = low.trim().parse::<i64>().map_err(|_| invalid())?;
        let high = high.trim().parse::<i64>().map_err(|_| invalid())?;
        return Ok(Filter::RangeInclusive {
            field: fields::RESPONSE_STATUS.to_string(),
            low,
            high,
        });
    }

    Ok(Filter::TermEquals {
        field: fields::RESPONSE_STATUS.to_string(),
        value: entry.to_string(),
    })
}
