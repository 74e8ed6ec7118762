//! # Intent Dispatcher
//!
//! Maps an [`Intent`] to its translator call and flattening mode, runs the
//! query against a [`SearchEngine`] and writes the resulting lines.

use std::io::Write;
use thiserror::Error;

use wase_core::filters::FilterArgs;
use wase_core::flatten::{flatten_documents, flatten_header_values, flatten_urls};
use wase_core::{translate, QueryError, QuerySpec, SearchEngine};

use crate::output::{write_row, NO_MATCHES};

/// The four query types exposed on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    MissingHeader {
        header: String,
        filters: FilterArgs,
        invert: bool,
    },
    MissingParameter {
        parameter: String,
        filters: FilterArgs,
        invert: bool,
    },
    HeaderValues {
        header: String,
        list_urls: bool,
        /// `0` lists every URL.
        max_urls: usize,
    },
    Search {
        query: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Dotted document fields to print instead of the aggregated URL list.
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Number of rows written.
    Rows(usize),
    NoMatches,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error("search failed: {0}")]
    Engine(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("cannot write output: {0}")]
    Output(#[from] std::io::Error),
}

impl RunError {
    /// Usage errors exit with 2, everything else with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Query(_) => 2,
            Self::Engine(_) | Self::Output(_) => 1,
        }
    }
}

fn engine_err<E: std::error::Error + Send + Sync + 'static>(e: E) -> RunError {
    RunError::Engine(Box::new(e))
}

/// Build the query for `intent`. Nothing is sent yet.
pub fn build_spec(intent: &Intent) -> Result<QuerySpec, QueryError> {
    match intent {
        Intent::MissingHeader {
            header,
            filters,
            invert,
        } => translate::missing_header(header, filters, *invert),
        Intent::MissingParameter {
            parameter,
            filters,
            invert,
        } => translate::missing_parameter(parameter, filters, *invert),
        Intent::HeaderValues { header, .. } => Ok(translate::header_values(header)),
        Intent::Search { query } => Ok(translate::free_text(query)),
    }
}

pub fn run<S: SearchEngine, W: Write>(
    engine: &S,
    intent: &Intent,
    options: &RunOptions,
    out: &mut W,
) -> Result<Outcome, RunError> {
    let spec = build_spec(intent)?;
    tracing::debug!("{:?}", spec);

    match intent {
        Intent::HeaderValues {
            list_urls,
            max_urls,
            ..
        } => {
            let response = engine.execute(spec).map_err(engine_err)?;
            let rows = flatten_header_values(&response.aggregations, *list_urls, *max_urls);
            for row in &rows {
                write_row(out, row, *list_urls)?;
            }
            Ok(Outcome::Rows(rows.len()))
        }
        _ if !options.fields.is_empty() => {
            let documents = engine.scan(spec).map_err(engine_err)?;
            let mut rows = flatten_documents(documents, &options.fields).peekable();
            if rows.peek().is_none() {
                return no_matches(out);
            }

            let mut count = 0;
            for row in rows {
                write_row(out, &row.map_err(engine_err)?, false)?;
                count += 1;
            }
            Ok(Outcome::Rows(count))
        }
        _ => {
            let spec = translate::with_default_aggregation(spec, false);
            let response = engine.execute(spec).map_err(engine_err)?;
            if response.total_hits == 0 {
                return no_matches(out);
            }

            let rows = flatten_urls(&response.aggregations);
            for row in &rows {
                write_row(out, row, false)?;
            }
            Ok(Outcome::Rows(rows.len()))
        }
    }
}

fn no_matches<W: Write>(out: &mut W) -> Result<Outcome, RunError> {
    writeln!(out, "{}", NO_MATCHES)?;
    Ok(Outcome::NoMatches)
}
