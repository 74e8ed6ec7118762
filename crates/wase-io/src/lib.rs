//! # wase-io — Elasticsearch Client of WASE Query
//!
//! Renders a [`wase_core::QuerySpec`] into the Elasticsearch query DSL and
//! runs it over blocking HTTP. Aggregating queries go through `_search`;
//! raw document scans page lazily through the scroll API.

pub mod client;
pub mod config;
pub mod dsl;
pub mod error;
pub mod scroll;

#[cfg(test)]
mod test_helpers;

pub use client::ElasticClient;
pub use config::EngineConfig;
pub use error::EngineError;
