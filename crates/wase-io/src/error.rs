//! # Engine Errors
//!
//! Failures talking to the search engine. None are recovered locally.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no search server configured")]
    NoServers,

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered {status}: {body}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("unexpected response from {url}: {reason}")]
    Decode { url: String, reason: String },
}
