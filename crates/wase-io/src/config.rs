//! # Engine Configuration
//!
//! Connection and paging settings for [`crate::ElasticClient`]. Deserialized
//! from the `[engine]` table of the CLI config file; every field has a default.

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Servers tried in order; later ones are used when earlier ones are unreachable.
    #[serde(default = "default_servers")]
    pub servers: Vec<String>,
    /// Index pattern queried.
    #[serde(default = "default_index")]
    pub index: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Scroll context lifetime between pages (engine time unit syntax).
    #[serde(default = "default_scroll_keepalive")]
    pub scroll_keepalive: String,
    #[serde(default = "default_scroll_page_size")]
    pub scroll_page_size: u32,
    /// Appended to terms-aggregation fields (the not-analyzed sub-field).
    #[serde(default = "default_keyword_suffix")]
    pub keyword_suffix: String,
    /// Bucket ceiling used for unbounded terms aggregations.
    #[serde(default = "default_max_buckets")]
    pub max_buckets: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            servers: default_servers(),
            index: default_index(),
            timeout_secs: default_timeout_secs(),
            scroll_keepalive: default_scroll_keepalive(),
            scroll_page_size: default_scroll_page_size(),
            keyword_suffix: default_keyword_suffix(),
            max_buckets: default_max_buckets(),
        }
    }
}

impl EngineConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_servers() -> Vec<String> {
    vec!["localhost".to_string()]
}
fn default_index() -> String {
    "wase-*".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_scroll_keepalive() -> String {
    "1m".to_string()
}
fn default_scroll_page_size() -> u32 {
    500
}
fn default_keyword_suffix() -> String {
    ".raw".to_string()
}
fn default_max_buckets() -> u32 {
    10_000
}

/// Expand a server shorthand into a base URL.
///
/// `host` → `http://host:9200`, `host:port` → `http://host:port`; values with
/// a scheme are kept as given. Trailing slashes are dropped.
pub fn normalize_server(server: &str) -> String {
    let server = server.trim().trim_end_matches('/');
    if server.contains("://") {
        return server.to_string();
    }
    let has_port = server
        .rsplit_once(':')
        .is_some_and(|(host, port)| !host.is_empty() && port.parse::<u16>().is_ok());
    if has_port {
        format!("http://{}", server)
    } else {
        format!("http://{}:9200", server)
    }
}
