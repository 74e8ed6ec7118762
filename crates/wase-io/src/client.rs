//! # Elasticsearch Client
//!
//! Blocking HTTP client implementing [`SearchEngine`]. Requests go to the
//! configured servers in order; a server that cannot be reached (connect
//! failure or timeout) is skipped in favour of the next one. Any other
//! failure is returned as-is.

use reqwest::blocking::Client;
use reqwest::Method;
use serde_json::Value;
use wase_core::{DocumentStream, QuerySpec, SearchEngine, SearchResponse};

use crate::config::{normalize_server, EngineConfig};
use crate::dsl;
use crate::error::EngineError;
use crate::scroll::{total_hits, ScrollIter};

pub struct ElasticClient {
    http: Client,
    servers: Vec<String>,
    config: EngineConfig,
}

impl ElasticClient {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let servers: Vec<String> = config
            .servers
            .iter()
            .filter(|s| !s.trim().is_empty())
            .map(|s| normalize_server(s))
            .collect();
        if servers.is_empty() {
            return Err(EngineError::NoServers);
        }

        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(EngineError::Client)?;

        Ok(Self {
            http,
            servers,
            config,
        })
    }

    /// Send a JSON request to the first reachable server and decode the JSON reply.
    pub(crate) fn send(&self, method: Method, path: &str, body: &Value) -> Result<Value, EngineError> {
        let mut last_err = EngineError::NoServers;

        for server in &self.servers {
            let url = format!("{}{}", server, path);
            tracing::debug!("{} {}", method, url);

            let response = match self.http.request(method.clone(), url.as_str()).json(body).send() {
                Ok(response) => response,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    tracing::warn!("Search server {} unreachable: {}", server, e);
                    last_err = EngineError::Transport { url, source: e };
                    continue;
                }
                Err(e) => return Err(EngineError::Transport { url, source: e }),
            };

            let status = response.status();
            if !status.is_success() {
                let body = response.text().unwrap_or_default();
                return Err(EngineError::Status { url, status, body });
            }

            return response.json::<Value>().map_err(|e| EngineError::Decode {
                url,
                reason: e.to_string(),
            });
        }

        Err(last_err)
    }

    fn index_path(&self, suffix: &str) -> String {
        format!("/{}/{}", self.config.index, suffix)
    }

    /// Fetch the page following `scroll_id`.
    pub(crate) fn scroll_next(&self, scroll_id: &str) -> Result<Value, EngineError> {
        let body = serde_json::json!({
            "scroll": self.config.scroll_keepalive,
            "scroll_id": scroll_id,
        });
        self.send(Method::POST, "/_search/scroll", &body)
    }

    /// Release the server-side scroll context.
    pub(crate) fn clear_scroll(&self, scroll_id: &str) -> Result<(), EngineError> {
        let body = serde_json::json!({ "scroll_id": [scroll_id] });
        self.send(Method::DELETE, "/_search/scroll", &body).map(|_| ())
    }
}

impl SearchEngine for ElasticClient {
    type Error = EngineError;

    fn execute(&self, spec: QuerySpec) -> Result<SearchResponse, EngineError> {
        let body = dsl::search_body(&spec, &self.config);
        tracing::debug!("search body: {}", body);

        let path = self.index_path("_search");
        let mut response = self.send(Method::POST, &path, &body)?;

        let total_hits = total_hits(&response).ok_or_else(|| EngineError::Decode {
            url: path.clone(),
            reason: "missing hits.total".into(),
        })?;
        let aggregations = response
            .get_mut("aggregations")
            .map(Value::take)
            .unwrap_or(Value::Null);

        Ok(SearchResponse {
            total_hits,
            aggregations,
        })
    }

    fn scan(&self, spec: QuerySpec) -> Result<DocumentStream<'_, EngineError>, EngineError> {
        let body = dsl::scroll_body(&spec, &self.config);
        tracing::debug!("scroll body: {}", body);

        let path = self.index_path(&format!("_search?scroll={}", self.config.scroll_keepalive));
        let first = self.send(Method::POST, &path, &body)?;
        let iter = ScrollIter::open(self, &path, first)?;
        Ok(Box::new(iter))
    }
}
