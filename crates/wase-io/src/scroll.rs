//! # Scroll Iterator
//!
//! Forward-only view over a scroll query. Holds at most one page of hits in
//! memory and fetches the next page only once the current one is drained.
//! The server-side scroll context is released when the iterator is dropped.

use serde_json::Value;
use wase_core::Document;

use crate::client::ElasticClient;
use crate::error::EngineError;

/// `hits.total`, either a plain number or `{"value": n, ...}`.
pub fn total_hits(response: &Value) -> Option<u64> {
    let total = response.get("hits")?.get("total")?;
    total
        .as_u64()
        .or_else(|| total.get("value").and_then(Value::as_u64))
}

/// One decoded scroll page.
#[derive(Debug)]
pub(crate) struct Page {
    pub scroll_id: Option<String>,
    pub documents: Vec<Document>,
}

impl Page {
    pub(crate) fn decode(url: &str, mut response: Value) -> Result<Self, EngineError> {
        let scroll_id = response
            .get("_scroll_id")
            .and_then(Value::as_str)
            .map(str::to_string);

        let hits = match response.pointer_mut("/hits/hits").map(Value::take) {
            Some(Value::Array(hits)) => hits,
            _ => {
                return Err(EngineError::Decode {
                    url: url.to_string(),
                    reason: "missing hits.hits".into(),
                })
            }
        };

        let documents = hits
            .into_iter()
            .map(|mut hit| hit.get_mut("_source").map(Value::take).unwrap_or(Value::Null))
            .collect();

        Ok(Self {
            scroll_id,
            documents,
        })
    }
}

pub struct ScrollIter<'a> {
    client: &'a ElasticClient,
    scroll_id: Option<String>,
    page: std::vec::IntoIter<Document>,
    exhausted: bool,
}

impl<'a> ScrollIter<'a> {
    pub(crate) fn open(client: &'a ElasticClient, url: &str, first: Value) -> Result<Self, EngineError> {
        let page = Page::decode(url, first)?;
        let exhausted = page.documents.is_empty();
        Ok(Self {
            client,
            scroll_id: page.scroll_id,
            page: page.documents.into_iter(),
            exhausted,
        })
    }

    fn fetch_next(&mut self) -> Result<(), EngineError> {
        let Some(scroll_id) = self.scroll_id.as_deref() else {
            self.exhausted = true;
            return Ok(());
        };

        let response = self.client.scroll_next(scroll_id)?;
        let page = Page::decode("/_search/scroll", response)?;
        if page.scroll_id.is_some() {
            self.scroll_id = page.scroll_id;
        }
        self.exhausted = page.documents.is_empty();
        self.page = page.documents.into_iter();
        Ok(())
    }
}

impl Iterator for ScrollIter<'_> {
    type Item = Result<Document, EngineError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(doc) = self.page.next() {
                return Some(Ok(doc));
            }
            if self.exhausted {
                return None;
            }
            if let Err(e) = self.fetch_next() {
                self.exhausted = true;
                return Some(Err(e));
            }
        }
    }
}

impl Drop for ScrollIter<'_> {
    fn drop(&mut self) {
        if let Some(scroll_id) = self.scroll_id.take() {
            if let Err(e) = self.client.clear_scroll(&scroll_id) {
                tracing::debug!("Failed to clear scroll context: {}", e);
            }
        }
    }
}
