use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::task::JoinError;

use crate::catalog::{Catalog, CatalogItem, CatalogQuery};
use crate::models::{Keyword, Price, RawHit, UNKNOWN_AUTHOR};

/// Hits for one keyword, in catalog order.
pub type KeywordHits = (Keyword, Vec<RawHit>);

#[derive(Clone)]
pub struct BookSearch {
    catalog: Arc<dyn Catalog>,
    timeout: Duration,
}

impl BookSearch {
    pub fn new(catalog: Arc<dyn Catalog>, timeout: Duration) -> Self {
        Self { catalog, timeout }
    }

    /// Searches one keyword. Transport errors, error statuses and timeouts are
    /// logged and yield no hits; they never reach the caller.
    pub async fn search(&self, keyword: &Keyword) -> Vec<RawHit> {
        let query = CatalogQuery::recommendation(keyword.as_str());
        let outcome = tokio::time::timeout(self.timeout, self.catalog.search(&query)).await;

        let items = match outcome {
            Ok(Ok(items)) => items,
            Ok(Err(err)) => {
                tracing::warn!(%keyword, "book search failed: {err:#}");
                return vec![];
            }
            Err(_) => {
                tracing::warn!(%keyword, timeout = ?self.timeout, "book search timed out");
                return vec![];
            }
        };

        let received = items.len();
        let hits: Vec<RawHit> = items
            .into_iter()
            .filter_map(|item| to_raw_hit(item, keyword))
            .collect();
        tracing::info!(%keyword, received, usable = hits.len(), "received books for keyword");
        hits
    }

    /// Runs one search task per keyword and returns the hits in keyword order.
    /// Only a task that died (panicked or was cancelled) is an error.
    pub async fn search_all(&self, keywords: &[Keyword]) -> Result<Vec<KeywordHits>, JoinError> {
        let handles: Vec<_> = keywords
            .iter()
            .cloned()
            .map(|keyword| {
                let search = self.clone();
                tokio::spawn(async move {
                    let hits = search.search(&keyword).await;
                    (keyword, hits)
                })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(handle.await?);
        }
        Ok(results)
    }
}

fn to_raw_hit(item: CatalogItem, keyword: &Keyword) -> Option<RawHit> {
    let title = match item.title {
        Some(title) if !title.trim().is_empty() => title,
        _ => {
            tracing::debug!(%keyword, "skipping catalog item without a title");
            return None;
        }
    };

    Some(RawHit {
        title,
        author: item
            .author
            .filter(|author| !author.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        price: item.price.map(Price::Yen).unwrap_or(Price::Unavailable),
        image_url: item.image_url.unwrap_or_default(),
        keyword: keyword.clone(),
    })
}
