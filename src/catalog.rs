use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

pub const RAKUTEN_BOOKS_URL: &str =
    "https://app.rakuten.co.jp/services/api/BooksBook/Search/20170404";

pub const PAGE_SIZE: u32 = 30;

/// Catalog order that does not depend on relevance scoring.
pub const STANDARD_SORT: &str = "standard";

#[derive(Debug, Clone)]
pub struct CatalogQuery<'a> {
    pub keyword: &'a str,
    pub page_size: u32,
    pub in_stock_only: bool,
    pub sort: &'a str,
}

impl<'a> CatalogQuery<'a> {
    /// The fixed lookup used for recommendations: one page of in-stock books,
    /// in the catalog's standard order.
    pub fn recommendation(keyword: &'a str) -> Self {
        Self {
            keyword,
            page_size: PAGE_SIZE,
            in_stock_only: true,
            sort: STANDARD_SORT,
        }
    }
}

/// A catalog item as the service returned it; only the title is guaranteed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CatalogItem {
    pub title: Option<String>,
    pub author: Option<String>,
    #[serde(rename = "itemPrice")]
    pub price: Option<u64>,
    #[serde(rename = "largeImageUrl")]
    pub image_url: Option<String>,
}

#[async_trait]
pub trait Catalog: Send + Sync {
    async fn search(&self, query: &CatalogQuery<'_>) -> Result<Vec<CatalogItem>>;
}

#[derive(Clone)]
pub struct RakutenClient {
    client: Client,
    base_url: String,
    application_id: String,
}

impl RakutenClient {
    pub fn new(base_url: impl Into<String>, application_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            application_id: application_id.into(),
        }
    }
}

#[async_trait]
impl Catalog for RakutenClient {
    async fn search(&self, query: &CatalogQuery<'_>) -> Result<Vec<CatalogItem>> {
        let hits = query.page_size.to_string();
        let params = [
            ("format", "json"),
            ("applicationId", self.application_id.as_str()),
            ("keyword", query.keyword),
            ("hits", hits.as_str()),
            ("sort", query.sort),
            ("availability", if query.in_stock_only { "1" } else { "0" }),
        ];

        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .context("failed to contact rakuten books search")?
            .error_for_status()
            .context("rakuten books search returned non-success status")?
            .json::<SearchResponse>()
            .await
            .context("failed to decode rakuten books search response")?;

        Ok(response.items.into_iter().map(|entry| entry.item).collect())
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "Items", default)]
    items: Vec<SearchEntry>,
}

#[derive(Debug, Deserialize)]
struct SearchEntry {
    #[serde(rename = "Item")]
    item: CatalogItem,
}
