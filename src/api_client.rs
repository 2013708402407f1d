use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const DEFAULT_BASE_URL: &str = "https://pixabay.com/api/";

/// Errors surfaced by a single fetch attempt
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("No images found for your search query.")]
    NoResults,

    #[error("HTTP error! status: {status}")]
    Http { status: u16 },

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("malformed response body: {0}")]
    Decode(String),
}

/// One image hit, reduced to what the gallery needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultItem {
    pub id: Option<u64>,
    pub preview_url: String,
    pub full_url: String,
    pub page_url: Option<String>,
    pub tags: String,
    pub user: Option<String>,
    pub likes: u64,
    pub views: u64,
    pub comments: u64,
    pub downloads: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPage {
    pub items: Vec<ResultItem>,
    pub total_hits: u64,
}

/// Query parameters sent with every search request
#[derive(Debug, Serialize)]
pub struct SearchParams<'a> {
    pub key: &'a str,
    pub q: &'a str,
    pub image_type: &'static str,
    pub orientation: &'static str,
    pub safesearch: bool,
    pub page: u32,
    pub per_page: u32,
}

impl<'a> SearchParams<'a> {
    pub fn new(key: &'a str, query: &'a str, page: u32, per_page: u32) -> Self {
        Self {
            key,
            q: query,
            image_type: "photo",
            orientation: "horizontal",
            safesearch: true,
            page,
            per_page,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub total: u64,
    #[serde(rename = "totalHits")]
    pub total_hits: u64,
    pub hits: Vec<ApiHit>,
}

#[derive(Debug, Deserialize)]
pub struct ApiHit {
    pub id: Option<u64>,
    #[serde(rename = "pageURL")]
    pub page_url: Option<String>,
    #[serde(rename = "webformatURL")]
    pub webformat_url: String,
    #[serde(rename = "largeImageURL")]
    pub large_image_url: String,
    #[serde(default)]
    pub tags: String,
    pub user: Option<String>,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub downloads: u64,
}

impl From<ApiHit> for ResultItem {
    fn from(hit: ApiHit) -> Self {
        Self {
            id: hit.id,
            preview_url: hit.webformat_url,
            full_url: hit.large_image_url,
            page_url: hit.page_url,
            tags: hit.tags,
            user: hit.user,
            likes: hit.likes,
            views: hit.views,
            comments: hit.comments,
            downloads: hit.downloads,
        }
    }
}

impl SearchResponse {
    /// Convert a decoded body into a page, rejecting empty hit lists
    pub fn into_result_page(self) -> Result<ResultPage, FetchError> {
        if self.hits.is_empty() {
            return Err(FetchError::NoResults);
        }

        Ok(ResultPage {
            total_hits: self.total_hits,
            items: self.hits.into_iter().map(ResultItem::from).collect(),
        })
    }
}

/// The fetch seam the session controller talks to
#[async_trait]
pub trait ImageSearch: Send + Sync {
    async fn fetch_results(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<ResultPage, FetchError>;
}

#[derive(Clone)]
pub struct PixabayClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl PixabayClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(base_url: &str, api_key: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn classify(err: reqwest::Error) -> FetchError {
    if let Some(status) = err.status() {
        FetchError::Http {
            status: status.as_u16(),
        }
    } else if err.is_decode() {
        FetchError::Decode(err.to_string())
    } else {
        FetchError::Transport(err.to_string())
    }
}

#[async_trait]
impl ImageSearch for PixabayClient {
    async fn fetch_results(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<ResultPage, FetchError> {
        let params = SearchParams::new(&self.api_key, query, page, page_size);
        debug!(target: "fetch", "GET {} q={:?} page={} per_page={}", self.base_url, query, page, page_size);

        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            warn!(target: "fetch", "Search API answered {}", status);
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        let body: SearchResponse = response.json().await.map_err(classify)?;
        info!(
            target: "fetch",
            "Received {} hits (totalHits={}, total={})",
            body.hits.len(),
            body.total_hits,
            body.total
        );
        body.into_result_page()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_carry_fixed_filters() {
        let params = SearchParams::new("k", "red fox", 2, 15);
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["image_type"], "photo");
        assert_eq!(value["orientation"], "horizontal");
        assert_eq!(value["safesearch"], true);
        assert_eq!(value["q"], "red fox");
        assert_eq!(value["page"], 2);
        assert_eq!(value["per_page"], 15);
    }

    #[test]
    fn test_response_maps_hits_in_order() {
        let body = r#"{
            "total": 4000,
            "totalHits": 500,
            "hits": [
                {"id": 1, "webformatURL": "https://cdn/a_640.jpg", "largeImageURL": "https://cdn/a_1280.jpg",
                 "tags": "cat, pet", "likes": 10, "views": 200, "comments": 3, "downloads": 50, "user": "ann"},
                {"id": 2, "webformatURL": "https://cdn/b_640.jpg", "largeImageURL": "https://cdn/b_1280.jpg",
                 "tags": "kitten", "likes": 1, "views": 2, "comments": 0, "downloads": 4}
            ]
        }"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        let page = parsed.into_result_page().unwrap();

        assert_eq!(page.total_hits, 500);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].preview_url, "https://cdn/a_640.jpg");
        assert_eq!(page.items[0].full_url, "https://cdn/a_1280.jpg");
        assert_eq!(page.items[0].user.as_deref(), Some("ann"));
        assert_eq!(page.items[1].tags, "kitten");
        assert_eq!(page.items[1].user, None);
    }

    #[test]
    fn test_empty_hits_is_no_results() {
        let parsed: SearchResponse =
            serde_json::from_str(r#"{"total": 0, "totalHits": 0, "hits": []}"#).unwrap();
        assert_eq!(parsed.into_result_page(), Err(FetchError::NoResults));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            FetchError::Http { status: 503 }.to_string(),
            "HTTP error! status: 503"
        );
        assert_eq!(
            FetchError::NoResults.to_string(),
            "No images found for your search query."
        );
    }
}
