use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::models::RawCandidate;

const BRAVE_ENDPOINT: &str = "https://api.search.brave.com/res/v1/web/search";

#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub count: usize,
    /// Provider freshness hint, e.g. `pd` (past day) or `pw` (past week)
    pub freshness: Option<String>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, count: usize) -> Self {
        Self {
            query: query.into(),
            count,
            freshness: None,
        }
    }

    pub fn with_freshness(mut self, freshness: impl Into<String>) -> Self {
        self.freshness = Some(freshness.into());
        self
    }
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search provider is not configured: {0}")]
    NotConfigured(String),
    #[error("search request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("search provider returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("search request timed out")]
    Timeout,
    #[error("could not decode search response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("could not parse feed: {0}")]
    Feed(#[from] feed_rs::parser::ParseFeedError),
}

/// Anything that turns a query into raw results
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<RawCandidate>, SearchError>;
}

#[derive(Debug, Default, Deserialize)]
pub struct BraveResponse {
    #[serde(default)]
    web: Option<BraveResults>,
}

#[derive(Debug, Default, Deserialize)]
struct BraveResults {
    #[serde(default)]
    results: Vec<BraveResult>,
}

#[derive(Debug, Default, Deserialize)]
struct BraveResult {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    page_age: Option<String>,
    #[serde(default)]
    age: Option<String>,
    #[serde(default)]
    meta_url: Option<BraveMetaUrl>,
}

#[derive(Debug, Default, Deserialize)]
struct BraveMetaUrl {
    #[serde(default)]
    hostname: Option<String>,
}

impl BraveResponse {
    pub fn into_candidates(self) -> Vec<RawCandidate> {
        self.web
            .map(|web| web.results)
            .unwrap_or_default()
            .into_iter()
            .map(|result| RawCandidate {
                title: result.title.unwrap_or_default(),
                url: result.url.unwrap_or_default(),
                snippet: result.description.unwrap_or_default(),
                recency: result.page_age.or(result.age),
                source_host: result.meta_url.and_then(|m| m.hostname),
            })
            .collect()
    }
}

/// Decode a Brave web-search response body. Missing containers and fields
/// decode to empty values.
pub fn parse_brave_response(body: &str) -> Result<Vec<RawCandidate>, SearchError> {
    let response: BraveResponse = serde_json::from_str(body)?;
    Ok(response.into_candidates())
}

pub struct BraveSearchClient {
    client: Client,
    api_key: String,
}

impl BraveSearchClient {
    pub fn new(api_key: String, timeout: std::time::Duration) -> Result<Self, SearchError> {
        if api_key.trim().is_empty() {
            return Err(SearchError::NotConfigured("BRAVE_API_KEY is empty".to_string()));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, api_key })
    }

    fn request_url(request: &SearchRequest) -> String {
        let mut url = format!(
            "{}?q={}&count={}",
            BRAVE_ENDPOINT,
            urlencoding::encode(&request.query),
            request.count
        );
        if let Some(freshness) = &request.freshness {
            url.push_str(&format!("&freshness={}", urlencoding::encode(freshness)));
        }
        url
    }
}

#[async_trait]
impl SearchProvider for BraveSearchClient {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<RawCandidate>, SearchError> {
        let response = self
            .client
            .get(Self::request_url(request))
            .header("Accept", "application/json")
            .header("X-Subscription-Token", &self.api_key)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout
                } else {
                    SearchError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unknown error"));
            return Err(SearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        parse_brave_response(&body)
    }
}
