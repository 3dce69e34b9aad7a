use async_trait::async_trait;
use reqwest::Client;

use crate::models::RawCandidate;
use crate::normalize::normalize;
use crate::search::{SearchError, SearchProvider, SearchRequest};

const FEED_SUMMARY_CHARS: usize = 200;

/// Decode an RSS or Atom document into at most `limit` candidates, in feed order
pub fn parse_feed(body: &[u8], limit: usize) -> Result<Vec<RawCandidate>, SearchError> {
    let feed = feed_rs::parser::parse(body)?;

    Ok(feed
        .entries
        .into_iter()
        .take(limit)
        .map(|entry| RawCandidate {
            title: entry.title.map(|t| t.content).unwrap_or_default(),
            url: entry
                .links
                .first()
                .map(|link| link.href.clone())
                .unwrap_or_default(),
            snippet: entry
                .summary
                .map(|s| normalize(&s.content).chars().take(FEED_SUMMARY_CHARS).collect())
                .unwrap_or_default(),
            recency: entry.published.or(entry.updated).map(|d| d.to_rfc3339()),
            source_host: None,
        })
        .collect())
}

/// A single feed exposed as a provider. The feed has no query, so only the
/// request's count is used.
pub struct RssFeedClient {
    client: Client,
    url: String,
}

impl RssFeedClient {
    pub fn new(url: String, timeout: std::time::Duration) -> Result<Self, SearchError> {
        if url.trim().is_empty() {
            return Err(SearchError::NotConfigured("feed URL is empty".to_string()));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SearchProvider for RssFeedClient {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<RawCandidate>, SearchError> {
        let response = self.client.get(&self.url).send().await.map_err(|e| {
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

        let body = response.bytes().await?;
        parse_feed(&body, request.count)
    }
}
