//! Optional `sources.json`: which news sources to read, in what order, and
//! which domains or title keywords to drop from the merged pool.
//!
//! Without the file the news track runs the built-in search queries.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::feed::RssFeedClient;
use crate::models::NormalizedCandidate;
use crate::search::{BraveSearchClient, SearchProvider, SearchRequest};

const DEFAULT_PRIORITY: u32 = 99;
const DEFAULT_BRAVE_QUERY: &str = "AI artificial intelligence news today";
const DEFAULT_SOURCE_COUNT: usize = 5;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourcesConfig {
    #[serde(default)]
    pub sources: Vec<SourceEntry>,
    #[serde(default)]
    pub global_settings: GlobalSettings,
    #[serde(default)]
    pub filters: ExclusionFilter,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GlobalSettings {
    /// Cap on the merged pool across all sources
    pub total_news_limit: usize,
    pub max_news_per_source: usize,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            total_news_limit: 10,
            max_news_per_source: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    BraveApi,
    Rss,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default = "unnamed_source")]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: SourceKind,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default = "default_priority")]
    pub priority: u32,
    #[serde(default)]
    pub config: SourceSettings,
}

/// Per-kind options; Brave reads `query`/`count`, RSS reads `url`/`max_items`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceSettings {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub max_items: Option<usize>,
}

fn unnamed_source() -> String {
    "Unknown".to_string()
}

fn enabled_by_default() -> bool {
    true
}

fn default_priority() -> u32 {
    DEFAULT_PRIORITY
}

/// Drops candidates by host substring or case-insensitive title keyword
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExclusionFilter {
    pub exclude_domains: Vec<String>,
    pub exclude_keywords: Vec<String>,
}

impl ExclusionFilter {
    pub fn is_empty(&self) -> bool {
        self.exclude_domains.iter().all(|d| d.trim().is_empty())
            && self.exclude_keywords.iter().all(|k| k.trim().is_empty())
    }

    pub fn excludes(&self, candidate: &NormalizedCandidate) -> bool {
        let host = candidate.host.to_lowercase();
        let domain_hit = self
            .exclude_domains
            .iter()
            .map(|d| d.trim().to_lowercase())
            .any(|d| !d.is_empty() && host.contains(&d));
        if domain_hit {
            return true;
        }

        let title = candidate.title.to_lowercase();
        self.exclude_keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .any(|k| !k.is_empty() && title.contains(&k))
    }
}

/// One configured source ready to be queried
pub struct NewsSource {
    pub name: String,
    pub priority: u32,
    pub provider: Box<dyn SearchProvider>,
    pub request: SearchRequest,
    /// Results kept from this source
    pub max_results: usize,
}

/// Enabled sources in priority order plus the merged-pool limit
pub struct SourcePlan {
    pub sources: Vec<NewsSource>,
    pub total_limit: usize,
}

impl SourcesConfig {
    /// A missing file means "no sources config"; a broken one is logged and
    /// treated the same way.
    pub fn load(path: &Path) -> Option<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No sources config");
            return None;
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read sources config");
                return None;
            }
        };

        match serde_json::from_str::<SourcesConfig>(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Sources config is not valid JSON");
                None
            }
        }
    }

    /// Enabled entries sorted by priority; ties keep file order
    pub fn enabled_sources(&self) -> Vec<&SourceEntry> {
        let mut enabled: Vec<&SourceEntry> = self.sources.iter().filter(|s| s.enabled).collect();
        enabled.sort_by_key(|s| s.priority);
        enabled
    }

    /// Build a provider for every usable enabled source. Entries that cannot
    /// be built (unknown type, missing key or URL) are skipped with a warning.
    pub fn build_plan(&self, config: &Config, timeout: Duration) -> SourcePlan {
        let mut sources = Vec::new();

        for entry in self.enabled_sources() {
            match entry.build(config, timeout, self.global_settings.max_news_per_source) {
                Some(source) => sources.push(source),
                None => warn!(source = %entry.name, "Skipping news source"),
            }
        }

        info!(sources = sources.len(), "News sources ready");
        SourcePlan {
            sources,
            total_limit: self.global_settings.total_news_limit,
        }
    }
}

impl SourceEntry {
    fn build(&self, config: &Config, timeout: Duration, max_results: usize) -> Option<NewsSource> {
        let (provider, request): (Box<dyn SearchProvider>, SearchRequest) = match self.kind {
            SourceKind::BraveApi => {
                let key = config.brave_api_key.clone()?;
                let client = BraveSearchClient::new(key, timeout).ok()?;
                let query = self
                    .config
                    .query
                    .clone()
                    .unwrap_or_else(|| DEFAULT_BRAVE_QUERY.to_string());
                let count = self.config.count.unwrap_or(DEFAULT_SOURCE_COUNT);
                (Box::new(client), SearchRequest::new(query, count))
            }
            SourceKind::Rss => {
                let client = RssFeedClient::new(self.config.url.clone()?, timeout).ok()?;
                debug!(source = %self.name, url = %client.url(), "Feed source");
                let count = self.config.max_items.unwrap_or(DEFAULT_SOURCE_COUNT);
                // The request text only shows up in logs for feeds
                (Box::new(client), SearchRequest::new(self.name.clone(), count))
            }
            SourceKind::Unknown => return None,
        };

        Some(NewsSource {
            name: self.name.clone(),
            priority: self.priority,
            provider,
            request,
            max_results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"{
        "sources": [
            {"id": "feed", "name": "AI News", "type": "rss", "priority": 2,
             "config": {"url": "https://www.artificialintelligence-news.com/feed/", "max_items": 4}},
            {"id": "brave", "name": "Brave", "type": "brave_api", "priority": 1,
             "config": {"query": "AI news", "count": 8}},
            {"id": "off", "name": "Disabled", "type": "rss", "enabled": false,
             "config": {"url": "https://example.com/feed"}},
            {"id": "odd", "name": "Mystery", "type": "carrier_pigeon"}
        ],
        "global_settings": {"total_news_limit": 6, "max_news_per_source": 2},
        "filters": {"exclude_domains": ["msn.com"], "exclude_keywords": ["Sponsored"]}
    }"#;

    fn candidate(host: &str, title: &str) -> NormalizedCandidate {
        NormalizedCandidate {
            title: title.to_string(),
            url: format!("https://{}/a", host),
            host: host.to_string(),
            path: "/a".to_string(),
            snippet: String::new(),
            recency: None,
        }
    }

    #[test]
    fn test_parse_sample_config() {
        let config: SourcesConfig = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(config.sources.len(), 4);
        assert_eq!(config.sources[0].kind, SourceKind::Rss);
        assert_eq!(config.sources[3].kind, SourceKind::Unknown);
        assert_eq!(config.global_settings.total_news_limit, 6);
        assert_eq!(config.filters.exclude_domains, vec!["msn.com".to_string()]);
    }

    #[test]
    fn test_defaults_for_sparse_config() {
        let config: SourcesConfig =
            serde_json::from_str(r#"{"sources": [{"type": "rss"}]}"#).unwrap();
        let entry = &config.sources[0];
        assert!(entry.enabled);
        assert_eq!(entry.priority, DEFAULT_PRIORITY);
        assert_eq!(entry.name, "Unknown");
        assert_eq!(config.global_settings.max_news_per_source, 3);
        assert!(config.filters.is_empty());
    }

    #[test]
    fn test_enabled_sources_by_priority() {
        let config: SourcesConfig = serde_json::from_str(SAMPLE).unwrap();
        let names: Vec<&str> = config
            .enabled_sources()
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["Brave", "AI News", "Mystery"]);
    }

    #[test]
    fn test_build_plan_skips_unusable_sources() {
        let config: SourcesConfig = serde_json::from_str(SAMPLE).unwrap();
        let plan = config.build_plan(&Config::default(), Duration::from_secs(5));

        // No Brave key and an unknown type leave only the feed
        let names: Vec<&str> = plan.sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["AI News"]);
        assert_eq!(plan.sources[0].request.count, 4);
        assert_eq!(plan.sources[0].max_results, 2);
        assert_eq!(plan.total_limit, 6);
    }

    #[test]
    fn test_build_plan_with_brave_key() {
        let config: SourcesConfig = serde_json::from_str(SAMPLE).unwrap();
        let credentials = Config {
            brave_api_key: Some("key".to_string()),
            deepseek_api_key: None,
        };
        let plan = config.build_plan(&credentials, Duration::from_secs(5));

        assert_eq!(plan.sources.len(), 2);
        assert_eq!(plan.sources[0].name, "Brave");
        assert_eq!(plan.sources[0].request.query, "AI news");
        assert_eq!(plan.sources[0].request.count, 8);
    }

    #[test]
    fn test_exclusions() {
        let filter = ExclusionFilter {
            exclude_domains: vec!["MSN.com".to_string(), "".to_string()],
            exclude_keywords: vec!["sponsored".to_string()],
        };
        assert!(filter.excludes(&candidate("msn.com", "OpenAI launches")));
        assert!(filter.excludes(&candidate("news.msn.com", "OpenAI launches")));
        assert!(filter.excludes(&candidate("reuters.com", "SPONSORED: best GPUs")));
        assert!(!filter.excludes(&candidate("reuters.com", "OpenAI launches")));
    }

    #[test]
    fn test_empty_filter_excludes_nothing() {
        let filter = ExclusionFilter {
            exclude_domains: vec!["  ".to_string()],
            exclude_keywords: vec![String::new()],
        };
        assert!(filter.is_empty());
        assert!(!filter.excludes(&candidate("reuters.com", "Anything")));
    }

    #[test]
    fn test_load_missing_or_broken() {
        let dir = tempdir().unwrap();
        assert!(SourcesConfig::load(&dir.path().join("sources.json")).is_none());

        let path = dir.path().join("broken.json");
        fs::write(&path, "[not an object").unwrap();
        assert!(SourcesConfig::load(&path).is_none());

        let path = dir.path().join("sources.json");
        fs::write(&path, SAMPLE).unwrap();
        assert_eq!(SourcesConfig::load(&path).unwrap().sources.len(), 4);
    }
}
