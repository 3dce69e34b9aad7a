use std::env;
use std::time::Duration;

use crate::memory::DEFAULT_MEMORY_WINDOW;
use crate::search::SearchRequest;
use crate::sources::ExclusionFilter;

/// Credentials. Both are optional: a missing search key empties the digest,
/// a missing translation key falls back to the offline glossary.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub brave_api_key: Option<String>,
    pub deepseek_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        // Try to load .env from multiple locations
        Self::try_load_dotenv();

        Self {
            brave_api_key: non_empty_var("BRAVE_API_KEY"),
            deepseek_api_key: non_empty_var("DEEPSEEK_API_KEY"),
        }
    }

    fn try_load_dotenv() {
        // 1. Current directory (for development)
        if dotenvy::dotenv().is_ok() {
            return;
        }

        // 2. ~/.config/ai-daily/.env (standard config location)
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("ai-daily").join(".env");
            if config_path.exists() && dotenvy::from_path(&config_path).is_ok() {
                return;
            }
        }

        // 3. ~/.env (home directory)
        if let Some(home_dir) = dirs::home_dir() {
            let home_path = home_dir.join(".env");
            if home_path.exists() {
                let _ = dotenvy::from_path(&home_path);
            }
        }

        // If none found, that's okay - environment variables might be set system-wide
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Tunables for one curation run
#[derive(Debug, Clone)]
pub struct CurationSettings {
    pub news_queries: Vec<String>,
    pub tool_queries: Vec<String>,
    pub news_count: usize,
    pub tool_count: usize,
    pub news_freshness: Option<String>,
    pub tool_freshness: Option<String>,
    /// Minimum gap between two upstream calls
    pub query_interval: Duration,
    pub call_timeout: Duration,
    pub news_min: usize,
    pub news_soft_cap: usize,
    pub news_max: usize,
    pub tool_max: usize,
    pub memory_window: usize,
    /// Domains and title keywords dropped from both tracks
    pub exclusions: ExclusionFilter,
}

impl Default for CurationSettings {
    fn default() -> Self {
        Self {
            news_queries: vec![
                "AI artificial intelligence news today".to_string(),
                "OpenAI Anthropic Google DeepMind announcement".to_string(),
                "AI startup funding acquisition regulation".to_string(),
            ],
            tool_queries: vec![
                "new open source AI tool github".to_string(),
                "LLM agent framework release".to_string(),
                "AI developer tool pypi npm package".to_string(),
            ],
            news_count: 10,
            tool_count: 10,
            news_freshness: Some("pd".to_string()),
            tool_freshness: Some("pw".to_string()),
            query_interval: Duration::from_millis(1100),
            call_timeout: Duration::from_secs(30),
            news_min: 5,
            news_soft_cap: 7,
            news_max: 5,
            tool_max: 3,
            memory_window: DEFAULT_MEMORY_WINDOW,
            exclusions: ExclusionFilter::default(),
        }
    }
}

impl CurationSettings {
    pub fn news_requests(&self) -> Vec<SearchRequest> {
        Self::requests(&self.news_queries, self.news_count, &self.news_freshness)
    }

    pub fn tool_requests(&self) -> Vec<SearchRequest> {
        Self::requests(&self.tool_queries, self.tool_count, &self.tool_freshness)
    }

    fn requests(queries: &[String], count: usize, freshness: &Option<String>) -> Vec<SearchRequest> {
        queries
            .iter()
            .map(|q| {
                let request = SearchRequest::new(q.clone(), count);
                match freshness {
                    Some(f) => request.with_freshness(f.clone()),
                    None => request,
                }
            })
            .collect()
    }
}
