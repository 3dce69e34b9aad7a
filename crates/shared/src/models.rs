use serde::{Deserialize, Serialize};

pub const DIGEST_VERSION: &str = "1.0";

/// One search result exactly as the provider returned it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCandidate {
    pub title: String,
    pub url: String,
    pub snippet: String,
    /// Timestamp or age string ("2025-03-01T10:00:00", "3 hours ago")
    pub recency: Option<String>,
    pub source_host: Option<String>,
}

/// A raw candidate with cleaned text and a parsed URL.
///
/// `title` and `url` are never empty; candidates that would violate this are
/// dropped by [`crate::normalize::normalize_candidate`].
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedCandidate {
    pub title: String,
    pub url: String,
    /// Lowercased, leading `www.` removed
    pub host: String,
    pub path: String,
    pub snippet: String,
    pub recency: Option<String>,
}

impl NormalizedCandidate {
    /// Non-empty path segments
    pub fn path_segments(&self) -> Vec<&str> {
        self.path.split('/').filter(|s| !s.is_empty()).collect()
    }

    /// Title and snippet joined, used by the vocabulary checks
    pub fn combined_text(&self) -> String {
        format!("{} {}", self.title, self.snippet)
    }
}

/// Two candidates with equal keys are the same item
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DedupeKey {
    pub title_prefix: String,
    pub host: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub candidate: NormalizedCandidate,
    pub is_homepage_or_section: bool,
    pub is_reputable_source: bool,
    pub looks_like_news_event: bool,
    pub looks_like_tool_artifact: bool,
    pub dedupe_key: DedupeKey,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub classification: Classification,
    pub score: f64,
}

impl ScoredCandidate {
    pub fn candidate(&self) -> &NormalizedCandidate {
        &self.classification.candidate
    }
}

/// A published entry in the daily digest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigestItem {
    pub title: String,
    pub url: String,
    pub description: String,
    pub source: String,
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub title_local: Option<String>,
    #[serde(default)]
    pub summary_local: Option<String>,
}

impl DigestItem {
    pub fn from_scored(scored: &ScoredCandidate) -> Self {
        let candidate = scored.candidate();
        Self {
            title: candidate.title.clone(),
            url: candidate.url.clone(),
            description: candidate.snippet.clone(),
            source: crate::labels::source_label(&candidate.host),
            published: candidate.recency.clone(),
            score: scored.score,
            title_local: None,
            summary_local: None,
        }
    }

    pub fn display_title(&self) -> &str {
        self.title_local.as_deref().unwrap_or(&self.title)
    }

    pub fn display_summary(&self) -> &str {
        self.summary_local.as_deref().unwrap_or(&self.description)
    }
}

/// Complete digest for one day, serialized next to the markdown page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Digest {
    pub version: String,
    pub created_at: String,
    pub date: String,
    pub news: Vec<DigestItem>,
    pub tools: Vec<DigestItem>,
}

impl Digest {
    pub fn new(date: impl Into<String>, news: Vec<DigestItem>, tools: Vec<DigestItem>) -> Self {
        Self {
            version: DIGEST_VERSION.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            date: date.into(),
            news,
            tools,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.news.is_empty() && self.tools.is_empty()
    }
}
