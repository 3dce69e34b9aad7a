use std::collections::HashSet;

use crate::memory::RunMemory;
use crate::models::{DedupeKey, NormalizedCandidate};

/// Characters of normalized title kept in the key
pub const TITLE_PREFIX_LEN: usize = 48;

pub fn dedupe_key(candidate: &NormalizedCandidate) -> DedupeKey {
    let title_prefix: String = candidate
        .title
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric())
        .take(TITLE_PREFIX_LEN)
        .collect();

    DedupeKey {
        title_prefix,
        host: candidate.host.clone(),
    }
}

/// Remembers every key accepted during one run. Shared by all relaxation
/// tiers so a later tier never re-admits an item.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<DedupeKey>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// True the first time a key is offered, false for every repeat
    pub fn admit(&mut self, key: &DedupeKey) -> bool {
        if self.seen.contains(key) {
            return false;
        }
        self.seen.insert(key.clone());
        true
    }

    pub fn contains(&self, key: &DedupeKey) -> bool {
        self.seen.contains(key)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Tool-track exclusion: the raw URL was already recommended in a recent run
pub fn seen_in_prior_runs(candidate: &NormalizedCandidate, memory: &RunMemory) -> bool {
    memory.contains(&candidate.url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(title: &str, host: &str) -> NormalizedCandidate {
        NormalizedCandidate {
            title: title.to_string(),
            url: format!("https://{}/{}", host, title.replace(' ', "-")),
            host: host.to_string(),
            path: "/story".to_string(),
            snippet: String::new(),
            recency: None,
        }
    }

    #[test]
    fn test_key_ignores_case_and_punctuation() {
        let a = dedupe_key(&candidate("OpenAI releases GPT-Z", "reuters.com"));
        let b = dedupe_key(&candidate("openai releases gpt-z!!", "reuters.com"));
        assert_eq!(a, b);
        assert_eq!(a.title_prefix, "openaireleasesgptz");
    }

    #[test]
    fn test_key_includes_host() {
        let a = dedupe_key(&candidate("OpenAI releases GPT-Z", "reuters.com"));
        let b = dedupe_key(&candidate("OpenAI releases GPT-Z", "theverge.com"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_key_truncates_long_titles() {
        let long = "a".repeat(200);
        let key = dedupe_key(&candidate(&long, "reuters.com"));
        assert_eq!(key.title_prefix.chars().count(), TITLE_PREFIX_LEN);

        // Titles that only differ after the prefix collide
        let x = dedupe_key(&candidate(&format!("{} one", long), "reuters.com"));
        let y = dedupe_key(&candidate(&format!("{} two", long), "reuters.com"));
        assert_eq!(x, y);
    }

    #[test]
    fn test_deduplicator_keeps_first() {
        let mut dedupe = Deduplicator::new();
        let key = dedupe_key(&candidate("Same story", "reuters.com"));
        assert!(dedupe.admit(&key));
        assert!(!dedupe.admit(&key));
        assert!(dedupe.contains(&key));
        assert_eq!(dedupe.len(), 1);
    }

    #[test]
    fn test_seen_in_prior_runs() {
        let mut memory = RunMemory::default();
        let seen = candidate("acme/agent-kit", "github.com");
        memory.remember(seen.url.clone());

        assert!(seen_in_prior_runs(&seen, &memory));
        assert!(!seen_in_prior_runs(&candidate("other", "github.com"), &memory));
    }
}
