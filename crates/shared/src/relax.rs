//! Multi-pass filtering with progressively looser tiers.
//!
//! Tiers are plain data; [`RelaxationPlan::run`] is the only filter loop.
//! Each tier's requirements are configured independently, so nothing here
//! assumes a later tier admits a superset of an earlier one.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::dedupe::Deduplicator;
use crate::models::Classification;
use crate::score::age_hours;

pub const NEWS_RECENT_HOURS: f64 = 48.0;
pub const NEWS_BROAD_HOURS: f64 = 168.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RelaxationTier {
    pub name: &'static str,
    pub require_reputable: bool,
    pub require_not_homepage: bool,
    pub require_news_event: bool,
    pub require_tool_artifact: bool,
    /// Candidates older than this are rejected; undated candidates pass
    pub max_age_hours: Option<f64>,
}

impl RelaxationTier {
    pub fn admits(&self, classification: &Classification, now: DateTime<Utc>) -> bool {
        if self.require_reputable && !classification.is_reputable_source {
            return false;
        }
        if self.require_not_homepage && classification.is_homepage_or_section {
            return false;
        }
        if self.require_news_event && !classification.looks_like_news_event {
            return false;
        }
        if self.require_tool_artifact && !classification.looks_like_tool_artifact {
            return false;
        }
        match (self.max_age_hours, age_hours(&classification.candidate, now)) {
            (Some(limit), Some(age)) => age <= limit,
            _ => true,
        }
    }

    /// Same requirements, ignoring the name
    pub fn same_rules_as(&self, other: &RelaxationTier) -> bool {
        self.require_reputable == other.require_reputable
            && self.require_not_homepage == other.require_not_homepage
            && self.require_news_event == other.require_news_event
            && self.require_tool_artifact == other.require_tool_artifact
            && self.max_age_hours == other.max_age_hours
    }
}

/// strict → relaxed → fallback → broadened-recency
pub fn news_tiers() -> Vec<RelaxationTier> {
    let relaxed = RelaxationTier {
        name: "relaxed",
        require_reputable: true,
        require_not_homepage: true,
        require_news_event: false,
        require_tool_artifact: false,
        max_age_hours: Some(NEWS_RECENT_HOURS),
    };

    vec![
        RelaxationTier {
            name: "strict",
            require_news_event: true,
            ..relaxed.clone()
        },
        relaxed.clone(),
        RelaxationTier {
            name: "fallback",
            ..relaxed.clone()
        },
        RelaxationTier {
            name: "broadened-recency",
            max_age_hours: Some(NEWS_BROAD_HOURS),
            ..relaxed
        },
    ]
}

#[derive(Debug, Clone)]
pub struct RelaxationPlan {
    tiers: Vec<RelaxationTier>,
    min_target: usize,
    soft_cap: usize,
}

impl RelaxationPlan {
    pub fn new(tiers: Vec<RelaxationTier>, min_target: usize, soft_cap: usize) -> Self {
        let plan = Self {
            tiers,
            min_target,
            soft_cap: soft_cap.max(min_target),
        };
        for (earlier, later) in plan.redundant_adjacent_tiers() {
            warn!(
                earlier = earlier,
                later = later,
                "Adjacent relaxation tiers have identical rules; the later one is likely redundant"
            );
        }
        plan
    }

    pub fn news(min_target: usize, soft_cap: usize) -> Self {
        Self::new(news_tiers(), min_target, soft_cap)
    }

    pub fn tiers(&self) -> &[RelaxationTier] {
        &self.tiers
    }

    /// Names of neighbouring tiers with the same rules, in order
    pub fn redundant_adjacent_tiers(&self) -> Vec<(&'static str, &'static str)> {
        self.tiers
            .windows(2)
            .filter(|pair| pair[0].same_rules_as(&pair[1]))
            .map(|pair| (pair[0].name, pair[1].name))
            .collect()
    }

    /// Walk the tiers in order, accumulating admitted, previously unseen
    /// candidates. Stops filling at the soft cap and stops walking once the
    /// minimum is met. A short or empty result is a valid outcome.
    pub fn run(
        &self,
        pool: &[Classification],
        dedupe: &mut Deduplicator,
        now: DateTime<Utc>,
    ) -> Vec<Classification> {
        let mut accepted = Vec::new();

        for tier in &self.tiers {
            let before = accepted.len();
            for classification in pool {
                if accepted.len() >= self.soft_cap {
                    break;
                }
                if tier.admits(classification, now) && dedupe.admit(&classification.dedupe_key) {
                    accepted.push(classification.clone());
                }
            }

            debug!(
                tier = tier.name,
                added = accepted.len() - before,
                total = accepted.len(),
                "Relaxation tier done"
            );

            if accepted.len() >= self.min_target {
                break;
            }
        }

        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::models::NormalizedCandidate;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap()
    }

    fn story(host: &str, slug: &str, title: &str, recency: &str) -> Classification {
        classify(NormalizedCandidate {
            title: title.to_string(),
            url: format!("https://{}/2026/03/{}", host, slug),
            host: host.to_string(),
            path: format!("/2026/03/{}", slug),
            snippet: String::new(),
            recency: Some(recency.to_string()),
        })
    }

    fn varied_pool() -> Vec<Classification> {
        vec![
            story("reuters.com", "a", "OpenAI launches agent platform", "2 hours ago"),
            story("theverge.com", "b", "A look at chip supply", "5 hours ago"),
            story("techcrunch.com", "c", "Startup raises $20M", "3 days ago"),
            story("wired.com", "d", "Essay on screens", "4 days ago"),
            story("someblog.net", "e", "Anthropic releases Claude update", "1 hour ago"),
            story("bbc.com", "f", "Inside a data centre", "30 days ago"),
        ]
    }

    #[test]
    fn test_news_tiers_order_and_redundancy() {
        let plan = RelaxationPlan::news(5, 7);
        let names: Vec<&str> = plan.tiers().iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["strict", "relaxed", "fallback", "broadened-recency"]);
        assert_eq!(plan.redundant_adjacent_tiers(), vec![("relaxed", "fallback")]);
    }

    #[test]
    fn test_stops_once_minimum_met() {
        let plan = RelaxationPlan::news(1, 7);
        let mut dedupe = Deduplicator::new();
        let accepted = plan.run(&varied_pool(), &mut dedupe, now());

        // Only the strict tier ran
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].candidate.host, "reuters.com");
    }

    #[test]
    fn test_relaxes_until_exhausted() {
        let plan = RelaxationPlan::news(5, 7);
        let mut dedupe = Deduplicator::new();
        let accepted = plan.run(&varied_pool(), &mut dedupe, now());

        let hosts: Vec<&str> = accepted.iter().map(|c| c.candidate.host.as_str()).collect();
        // strict: reuters; relaxed: theverge; broadened: techcrunch, wired
        assert_eq!(hosts, vec!["reuters.com", "theverge.com", "techcrunch.com", "wired.com"]);
    }

    #[test]
    fn test_soft_cap_bounds_accumulation() {
        let pool: Vec<Classification> = (0..12)
            .map(|i| {
                story(
                    "reuters.com",
                    &format!("s{}", i),
                    &format!("Nvidia announces product {}", i),
                    "1 hour ago",
                )
            })
            .collect();
        let plan = RelaxationPlan::news(5, 7);
        let mut dedupe = Deduplicator::new();
        assert_eq!(plan.run(&pool, &mut dedupe, now()).len(), 7);
    }

    #[test]
    fn test_later_tiers_never_readmit() {
        let pool = vec![
            story("reuters.com", "a", "OpenAI launches agent platform", "2 hours ago"),
            story("reuters.com", "a2", "OpenAI launches agent platform!", "2 hours ago"),
        ];
        let plan = RelaxationPlan::news(5, 7);
        let mut dedupe = Deduplicator::new();
        let accepted = plan.run(&pool, &mut dedupe, now());
        assert_eq!(accepted.len(), 1);
    }

    #[test]
    fn test_news_tiers_are_monotonic() {
        // Anything a stricter tier admits, every later news tier admits too
        let tiers = news_tiers();
        for classification in varied_pool() {
            for (i, stricter) in tiers.iter().enumerate() {
                if stricter.admits(&classification, now()) {
                    for looser in &tiers[i..] {
                        assert!(
                            looser.admits(&classification, now()),
                            "{} admitted by {} but not {}",
                            classification.candidate.title,
                            stricter.name,
                            looser.name
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_undated_passes_cutoff() {
        let mut c = story("reuters.com", "a", "OpenAI launches agents", "");
        c.candidate.recency = None;
        assert!(news_tiers()[0].admits(&c, now()));
    }

    #[test]
    fn test_old_relative_ages_fail_every_cutoff() {
        let c = story("reuters.com", "a", "OpenAI launches agents", "2 years ago");
        assert!(news_tiers().iter().all(|tier| !tier.admits(&c, now())));

        let c = story("reuters.com", "b", "OpenAI launches agents", "3 months ago");
        assert!(news_tiers().iter().all(|tier| !tier.admits(&c, now())));

        let c = story("reuters.com", "c", "OpenAI launches agents", "yesterday");
        assert!(news_tiers()[0].admits(&c, now()));
    }

    #[test]
    fn test_custom_plan_flags_duplicates() {
        let tier = news_tiers().remove(1);
        let plan = RelaxationPlan::new(vec![tier.clone(), tier.clone(), tier], 5, 7);
        assert_eq!(plan.redundant_adjacent_tiers().len(), 2);
    }
}
