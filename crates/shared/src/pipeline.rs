//! The two curation tracks.
//!
//! News: fan out every news query (or every configured source), merge,
//! normalize, drop exclusions, classify, relax tiers, rank, truncate.
//! Tools: walk tool queries in order and accept artifacts until the cap,
//! skipping anything recommended by an earlier run.
//!
//! Nothing here returns an error. The worst outcome is an empty list.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::classify::classify;
use crate::config::CurationSettings;
use crate::dedupe::{seen_in_prior_runs, Deduplicator};
use crate::fanout::QueryFanOut;
use crate::memory::RunMemory;
use crate::models::{Classification, RawCandidate, ScoredCandidate};
use crate::normalize::normalize_candidate;
use crate::relax::RelaxationPlan;
use crate::score::{rank, score};
use crate::search::SearchProvider;
use crate::sources::{ExclusionFilter, SourcePlan};

#[derive(Debug, Default)]
pub struct CurationOutcome {
    pub news: Vec<ScoredCandidate>,
    pub tools: Vec<ScoredCandidate>,
}

/// Normalize and classify a raw pool, dropping unpublishable and excluded records
pub fn prepare_pool(raw: &[RawCandidate], exclusions: &ExclusionFilter) -> Vec<Classification> {
    let pool: Vec<Classification> = raw
        .iter()
        .filter_map(normalize_candidate)
        .filter(|candidate| !exclusions.excludes(candidate))
        .map(classify)
        .collect();

    let dropped = raw.len() - pool.len();
    if dropped > 0 {
        debug!(dropped = dropped, "Dropped unusable or excluded records");
    }
    pool
}

/// News curation over an already merged pool
pub fn curate_news_pool(
    raw: &[RawCandidate],
    settings: &CurationSettings,
    now: DateTime<Utc>,
) -> Vec<ScoredCandidate> {
    let pool = prepare_pool(raw, &settings.exclusions);
    let plan = RelaxationPlan::news(settings.news_min, settings.news_soft_cap);
    let mut dedupe = Deduplicator::new();

    let accepted = plan.run(&pool, &mut dedupe, now);
    let mut ranked = rank(accepted, now);
    ranked.truncate(settings.news_max);
    ranked
}

pub async fn curate_news(
    fan_out: &mut QueryFanOut,
    provider: &dyn SearchProvider,
    settings: &CurationSettings,
    now: DateTime<Utc>,
) -> Vec<ScoredCandidate> {
    let raw = fan_out.fetch_all(provider, &settings.news_requests()).await;
    info!(candidates = raw.len(), "Merged news pool");

    let shortlist = curate_news_pool(&raw, settings, now);
    info!(selected = shortlist.len(), "News shortlist ready");
    shortlist
}

/// Query each configured source in priority order, keeping at most
/// `max_results` per source and `total_limit` overall
pub async fn fetch_sources(fan_out: &mut QueryFanOut, plan: &SourcePlan) -> Vec<RawCandidate> {
    let mut pool = Vec::new();
    for source in &plan.sources {
        let mut results = fan_out.fetch(source.provider.as_ref(), &source.request).await;
        results.truncate(source.max_results);
        info!(source = %source.name, count = results.len(), "Source fetched");
        pool.extend(results);
    }
    pool.truncate(plan.total_limit);
    pool
}

pub async fn curate_news_from_sources(
    fan_out: &mut QueryFanOut,
    plan: &SourcePlan,
    settings: &CurationSettings,
    now: DateTime<Utc>,
) -> Vec<ScoredCandidate> {
    let raw = fetch_sources(fan_out, plan).await;
    info!(candidates = raw.len(), "Merged news pool");

    let shortlist = curate_news_pool(&raw, settings, now);
    info!(selected = shortlist.len(), "News shortlist ready");
    shortlist
}

pub async fn curate_tools(
    fan_out: &mut QueryFanOut,
    provider: &dyn SearchProvider,
    settings: &CurationSettings,
    memory: &RunMemory,
    now: DateTime<Utc>,
) -> Vec<ScoredCandidate> {
    let mut dedupe = Deduplicator::new();
    let mut accepted: Vec<Classification> = Vec::new();

    for request in settings.tool_requests() {
        if accepted.len() >= settings.tool_max {
            break;
        }

        let raw = fan_out.fetch(provider, &request).await;
        for candidate in raw.iter().filter_map(normalize_candidate) {
            if accepted.len() >= settings.tool_max {
                break;
            }
            if seen_in_prior_runs(&candidate, memory) {
                debug!(url = %candidate.url, "Already recommended in an earlier run");
                continue;
            }
            if settings.exclusions.excludes(&candidate) {
                continue;
            }

            let classification = classify(candidate);
            if classification.looks_like_tool_artifact
                && dedupe.admit(&classification.dedupe_key)
            {
                accepted.push(classification);
            }
        }
    }

    info!(selected = accepted.len(), "Tool picks ready");
    accepted
        .into_iter()
        .map(|classification| ScoredCandidate {
            score: score(&classification.candidate, now),
            classification,
        })
        .collect()
}

/// Run both tracks.
///
/// News comes from the configured sources when there are any, otherwise from
/// the search provider's news queries. Tools always need the search provider.
/// Whatever is missing comes back empty.
pub async fn curate_daily(
    provider: Option<&dyn SearchProvider>,
    sources: Option<&SourcePlan>,
    settings: &CurationSettings,
    memory: &RunMemory,
    now: DateTime<Utc>,
) -> CurationOutcome {
    let mut fan_out = QueryFanOut::new(settings.query_interval, settings.call_timeout);
    let sources = sources.filter(|plan| !plan.sources.is_empty());

    let news = match (sources, provider) {
        (Some(plan), _) => curate_news_from_sources(&mut fan_out, plan, settings, now).await,
        (None, Some(provider)) => curate_news(&mut fan_out, provider, settings, now).await,
        (None, None) => {
            warn!("No search provider or news source configured; news will be empty");
            Vec::new()
        }
    };

    let tools = match provider {
        Some(provider) => curate_tools(&mut fan_out, provider, settings, memory, now).await,
        None => {
            warn!("No search provider configured; tools will be empty");
            Vec::new()
        }
    };

    if fan_out.failures() > 0 {
        warn!(failures = fan_out.failures(), "Some searches failed");
    }

    CurationOutcome { news, tools }
}

/// Record the emitted tools so later runs skip them
pub fn remember_tools(memory: &mut RunMemory, tools: &[ScoredCandidate]) {
    for tool in tools {
        memory.remember(tool.candidate().url.clone());
    }
}
