//! Boolean predicates over a single normalized candidate.
//!
//! Every predicate is a closed rule over the tables in [`crate::vocabulary`],
//! so the same input always gets the same verdict.

use crate::dedupe::dedupe_key;
use crate::models::{Classification, NormalizedCandidate};
use crate::vocabulary::{
    CODE_HOST, CODE_HOST_RESERVED, CODE_HOST_THREAD_SEGMENTS, DENIED_DOMAIN,
    ENCYCLOPEDIA_MARKERS, EVENT_SIGNAL, FORUM_HOSTS, FORUM_SEGMENTS, GENERIC_TITLE,
    LISTICLE_TEXT, LISTING_SEGMENTS, MODEL_HOST, MODEL_HOST_NAMESPACES, NON_ARTICLE_TITLE,
    PACKAGE_REGISTRIES, REPUTABLE_DOMAINS, SECTION_PATHS, TOOLING_VOCABULARY,
};

/// Run every predicate once and attach the dedupe key
pub fn classify(candidate: NormalizedCandidate) -> Classification {
    Classification {
        is_homepage_or_section: is_homepage_or_section(&candidate),
        is_reputable_source: is_reputable_source(&candidate.host),
        looks_like_news_event: looks_like_news_event(&candidate),
        looks_like_tool_artifact: looks_like_tool_artifact(&candidate),
        dedupe_key: dedupe_key(&candidate),
        candidate,
    }
}

pub fn is_homepage_or_section(candidate: &NormalizedCandidate) -> bool {
    let path = candidate.path.trim_end_matches('/').to_lowercase();
    if path.is_empty() {
        return true;
    }
    if SECTION_PATHS.contains(&path.as_str()) {
        return true;
    }

    if candidate.path_segments().len() <= 1 && GENERIC_TITLE.is_match(&candidate.title) {
        return true;
    }

    let title = candidate.title.to_lowercase();
    ENCYCLOPEDIA_MARKERS
        .iter()
        .any(|marker| candidate.host.contains(marker) || title.contains(marker))
}

/// `host` is expected without a leading `www.`
pub fn is_reputable_source(host: &str) -> bool {
    if host == DENIED_DOMAIN || host.ends_with(&format!(".{}", DENIED_DOMAIN)) {
        return false;
    }
    REPUTABLE_DOMAINS.contains(host)
}

pub fn looks_like_news_event(candidate: &NormalizedCandidate) -> bool {
    if NON_ARTICLE_TITLE.is_match(&candidate.title) {
        return false;
    }
    EVENT_SIGNAL.is_match(&candidate.combined_text())
}

pub fn looks_like_tool_artifact(candidate: &NormalizedCandidate) -> bool {
    let text = candidate.combined_text();
    if LISTICLE_TEXT.is_match(&text) {
        return false;
    }
    if is_forum_thread(candidate) || is_listing_page(candidate) {
        return false;
    }
    if !TOOLING_VOCABULARY.is_match(&text) {
        return false;
    }
    has_artifact_shape(candidate)
}

fn is_forum_thread(candidate: &NormalizedCandidate) -> bool {
    if FORUM_HOSTS
        .iter()
        .any(|h| candidate.host == *h || candidate.host.ends_with(&format!(".{}", h)))
    {
        return true;
    }
    candidate
        .path_segments()
        .iter()
        .any(|segment| FORUM_SEGMENTS.contains(&segment.to_lowercase().as_str()))
}

fn is_listing_page(candidate: &NormalizedCandidate) -> bool {
    candidate.path_segments().iter().any(|segment| {
        let segment = segment.to_lowercase();
        LISTING_SEGMENTS.contains(&segment.as_str()) || segment.starts_with("best-")
    })
}

/// Registry, code host and model host URLs must point at one artifact;
/// anything else just has to be a concrete page.
fn has_artifact_shape(candidate: &NormalizedCandidate) -> bool {
    let segments = candidate.path_segments();

    if candidate.host == CODE_HOST {
        return segments.len() >= 2
            && !CODE_HOST_RESERVED.contains(&segments[0])
            && !segments
                .get(2)
                .is_some_and(|sub| CODE_HOST_THREAD_SEGMENTS.contains(sub));
    }

    if let Some((_, prefix)) = PACKAGE_REGISTRIES
        .iter()
        .find(|(host, _)| candidate.host == *host)
    {
        return match segments.as_slice() {
            [first, name] => first == prefix && !name.starts_with('@'),
            // Scoped npm packages: /package/@scope/name
            [first, scope, _] if scope.starts_with('@') => first == prefix,
            // PyPI keeps a trailing version: /project/name/1.2.3
            [first, _, _] => first == prefix && *prefix == "project",
            _ => false,
        };
    }

    if candidate.host == MODEL_HOST {
        return segments.len() >= 3 && MODEL_HOST_NAMESPACES.contains(&segments[0]);
    }

    !is_homepage_or_section(candidate)
}
