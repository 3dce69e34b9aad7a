use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Classification, NormalizedCandidate, ScoredCandidate};
use crate::vocabulary::{TECH_PRESS_DOMAINS, VENDOR_DOMAINS, WIRE_DOMAINS};

/// Ages beyond this earn no recency bonus
pub const RECENCY_WINDOW_HOURS: f64 = 72.0;
/// Bonus for an item published right now
pub const RECENCY_MAX_BONUS: f64 = 2.0;

static RELATIVE_AGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(\d+|an?)\s+(minute|min|hour|hr|day|week|month|year)s?\s+ago$")
        .expect("age regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DomainTier {
    Other,
    Vendor,
    TechPress,
    Wire,
}

impl DomainTier {
    pub fn of(host: &str) -> Self {
        if WIRE_DOMAINS.contains(&host) {
            DomainTier::Wire
        } else if TECH_PRESS_DOMAINS.contains(&host) {
            DomainTier::TechPress
        } else if VENDOR_DOMAINS.contains(&host) {
            DomainTier::Vendor
        } else {
            DomainTier::Other
        }
    }

    pub fn boost(&self) -> f64 {
        match self {
            DomainTier::Wire => 3.0,
            DomainTier::TechPress => 2.0,
            DomainTier::Vendor => 1.0,
            DomainTier::Other => 0.0,
        }
    }
}

/// Parse the provider's recency field into an absolute time.
///
/// Accepts RFC 3339, naive ISO-8601 (treated as UTC), RFC 2822, bare dates
/// and "N hours ago" style ages relative to `now`.
pub fn parse_recency(raw: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in &["%Y-%m-%d", "%B %e, %Y", "%b %e, %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|d| d.and_utc());
        }
    }

    if raw.eq_ignore_ascii_case("yesterday") {
        return now.checked_sub_signed(Duration::try_days(1)?);
    }

    let caps = RELATIVE_AGE.captures(raw)?;
    let amount: i64 = match &caps[1] {
        n if n.eq_ignore_ascii_case("a") || n.eq_ignore_ascii_case("an") => 1,
        n => n.parse().ok()?,
    };
    let unit = caps[2].to_lowercase();
    // Months and years are approximate; only the cutoffs care
    let age = match unit.as_str() {
        "minute" | "min" => Duration::try_minutes(amount)?,
        "hour" | "hr" => Duration::try_hours(amount)?,
        "day" => Duration::try_days(amount)?,
        "week" => Duration::try_weeks(amount)?,
        "month" => Duration::try_days(amount.checked_mul(30)?)?,
        "year" => Duration::try_days(amount.checked_mul(365)?)?,
        _ => return None,
    };
    now.checked_sub_signed(age)
}

/// Hours since publication, `None` when the recency field is absent or unparseable.
/// Future timestamps report zero.
pub fn age_hours(candidate: &NormalizedCandidate, now: DateTime<Utc>) -> Option<f64> {
    let published = parse_recency(candidate.recency.as_deref()?, now)?;
    let minutes = now.signed_duration_since(published).num_minutes().max(0);
    Some(minutes as f64 / 60.0)
}

/// Linear decay from [`RECENCY_MAX_BONUS`] at age zero to nothing at the window edge
pub fn recency_bonus(age_hours: Option<f64>) -> f64 {
    match age_hours {
        Some(hours) => {
            let clamped = hours.clamp(0.0, RECENCY_WINDOW_HOURS);
            RECENCY_MAX_BONUS * (RECENCY_WINDOW_HOURS - clamped) / RECENCY_WINDOW_HOURS
        }
        None => 0.0,
    }
}

pub fn score(candidate: &NormalizedCandidate, now: DateTime<Utc>) -> f64 {
    DomainTier::of(&candidate.host).boost() + recency_bonus(age_hours(candidate, now))
}

/// Score and order by score descending; equal scores keep discovery order
pub fn rank(accepted: Vec<Classification>, now: DateTime<Utc>) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = accepted
        .into_iter()
        .map(|classification| {
            let score = score(&classification.candidate, now);
            ScoredCandidate {
                classification,
                score,
            }
        })
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}
