use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::models::{NormalizedCandidate, RawCandidate};
use crate::vocabulary::{BOILERPLATE_MARKERS, HTML_ENTITIES};

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("tag regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Clean one text field: strip markup, decode entities, collapse whitespace
/// and cut everything from the first promotional marker onward.
///
/// `normalize(normalize(x)) == normalize(x)` for every input.
pub fn normalize(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    // Decoding can expose new tags ("&lt;b&gt;") and stripping can expose new
    // entities ("&am<i></i>p;"); both only ever shrink the text, so this ends.
    let mut text = raw.to_string();
    loop {
        let next = TAG.replace_all(&decode_entities(&text), "").into_owned();
        if next == text {
            break;
        }
        text = next;
    }

    let collapsed = WHITESPACE.replace_all(&text, " ");
    let kept = match BOILERPLATE_MARKERS.find(&collapsed) {
        Some(m) => &collapsed[..m.start()],
        None => &collapsed[..],
    };

    kept.trim().to_string()
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match HTML_ENTITIES
            .iter()
            .find(|(entity, _)| tail.starts_with(entity))
        {
            Some((entity, replacement)) => {
                out.push_str(replacement);
                rest = &tail[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Lowercase a host and drop a leading `www.`
pub fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('.').to_lowercase();
    match host.strip_prefix("www.") {
        Some(stripped) => stripped.to_string(),
        None => host,
    }
}

/// Clean every text field and split the URL. Returns `None` for records that
/// cannot be published: empty title, empty or unparseable URL, or no host.
pub fn normalize_candidate(raw: &RawCandidate) -> Option<NormalizedCandidate> {
    let title = normalize(&raw.title);
    let url = raw.url.trim();
    if title.is_empty() || url.is_empty() {
        return None;
    }

    let parsed = Url::parse(url).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }

    let host = raw
        .source_host
        .as_deref()
        .map(normalize_host)
        .filter(|h| !h.is_empty())
        .or_else(|| parsed.host_str().map(normalize_host))?;

    let recency = raw
        .recency
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string);

    Some(NormalizedCandidate {
        title,
        url: url.to_string(),
        host,
        path: parsed.path().to_string(),
        snippet: normalize(&raw.snippet),
        recency,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n\t "), "");
    }

    #[test]
    fn test_strips_tags_and_decodes_entities() {
        assert_eq!(
            normalize("<strong>OpenAI</strong> &amp; Microsoft&nbsp;expand deal"),
            "OpenAI & Microsoft expand deal"
        );
        assert_eq!(normalize("It&#39;s &ldquo;here&rdquo;"), "It's \"here\"");
    }

    #[test]
    fn test_unknown_entities_pass_through() {
        assert_eq!(normalize("caf&eacute; &bogus; & co"), "caf&eacute; &bogus; & co");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize("  a\n\n  b \t c  "), "a b c");
    }

    #[test]
    fn test_truncates_at_boilerplate_case_insensitive() {
        assert_eq!(
            normalize("Nvidia posts record revenue. SUBSCRIBE for more"),
            "Nvidia posts record revenue."
        );
        assert_eq!(normalize("Big news. Login to read. Register today"), "Big news.");
        assert_eq!(normalize("Subscribe"), "");
    }

    #[test]
    fn test_tolerates_malformed_markup() {
        assert_eq!(normalize("<div><p>unclosed <b>bold"), "unclosed bold");
        assert_eq!(normalize("a < b and c > d"), "a d");
        assert_eq!(normalize("3 < 4"), "3 < 4");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "&amp;lt;b&amp;gt;bold&amp;lt;/b&amp;gt;",
            "&am<i></i>p;amp;",
            "<p>Hello&nbsp;&nbsp;world</p>\n\nRegister now",
            "&lt;script&gt;alert(1)&lt;/script&gt; text",
            "plain text",
            "  trailing   space  &hellip;",
            "tag < not closed & stray",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn test_normalize_host() {
        assert_eq!(normalize_host("WWW.Reuters.com"), "reuters.com");
        assert_eq!(normalize_host("github.com"), "github.com");
    }

    #[test]
    fn test_normalize_candidate_drops_missing_fields() {
        let no_title = RawCandidate {
            title: "<b></b>".to_string(),
            url: "https://reuters.com/a".to_string(),
            ..Default::default()
        };
        assert!(normalize_candidate(&no_title).is_none());

        let no_url = RawCandidate {
            title: "A title".to_string(),
            ..Default::default()
        };
        assert!(normalize_candidate(&no_url).is_none());

        let bad_url = RawCandidate {
            title: "A title".to_string(),
            url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(normalize_candidate(&bad_url).is_none());
    }

    #[test]
    fn test_normalize_candidate_splits_url() {
        let raw = RawCandidate {
            title: "OpenAI releases a model".to_string(),
            url: "https://www.Reuters.com/technology/openai-model/?x=1".to_string(),
            snippet: "<p>Details</p>".to_string(),
            recency: Some(" 2 hours ago ".to_string()),
            source_host: None,
        };
        let candidate = normalize_candidate(&raw).unwrap();
        assert_eq!(candidate.host, "reuters.com");
        assert_eq!(candidate.path, "/technology/openai-model/");
        assert_eq!(candidate.snippet, "Details");
        assert_eq!(candidate.recency.as_deref(), Some("2 hours ago"));
    }

    #[test]
    fn test_source_host_overrides_url_host() {
        let raw = RawCandidate {
            title: "Story".to_string(),
            url: "https://feeds.example.net/story".to_string(),
            source_host: Some("www.theverge.com".to_string()),
            ..Default::default()
        };
        assert_eq!(normalize_candidate(&raw).unwrap().host, "theverge.com");
    }
}
