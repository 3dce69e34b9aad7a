use crate::vocabulary::SOURCE_LABELS;

pub const UNKNOWN_SOURCE: &str = "Unknown source";

/// Human-readable publisher name for a normalized host
pub fn source_label(host: &str) -> String {
    if host.is_empty() {
        return UNKNOWN_SOURCE.to_string();
    }

    if let Some((_, label)) = SOURCE_LABELS
        .iter()
        .find(|(domain, _)| host == *domain || host.ends_with(&format!(".{}", domain)))
    {
        return label.to_string();
    }

    // "venturebeat.com" -> "Venturebeat"
    let first = host.split('.').next().unwrap_or(host);
    let mut chars = first.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => UNKNOWN_SOURCE.to_string(),
    }
}
