use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::{Digest, DIGEST_VERSION};

/// `<out_dir>/daily`, created on demand
pub fn daily_dir(out_dir: &Path) -> Result<PathBuf> {
    let dir = out_dir.join("daily");
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create digest directory: {}", dir.display()))?;
    Ok(dir)
}

/// Save the digest next to its markdown page as `daily/<date>.json`
pub fn save_digest(digest: &Digest, out_dir: &Path) -> Result<PathBuf> {
    let filepath = daily_dir(out_dir)?.join(format!("{}.json", digest.date));

    let json = serde_json::to_string_pretty(digest).context("Failed to serialize digest")?;

    fs::write(&filepath, json)
        .with_context(|| format!("Failed to write digest file: {}", filepath.display()))?;

    Ok(filepath)
}

/// Load a digest written by [`save_digest`]
pub fn load_digest(filepath: &Path) -> Result<Digest> {
    if !filepath.exists() {
        anyhow::bail!("Digest file not found: {}", filepath.display());
    }

    let content = fs::read_to_string(filepath)
        .with_context(|| format!("Failed to read digest file: {}", filepath.display()))?;

    let digest: Digest = serde_json::from_str(&content).with_context(|| {
        format!(
            "Failed to parse digest JSON from {}. The file may be corrupted or not a digest file.",
            filepath.display()
        )
    })?;

    if digest.version != DIGEST_VERSION {
        anyhow::bail!(
            "Unsupported digest version: {}. Expected {}. Regenerate it with curate-daily.",
            digest.version,
            DIGEST_VERSION
        );
    }

    Ok(digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DigestItem;

    fn sample() -> Digest {
        let item = DigestItem {
            title: "Chip export rules tighten".to_string(),
            url: "https://reuters.com/tech/chips".to_string(),
            description: "New rules".to_string(),
            source: "Reuters".to_string(),
            published: Some("2026-02-01T08:00:00Z".to_string()),
            score: 4.5,
            title_local: Some("芯片出口规则收紧".to_string()),
            summary_local: None,
        };
        Digest::new("2026-02-01", vec![item], vec![])
    }

    #[test]
    fn test_save_and_load_digest() {
        let dir = tempfile::tempdir().unwrap();
        let digest = sample();

        let path = save_digest(&digest, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("daily").join("2026-02-01.json"));

        let loaded = load_digest(&path).unwrap();
        assert_eq!(loaded.date, "2026-02-01");
        assert_eq!(loaded.news, digest.news);
        assert!(loaded.tools.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_digest(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_load_rejects_other_version() {
        let dir = tempfile::tempdir().unwrap();
        let mut digest = sample();
        digest.version = "0.9".to_string();
        let path = save_digest(&digest, dir.path()).unwrap();

        let err = load_digest(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported digest version"));
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_digest(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse digest JSON"));
    }
}
