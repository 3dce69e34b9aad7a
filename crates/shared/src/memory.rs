use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Entries kept across runs when no other window is configured
pub const DEFAULT_MEMORY_WINDOW: usize = 300;

/// Tool URLs recommended by earlier runs, oldest first.
///
/// Read once at the start of a run and written once at the end; the
/// scheduler guarantees a single writer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunMemory {
    #[serde(default)]
    recent: VecDeque<String>,
}

impl RunMemory {
    /// Load the last `window` entries. Missing or unreadable files give an
    /// empty memory.
    pub fn load(path: &Path, window: usize) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "No run memory yet");
            return Self::default();
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read run memory, starting empty");
                return Self::default();
            }
        };

        match serde_json::from_str::<RunMemory>(&content) {
            Ok(mut memory) => {
                memory.truncate(window);
                memory
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Run memory is not valid JSON, starting empty");
                Self::default()
            }
        }
    }

    pub fn contains(&self, url: &str) -> bool {
        self.recent.iter().any(|u| u == url)
    }

    pub fn remember(&mut self, url: impl Into<String>) {
        let url = url.into();
        if !self.contains(&url) {
            self.recent.push_back(url);
        }
    }

    /// Drop the oldest entries beyond `window`
    pub fn truncate(&mut self, window: usize) {
        while self.recent.len() > window {
            self.recent.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.recent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }

    pub fn recent(&self) -> impl Iterator<Item = &str> {
        self.recent.iter().map(String::as_str)
    }

    /// Truncate to `window` and write as `{ "recent": [...] }`
    pub fn save(&mut self, path: &Path, window: usize) -> Result<()> {
        self.truncate(window);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create run memory directory")?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize run memory")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write run memory: {}", path.display()))?;

        Ok(())
    }

    /// Same as [`RunMemory::save`], but a failure is only logged
    pub fn save_best_effort(&mut self, path: &Path, window: usize) {
        if let Err(e) = self.save(path, window) {
            warn!(error = %e, "Run memory not saved");
        }
    }
}

/// `<local data dir>/ai-daily/tool-memory.json`
pub fn default_memory_path() -> Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .context("Could not determine local data directory")?
        .join("ai-daily");

    Ok(data_dir.join("tool-memory.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let memory = RunMemory::load(&dir.path().join("nope.json"), DEFAULT_MEMORY_WINDOW);
        assert!(memory.is_empty());
    }

    #[test]
    fn test_corrupt_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("memory.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(RunMemory::load(&path, DEFAULT_MEMORY_WINDOW).is_empty());
    }

    #[test]
    fn test_missing_recent_key_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("memory.json");
        fs::write(&path, "{}").unwrap();
        assert!(RunMemory::load(&path, DEFAULT_MEMORY_WINDOW).is_empty());
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("memory.json");

        let mut memory = RunMemory::default();
        memory.remember("https://github.com/a/b");
        memory.remember("https://pypi.org/project/c/");
        memory.save(&path, DEFAULT_MEMORY_WINDOW).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"recent\""));

        let loaded = RunMemory::load(&path, DEFAULT_MEMORY_WINDOW);
        assert_eq!(loaded, memory);
        assert!(loaded.contains("https://github.com/a/b"));
    }

    #[test]
    fn test_truncate_keeps_most_recent() {
        let mut memory = RunMemory::default();
        for i in 0..10 {
            memory.remember(format!("https://github.com/o/r{}", i));
        }
        memory.truncate(3);

        let kept: Vec<&str> = memory.recent().collect();
        assert_eq!(
            kept,
            vec![
                "https://github.com/o/r7",
                "https://github.com/o/r8",
                "https://github.com/o/r9"
            ]
        );
    }

    #[test]
    fn test_load_keeps_only_recent_window() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("memory.json");
        let recent: Vec<String> = (0..5).map(|i| format!("https://github.com/o/r{}", i)).collect();
        fs::write(&path, serde_json::json!({ "recent": recent }).to_string()).unwrap();

        let memory = RunMemory::load(&path, 2);
        assert_eq!(memory.len(), 2);
        assert!(!memory.contains("https://github.com/o/r2"));
        assert!(memory.contains("https://github.com/o/r3"));
        assert!(memory.contains("https://github.com/o/r4"));
    }

    #[test]
    fn test_remember_skips_duplicates() {
        let mut memory = RunMemory::default();
        memory.remember("https://github.com/a/b");
        memory.remember("https://github.com/a/b");
        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn test_save_best_effort_does_not_panic() {
        let dir = tempdir().unwrap();
        // A directory where the file should be makes the write fail
        let path = dir.path().join("memory.json");
        fs::create_dir_all(&path).unwrap();

        let mut memory = RunMemory::default();
        memory.remember("https://github.com/a/b");
        memory.save_best_effort(&path, DEFAULT_MEMORY_WINDOW);
    }
}
