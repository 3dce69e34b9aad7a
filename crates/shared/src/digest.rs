use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

use crate::io::daily_dir;
use crate::models::{Digest, DigestItem};

pub struct DigestWriter;

impl DigestWriter {
    fn format_timestamp(created_at: &str) -> String {
        match DateTime::parse_from_rfc3339(created_at) {
            Ok(dt) => dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
            Err(_) => created_at.to_string(),
        }
    }

    pub fn generate_markdown(digest: &Digest) -> String {
        let mut md = String::new();

        md.push_str(&format!("# AI Daily · {}\n\n", digest.date));
        md.push_str(&format!(
            "日期: {}\n\n",
            Self::format_timestamp(&digest.created_at)
        ));

        md.push_str("## 📰 今日新闻\n\n");
        if digest.news.is_empty() {
            md.push_str("_今日暂无符合条件的新闻。_\n\n");
        }
        for item in &digest.news {
            Self::push_news_item(&mut md, item);
        }

        md.push_str("## 🛠️ 工具推荐\n\n");
        if digest.tools.is_empty() {
            md.push_str("_今日暂无新工具。_\n\n");
        }
        for item in &digest.tools {
            Self::push_tool_item(&mut md, item);
        }

        md.push_str("## 📚 归档\n");
        md.push_str(&format!("- [{0}](./{0}.html)\n", digest.date));

        md
    }

    fn push_news_item(md: &mut String, item: &DigestItem) {
        md.push_str(&format!(
            "### {}\n\n",
            Self::escape_markdown(item.display_title())
        ));
        md.push_str(&format!("来源: [{}]({})\n\n", item.source, item.url));

        let summary = item.display_summary();
        if !summary.is_empty() {
            md.push_str(&format!("{}\n\n", Self::escape_markdown(summary)));
        }

        md.push_str(&format!("[阅读原文]({})\n\n", item.url));
        md.push_str("---\n\n");
    }

    fn push_tool_item(md: &mut String, item: &DigestItem) {
        md.push_str(&format!(
            "### {}\n\n",
            Self::escape_markdown(item.display_title())
        ));

        let summary = item.display_summary();
        if !summary.is_empty() {
            md.push_str(&format!("📝 {}\n\n", Self::escape_markdown(summary)));
        }

        md.push_str(&format!("🔗 [访问]({})\n\n", item.url));
        md.push_str("---\n\n");
    }

    /// Escape characters that would turn plain text into links or emphasis
    fn escape_markdown(text: &str) -> String {
        let mut escaped = String::with_capacity(text.len());
        for c in text.chars() {
            if matches!(c, '\\' | '[' | ']' | '*' | '_' | '`') {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        escaped
    }

    pub fn save_markdown(content: &str, out_dir: &Path, date: &str) -> Result<PathBuf> {
        let filepath = daily_dir(out_dir)?.join(format!("{}.md", date));

        fs::write(&filepath, content)
            .with_context(|| format!("Failed to write digest page: {}", filepath.display()))?;

        Ok(filepath)
    }
}
