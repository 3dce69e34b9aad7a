use anyhow::{Context, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::DigestItem;
use crate::vocabulary::GLOSSARY;

const DEEPSEEK_ENDPOINT: &str = "https://api.deepseek.com/chat/completions";
const DEEPSEEK_MODEL: &str = "deepseek-chat";
const FALLBACK_SUMMARY_CHARS: usize = 80;
const GLOSSARY_SUMMARY_CHARS: usize = 200;

/// Fills `title_local` / `summary_local`. Runs after curation and never fails:
/// items it cannot translate keep their original text.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, items: &mut [DigestItem]);
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct TranslationBatch {
    #[serde(default)]
    results: Vec<TranslatedEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct TranslatedEntry {
    #[serde(default)]
    title_zh: Option<String>,
    #[serde(default)]
    summary_zh: Option<String>,
}

pub struct DeepSeekTranslator {
    client: Client,
    api_key: String,
}

impl DeepSeekTranslator {
    pub fn new(api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, api_key })
    }

    async fn translate_batch(&self, items: &[DigestItem]) -> Result<Vec<TranslatedEntry>> {
        for attempt in 0..3u32 {
            match self.try_translate(items).await {
                Ok(entries) => return Ok(entries),
                Err(e) => {
                    if attempt == 2 {
                        return Err(e);
                    }
                    let backoff = std::time::Duration::from_millis(1000 * 2_u64.pow(attempt));
                    warn!(error = %e, ?backoff, "Translation failed, retrying");
                    tokio::time::sleep(backoff).await;
                }
            }
        }

        anyhow::bail!("Max retries reached")
    }

    async fn try_translate(&self, items: &[DigestItem]) -> Result<Vec<TranslatedEntry>> {
        let request = ChatRequest {
            model: DEEPSEEK_MODEL.to_string(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: "You are a professional translator for AI and technology news. \
                              Keep technical terms accurate."
                        .to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: build_prompt(items),
                },
            ],
            temperature: 0.3,
            max_tokens: 2000,
        };

        let response = self
            .client
            .post(DEEPSEEK_ENDPOINT)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to translation API")?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unknown error"));
            anyhow::bail!("Translation API error: {}", error_text);
        }

        let chat = response
            .json::<ChatResponse>()
            .await
            .context("Failed to parse translation API response")?;

        let reply = chat
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .unwrap_or("");

        parse_reply(reply)
    }
}

#[async_trait]
impl Translator for DeepSeekTranslator {
    async fn translate(&self, items: &mut [DigestItem]) {
        if items.is_empty() {
            return;
        }

        match self.translate_batch(items).await {
            Ok(entries) => merge_entries(items, entries),
            Err(e) => {
                warn!(error = %e, "Translation unavailable, keeping original text");
                merge_entries(items, Vec::new());
            }
        }
    }
}

fn build_prompt(items: &[DigestItem]) -> String {
    let mut prompt = String::from(
        "For each AI news item below:\n\
         1. Translate the English title into a concise Simplified Chinese title (at most 40 characters).\n\
         2. Write a one-sentence Simplified Chinese summary from the description (at most 80 characters).\n\n\
         Reply with JSON only, one entry per item, in the same order:\n\
         {\"results\": [{\"title_zh\": \"...\", \"summary_zh\": \"...\"}]}\n\n\
         Items:\n",
    );
    for (i, item) in items.iter().enumerate() {
        prompt.push_str(&format!(
            "\n{}. Title: {}\n   Description: {}\n",
            i + 1,
            item.title,
            item.description
        ));
    }
    prompt
}

/// Pull the outermost JSON object out of a chat reply
fn parse_reply(reply: &str) -> Result<Vec<TranslatedEntry>> {
    let json_text = match (reply.find('{'), reply.rfind('}')) {
        (Some(start), Some(end)) if start < end => &reply[start..=end],
        _ => anyhow::bail!("No JSON object in translation reply"),
    };

    let batch: TranslationBatch =
        serde_json::from_str(json_text).context("Failed to parse translation JSON")?;
    Ok(batch.results)
}

/// Entry `i` localizes item `i`; missing or blank entries fall back to the
/// original title and the start of the description.
fn merge_entries(items: &mut [DigestItem], entries: Vec<TranslatedEntry>) {
    let mut entries = entries.into_iter();
    for item in items.iter_mut() {
        let entry = entries.next().unwrap_or_default();
        item.title_local = Some(
            entry
                .title_zh
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| item.title.clone()),
        );
        item.summary_local = Some(
            entry
                .summary_zh
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| truncate_chars(&item.description, FALLBACK_SUMMARY_CHARS)),
        );
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

static GLOSSARY_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    GLOSSARY
        .iter()
        .map(|(term, local)| {
            // Acronyms match exactly so "US" leaves "us" alone
            let flags = if term.chars().all(|c| c.is_ascii_uppercase()) {
                ""
            } else {
                "(?i)"
            };
            let pattern = format!(r"{}\b{}\b", flags, regex::escape(term));
            (Regex::new(&pattern).expect("glossary regex"), *local)
        })
        .collect()
});

/// Offline fallback: whole-word term substitution from a fixed table
#[derive(Debug, Default)]
pub struct GlossaryTranslator;

impl GlossaryTranslator {
    pub fn translate_text(text: &str) -> String {
        GLOSSARY_PATTERNS
            .iter()
            .fold(text.to_string(), |acc, (re, local)| {
                re.replace_all(&acc, *local).into_owned()
            })
            .trim()
            .to_string()
    }

    /// A result under half the original length means the table ate the
    /// text; keep the original instead.
    fn shrank(original: &str, translated: &str) -> bool {
        translated.chars().count() * 2 < original.chars().count()
    }
}

#[async_trait]
impl Translator for GlossaryTranslator {
    async fn translate(&self, items: &mut [DigestItem]) {
        for item in items.iter_mut() {
            let title = Self::translate_text(&item.title);
            item.title_local = Some(if Self::shrank(&item.title, &title) {
                item.title.clone()
            } else {
                title
            });

            let summary = Self::translate_text(&item.description);
            item.summary_local = Some(if Self::shrank(&item.description, &summary) {
                let mut short = truncate_chars(&item.description, GLOSSARY_SUMMARY_CHARS);
                if item.description.chars().count() > GLOSSARY_SUMMARY_CHARS {
                    short.push_str("...");
                }
                short
            } else {
                summary
            });
        }
    }
}
