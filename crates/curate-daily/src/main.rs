use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::Parser;
use shared::{
    curate_daily, default_memory_path, remember_tools, save_digest, BraveSearchClient, Config,
    CurationSettings, DeepSeekTranslator, Digest, DigestItem, DigestWriter, GlossaryTranslator,
    RunMemory, SearchProvider, SourcesConfig, Translator,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "curate-daily")]
#[command(about = "Curate today's AI news and tool picks into a markdown digest")]
struct Args {
    /// Directory that receives daily/<date>.md and daily/<date>.json
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Tool memory file (defaults to the local data directory)
    #[arg(short, long)]
    memory: Option<PathBuf>,

    /// News sources config; the built-in search queries are used when it is missing
    #[arg(short, long, default_value = "sources.json")]
    sources: PathBuf,

    /// Maximum news items to publish
    #[arg(long, default_value = "5")]
    news_max: usize,

    /// Maximum tools to publish
    #[arg(long, default_value = "3")]
    tool_max: usize,

    /// Minimum milliseconds between two search calls
    #[arg(long, default_value = "1100")]
    interval_ms: u64,
}

fn build_provider(config: &Config, timeout: Duration) -> Option<BraveSearchClient> {
    let key = config.brave_api_key.clone()?;
    match BraveSearchClient::new(key, timeout) {
        Ok(client) => Some(client),
        Err(e) => {
            warn!(error = %e, "Could not create search client");
            None
        }
    }
}

/// Run memory is best-effort, so a missing data directory falls back to the
/// output directory instead of failing the run
fn memory_path_or_fallback(default: Result<PathBuf>, output_dir: &Path) -> PathBuf {
    match default {
        Ok(path) => path,
        Err(e) => {
            let fallback = output_dir.join("tool-memory.json");
            warn!(error = %e, fallback = %fallback.display(), "No data directory for run memory");
            fallback
        }
    }
}

fn build_translator(config: &Config) -> Box<dyn Translator> {
    if let Some(key) = config.deepseek_api_key.clone() {
        match DeepSeekTranslator::new(key) {
            Ok(translator) => return Box::new(translator),
            Err(e) => warn!(error = %e, "Could not create translation client"),
        }
    }
    Box::new(GlossaryTranslator)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = Config::from_env();

    let sources_config = SourcesConfig::load(&args.sources);

    let settings = CurationSettings {
        news_max: args.news_max,
        tool_max: args.tool_max,
        query_interval: Duration::from_millis(args.interval_ms),
        exclusions: sources_config
            .as_ref()
            .map(|c| c.filters.clone())
            .unwrap_or_default(),
        ..CurationSettings::default()
    };

    let memory_path = match args.memory {
        Some(path) => path,
        None => memory_path_or_fallback(default_memory_path(), &args.output_dir),
    };
    let mut memory = RunMemory::load(&memory_path, settings.memory_window);

    let provider = build_provider(&config, settings.call_timeout);
    let source_plan = sources_config
        .as_ref()
        .map(|c| c.build_plan(&config, settings.call_timeout));

    match &source_plan {
        Some(plan) => println!(
            "✓ Loaded {} news sources from {}",
            plan.sources.len(),
            args.sources.display()
        ),
        None if provider.is_none() => {
            println!("⚠ BRAVE_API_KEY not set and no sources config; the digest will be empty.")
        }
        None => {}
    }

    println!("\n🔎 Searching for today's AI news and tools...");
    let now = Utc::now();
    let outcome = curate_daily(
        provider.as_ref().map(|p| p as &dyn SearchProvider),
        source_plan.as_ref(),
        &settings,
        &memory,
        now,
    )
    .await;

    println!(
        "✓ Selected {} news items and {} tools",
        outcome.news.len(),
        outcome.tools.len()
    );

    let mut news: Vec<DigestItem> = outcome.news.iter().map(DigestItem::from_scored).collect();
    let mut tools: Vec<DigestItem> = outcome.tools.iter().map(DigestItem::from_scored).collect();

    println!("\n🌐 Translating...");
    let translator = build_translator(&config);
    translator.translate(&mut news).await;
    translator.translate(&mut tools).await;

    let date = Local::now().format("%Y-%m-%d").to_string();
    let digest = Digest::new(date.clone(), news, tools);

    println!("\n📝 Writing digest...");
    let markdown = DigestWriter::generate_markdown(&digest);
    let md_path = DigestWriter::save_markdown(&markdown, &args.output_dir, &date)
        .context("Failed to save markdown digest")?;
    let json_path =
        save_digest(&digest, &args.output_dir).context("Failed to save JSON digest")?;

    remember_tools(&mut memory, &outcome.tools);
    memory.save_best_effort(&memory_path, settings.memory_window);

    println!("\n✅ Digest saved to: {}", md_path.display());
    println!("   Data saved to: {}", json_path.display());

    Ok(())
}
