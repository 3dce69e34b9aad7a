use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use shared::{curate_news_pool, parse_brave_response, CurationSettings, DigestItem};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "process-results")]
#[command(about = "Curate a captured search response into a news shortlist")]
struct Args {
    /// Saved search response JSON (reads stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Maximum news items to print
    #[arg(long, default_value = "5")]
    news_max: usize,
}

fn read_input(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display())),
        None => {
            let mut body = String::new();
            io::stdin()
                .read_to_string(&mut body)
                .context("Failed to read search response from stdin")?;
            Ok(body)
        }
    }
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let body = read_input(args.input.as_ref())?;
    let raw = parse_brave_response(&body).context("Failed to decode search response")?;
    info!(candidates = raw.len(), "Decoded search response");

    let settings = CurationSettings {
        news_max: args.news_max,
        ..CurationSettings::default()
    };
    let shortlist = curate_news_pool(&raw, &settings, Utc::now());

    let items: Vec<DigestItem> = shortlist.iter().map(DigestItem::from_scored).collect();
    let json = serde_json::to_string_pretty(&items).context("Failed to serialize shortlist")?;
    println!("{}", json);

    Ok(())
}
