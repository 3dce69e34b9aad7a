// Public modules
pub mod classify;
pub mod config;
pub mod dedupe;
pub mod digest;
pub mod fanout;
pub mod feed;
pub mod io;
pub mod labels;
pub mod memory;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod relax;
pub mod score;
pub mod search;
pub mod sources;
pub mod translator;
pub mod vocabulary;

// Re-export commonly used types
pub use config::{Config, CurationSettings};
pub use digest::DigestWriter;
pub use feed::RssFeedClient;
pub use io::{load_digest, save_digest};
pub use memory::{default_memory_path, RunMemory};
pub use models::{
    Classification, Digest, DigestItem, NormalizedCandidate, RawCandidate, ScoredCandidate,
};
pub use pipeline::{curate_daily, curate_news_pool, remember_tools, CurationOutcome};
pub use search::{parse_brave_response, BraveSearchClient, SearchError, SearchProvider};
pub use sources::{ExclusionFilter, SourcePlan, SourcesConfig};
pub use translator::{DeepSeekTranslator, GlossaryTranslator, Translator};
