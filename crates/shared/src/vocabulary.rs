//! Closed vocabularies and domain tables used by the classifier and scorer.
//!
//! Everything here is fixed at compile time and compiled once on first use.
//! Changing what counts as reputable, newsworthy, or a tool means editing
//! these tables.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Entities decoded by the normalizer; anything else passes through
pub const HTML_ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&#x27;", "'"),
    ("&ldquo;", "\""),
    ("&rdquo;", "\""),
    ("&lsquo;", "'"),
    ("&rsquo;", "'"),
    ("&hellip;", "..."),
    ("&mdash;", "-"),
    ("&ndash;", "-"),
];

/// Promotional markers; text from the first match onward is dropped
pub static BOILERPLATE_MARKERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)subscribe|register|login").expect("boilerplate regex"));

pub const WIRE_DOMAINS: &[&str] = &["reuters.com", "apnews.com", "bloomberg.com", "afp.com"];

pub const TECH_PRESS_DOMAINS: &[&str] = &[
    "techcrunch.com",
    "theverge.com",
    "wired.com",
    "arstechnica.com",
    "technologyreview.com",
    "venturebeat.com",
    "theinformation.com",
    "zdnet.com",
    "engadget.com",
    "cnbc.com",
    "ft.com",
    "wsj.com",
    "nytimes.com",
    "bbc.com",
    "bbc.co.uk",
    "theguardian.com",
    "axios.com",
    "semafor.com",
    "artificialintelligence-news.com",
    "news.mit.edu",
];

/// Labs, vendors and the developer ecosystem
pub const VENDOR_DOMAINS: &[&str] = &[
    "openai.com",
    "anthropic.com",
    "deepmind.google",
    "blog.google",
    "ai.google.dev",
    "ai.meta.com",
    "about.fb.com",
    "blogs.microsoft.com",
    "nvidianews.nvidia.com",
    "blogs.nvidia.com",
    "mistral.ai",
    "x.ai",
    "aws.amazon.com",
    "huggingface.co",
    "github.com",
    "pypi.org",
    "npmjs.com",
    "crates.io",
];

/// Never reputable, even if listed above
pub const DENIED_DOMAIN: &str = "msn.com";

pub static REPUTABLE_DOMAINS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    WIRE_DOMAINS
        .iter()
        .chain(TECH_PRESS_DOMAINS)
        .chain(VENDOR_DOMAINS)
        .copied()
        .collect()
});

/// Bare section paths that list articles rather than being one
pub const SECTION_PATHS: &[&str] = &[
    "/technology",
    "/technology/artificial-intelligence",
    "/tech",
    "/ai",
    "/artificial-intelligence",
    "/news",
    "/business",
    "/business/technology",
    "/innovation",
    "/science",
    "/latest",
    "/category/ai",
    "/category/artificial-intelligence",
    "/tag/ai",
    "/topics/artificial-intelligence",
    "/hub/artificial-intelligence",
];

/// "Latest AI news", "AI News Today", "Tech news" and friends
pub static GENERIC_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(latest|today'?s?|breaking|top)?\s*(ai|artificial intelligence|tech|technology)?\s*news\s*(today|updates?|headlines)?\s*$|\b(latest|today'?s)\b.*\bnews\b|\bnews\b.*\b(today|this week)\s*$",
    )
    .expect("generic title regex")
});

pub const ENCYCLOPEDIA_MARKERS: &[&str] = &["wikipedia", "wikiwand", "britannica", "encyclopedia"];

pub static NON_ARTICLE_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*home\b|\bhome ?page\b|\bnewsletters?\b|\bsubscribe\b|\bregister\b|\blog ?in\b|\bsign ?in\b|\bpricing\b|\bjobs\b|\bcareers\b",
    )
    .expect("non-article regex")
});

pub static EVENT_SIGNAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(launch(es|ed|ing)?|releas(e|es|ed|ing)|announc(e|es|ed|ement|ing)|unveil(s|ed|ing)?|introduc(es|ed|ing)|debut(s|ed)?|rolls? out|funding|raises?|raised|valuation|acquisitions?|acquires?|acquired|merger|regulations?|regulators?|lawsuit|sues|sued|ban(s|ned)?|partnership|open[- ]sources?d?|openai|anthropic|deepmind|google|meta|microsoft|nvidia|mistral|xai|deepseek|gpt[-\w.]*|claude|gemini|llama|grok|qwen|copilot)\b",
    )
    .expect("event signal regex")
});

/// Roundups, listicles, affiliate marketing
pub static LISTICLE_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\btop \d+\b|\b\d+ (best|top|free|must[- ]have)\b|\bbest\b|\broundup\b|\balternatives?\b|\bvs\.?\s|\bcompared\b|\bcomparison\b|\baffiliate\b|\bcoupons?\b|\bdiscounts?\b|\bpromo codes?\b|\bsponsored\b|\bdeals?\b",
    )
    .expect("listicle regex")
});

/// Path segments that mark a forum thread or discussion
pub const FORUM_SEGMENTS: &[&str] = &[
    "r",
    "forum",
    "forums",
    "discussion",
    "discussions",
    "discuss",
    "thread",
    "threads",
    "t",
    "questions",
    "comments",
    "community",
];

pub const FORUM_HOSTS: &[&str] = &[
    "reddit.com",
    "news.ycombinator.com",
    "quora.com",
    "stackoverflow.com",
];

/// Path segments that mark a listing rather than one artifact
pub const LISTING_SEGMENTS: &[&str] = &[
    "category",
    "categories",
    "tag",
    "tags",
    "topics",
    "review",
    "reviews",
    "alternatives",
    "compare",
    "collections",
    "lists",
];

pub static TOOLING_VOCABULARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(ai|llms?|gpt[-\w.]*|agents?|agentic|copilot|models?|inference|embeddings?|rag|prompts?|mcp|sdk|api|cli|framework|library|open[- ]source|developers?|coding|code|ide|plugin|extension|vs ?code|neural|transformers?|diffusion|fine[- ]?tun(e|ed|ing)|machine learning|deep learning)\b",
    )
    .expect("tooling vocabulary regex")
});

pub const CODE_HOST: &str = "github.com";

/// First path segments on the code host that are not repositories
pub const CODE_HOST_RESERVED: &[&str] = &[
    "topics",
    "trending",
    "marketplace",
    "collections",
    "orgs",
    "sponsors",
    "features",
    "enterprise",
    "pricing",
    "search",
    "settings",
    "login",
    "about",
    "explore",
    "events",
];

/// Repository sub-paths that are conversations, not the artifact
pub const CODE_HOST_THREAD_SEGMENTS: &[&str] =
    &["issues", "pull", "pulls", "discussions", "compare", "commit", "commits"];

/// Registry host and the package-URL prefix segment it uses
pub const PACKAGE_REGISTRIES: &[(&str, &str)] =
    &[("pypi.org", "project"), ("npmjs.com", "package"), ("crates.io", "crates")];

pub const MODEL_HOST: &str = "huggingface.co";
pub const MODEL_HOST_NAMESPACES: &[&str] = &["spaces", "models"];

/// Display names for well-known hosts
pub const SOURCE_LABELS: &[(&str, &str)] = &[
    ("reuters.com", "Reuters"),
    ("apnews.com", "AP News"),
    ("bbc.com", "BBC"),
    ("bbc.co.uk", "BBC"),
    ("techcrunch.com", "TechCrunch"),
    ("mit.edu", "MIT"),
    ("technologyreview.com", "MIT Technology Review"),
    ("theverge.com", "The Verge"),
    ("wired.com", "Wired"),
    ("arstechnica.com", "Ars Technica"),
    ("artificialintelligence-news.com", "AI News"),
    ("github.com", "GitHub"),
    ("huggingface.co", "Hugging Face"),
    ("pypi.org", "PyPI"),
    ("npmjs.com", "npm"),
];

/// Term table for the offline translator, applied as whole words
pub const GLOSSARY: &[(&str, &str)] = &[
    ("Artificial Intelligence", "人工智能"),
    ("Machine Learning", "机器学习"),
    ("Deep Learning", "深度学习"),
    ("AI", "人工智能"),
    ("LLM", "大语言模型"),
    ("Google", "谷歌"),
    ("Microsoft", "微软"),
    ("Amazon", "亚马逊"),
    ("Apple", "苹果"),
    ("NVIDIA", "英伟达"),
    ("Tech", "科技"),
    ("News", "新闻"),
    ("Latest", "最新"),
    ("Update", "更新"),
    ("Research", "研究"),
    ("Development", "开发"),
    ("Innovation", "创新"),
    ("Report", "报告"),
    ("Analysis", "分析"),
    ("China", "中国"),
    ("US", "美国"),
    ("UK", "英国"),
    ("EU", "欧盟"),
    ("India", "印度"),
    ("Reuters", "路透社"),
    ("MIT", "麻省理工"),
];
