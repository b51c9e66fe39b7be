// src/sources.rs
//! Source registry: the configured list of feed endpoints, social accounts,
//! and mirror bases. Loaded once at startup, read-only afterwards.
//!
//! Accepts TOML or JSON. Resolution order mirrors the rest of the config
//! surface: explicit env path, then `config/sources.toml`, then
//! `config/sources.json`, then the built-in seed.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_SOURCES_PATH: &str = "NEWS_SOURCES_PATH";

fn default_weight() -> f32 {
    0.6
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedSource {
    pub name: String,
    pub url: String,
    #[serde(default = "default_weight")]
    pub weight: f32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SocialSection {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub accounts: Vec<String>,
    #[serde(default = "default_weight")]
    pub weight: f32,
}

fn default_posts_per_subreddit() -> usize {
    5
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedditSection {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub subreddits: Vec<String>,
    #[serde(default = "default_posts_per_subreddit")]
    pub posts_per_subreddit: usize,
    #[serde(default = "default_weight")]
    pub weight: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceRegistry {
    #[serde(default)]
    pub primary: Vec<FeedSource>,
    #[serde(default)]
    pub secondary: Vec<FeedSource>,
    #[serde(default)]
    pub social: SocialSection,
    #[serde(default)]
    pub reddit: RedditSection,
    /// Fallback base URLs for the social mirror host, tried in order.
    #[serde(default)]
    pub mirrors: Vec<String>,
}

impl SourceRegistry {
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading source registry from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "json" => serde_json::from_str(&content)
                .with_context(|| format!("parsing {} as JSON", path.display())),
            _ => toml::from_str(&content)
                .with_context(|| format!("parsing {} as TOML", path.display())),
        }
    }

    /// Env path override, then config/ files, then the built-in seed.
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_SOURCES_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_SOURCES_PATH} points to a non-existent path"));
            }
            return Self::load_from(&pb);
        }
        for candidate in ["config/sources.toml", "config/sources.json"] {
            let pb = PathBuf::from(candidate);
            if pb.exists() {
                return Self::load_from(&pb);
            }
        }
        Ok(Self::default_seed())
    }

    /// All feed sources, primary first.
    pub fn feeds(&self) -> impl Iterator<Item = &FeedSource> {
        self.primary.iter().chain(self.secondary.iter())
    }

    /// Mirror URL set for one social account's RSS feed.
    pub fn social_feed_urls(&self, handle: &str) -> Vec<String> {
        self.mirrors
            .iter()
            .map(|base| format!("{}/{}/rss", base.trim_end_matches('/'), handle))
            .collect()
    }

    /// Built-in registry used when no config file is present.
    pub fn default_seed() -> Self {
        let feed = |name: &str, url: &str, weight: f32| FeedSource {
            name: name.to_string(),
            url: url.to_string(),
            weight,
        };
        Self {
            primary: vec![
                feed(
                    "UN News",
                    "https://news.un.org/feed/subscribe/en/news/all/rss.xml",
                    0.9,
                ),
                feed(
                    "BBC World",
                    "http://feeds.bbci.co.uk/news/world/rss.xml",
                    0.85,
                ),
                feed(
                    "Reuters China",
                    "https://feeds.reuters.com/reuters/ChinaNews",
                    0.85,
                ),
                feed(
                    "NYT Top Stories",
                    "https://rss.nytimes.com/services/xml/rss/nyt/HomePage.xml",
                    0.8,
                ),
                feed(
                    "South China Morning Post",
                    "https://www.scmp.com/rss/91/feed",
                    0.75,
                ),
            ],
            secondary: vec![
                feed(
                    "Bloomberg",
                    "https://feeds.bloomberg.com/markets/news.rss",
                    0.8,
                ),
                feed("Foreign Policy", "https://foreignpolicy.com/feed/", 0.7),
                feed("NPR News", "http://www.npr.org/rss/rss.php?id=1001", 0.7),
                feed(
                    "Al Jazeera",
                    "https://www.aljazeera.com/xml/rss/all.xml",
                    0.65,
                ),
                feed(
                    "CNN International",
                    "http://rss.cnn.com/rss/edition.rss",
                    0.65,
                ),
            ],
            social: SocialSection {
                enabled: false,
                accounts: vec!["realDonaldTrump".to_string()],
                weight: 0.5,
            },
            reddit: RedditSection {
                enabled: true,
                subreddits: [
                    "stocks",
                    "wallstreetbets",
                    "investing",
                    "cryptocurrency",
                    "bitcoin",
                    "China",
                    "Sino",
                    "China_News",
                    "geopolitics",
                    "worldnews",
                    "politics",
                    "news",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect(),
                posts_per_subreddit: 5,
                weight: 0.5,
            },
            mirrors: vec![
                "https://nitter.net".to_string(),
                "https://nitter.poast.org".to_string(),
            ],
        }
    }
}
