// src/config.rs
//! Environment-driven runtime configuration.

use anyhow::{anyhow, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
    /// Alternate Bot API host (self-hosted bot-api server, or a test double).
    pub telegram_api_base: Option<String>,
    pub gnews_api_key: Option<String>,
    /// Preview the digest on stdout instead of delivering it.
    pub dry_run: bool,
    /// Optional keyword filter applied to social-mirror items only.
    pub filter_keywords: Vec<String>,
    pub db_path: PathBuf,
}

fn non_empty(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    /// Read configuration from the environment. Missing credentials are a
    /// hard error unless DRY_RUN=1 (fail fast, before any network activity).
    pub fn from_env() -> Result<Self> {
        let dry_run = std::env::var("DRY_RUN").map(|v| v == "1").unwrap_or(false);

        let bot_token = non_empty("TELEGRAM_BOT_TOKEN");
        let chat_id = non_empty("CHAT_ID");

        if !dry_run {
            if bot_token.is_none() {
                return Err(anyhow!("TELEGRAM_BOT_TOKEN is not set"));
            }
            if chat_id.is_none() {
                return Err(anyhow!("CHAT_ID is not set"));
            }
        }

        let filter_keywords = non_empty("FILTER_KEYWORDS")
            .map(|csv| {
                csv.split(',')
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            bot_token,
            chat_id,
            telegram_api_base: non_empty("TELEGRAM_API_BASE"),
            gnews_api_key: non_empty("GNEWS_API_KEY"),
            dry_run,
            filter_keywords,
            db_path: non_empty("NEWS_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("news_cache.db")),
        })
    }
}
