// src/ingest/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::classify::Category;

/// Engagement counters for social-origin items. Zero for plain feeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Engagement {
    pub upvotes: u32,
    pub comments: u32,
}

/// One normalized news/social record flowing through the pipeline.
///
/// Fetchers emit items with both score fields zero; the freshness filter
/// assigns `freshness_score` exactly once and the scorer assigns
/// `quality_score` exactly once. Nothing downstream mutates them.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct NewsItem {
    pub title: String,
    /// Canonical link; dedup key. May be empty for non-linkable items.
    pub url: String,
    pub body: String,
    pub source_name: String,
    /// Registry trust weight in (0, 1].
    pub source_weight: f32,
    pub published_at: Option<DateTime<Utc>>,
    pub category: Category,
    pub engagement: Engagement,
    pub quality_score: f32,
    /// Coarse recency bucket 0-3.
    pub freshness_score: u8,
}

impl NewsItem {
    pub fn new(source_name: impl Into<String>, source_weight: f32) -> Self {
        Self {
            title: String::new(),
            url: String::new(),
            body: String::new(),
            source_name: source_name.into(),
            source_weight,
            published_at: None,
            category: Category::General,
            engagement: Engagement::default(),
            quality_score: 0.0,
            freshness_score: 0,
        }
    }

    /// Age relative to `now`; `None` when the publish time is unknown.
    pub fn age(&self, now: DateTime<Utc>) -> Option<chrono::Duration> {
        self.published_at.map(|ts| now - ts)
    }
}

#[async_trait::async_trait]
pub trait SourceProvider: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<NewsItem>>;
    fn name(&self) -> &str;
    /// Registry trust weight, recorded into the health table on success.
    fn weight(&self) -> f32 {
        0.6
    }
}
