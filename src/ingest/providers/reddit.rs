// src/ingest/providers/reddit.rs
//! Reddit public listing endpoint (`/r/{sub}/{sort}.json`), no OAuth.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde::Deserialize;
use std::time::Duration;

use super::{HTTP_TIMEOUT_SECS, USER_AGENT};
use crate::ingest::normalize_text;
use crate::ingest::types::{NewsItem, SourceProvider};

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: Post,
}

#[derive(Debug, Deserialize)]
struct Post {
    #[serde(default)]
    title: String,
    #[serde(default)]
    permalink: String,
    #[serde(default)]
    selftext: String,
    #[serde(default)]
    created_utc: f64,
    #[serde(default)]
    ups: i64,
    #[serde(default)]
    num_comments: i64,
}

enum Mode {
    Fixture(String),
    Http { client: reqwest::Client },
}

pub struct RedditProvider {
    name: String,
    subreddit: String,
    sort: String,
    limit: usize,
    weight: f32,
    mode: Mode,
}

impl RedditProvider {
    pub fn new(subreddit: impl Into<String>, limit: usize, weight: f32) -> Self {
        let subreddit = subreddit.into();
        Self {
            name: format!("reddit/r/{subreddit}"),
            subreddit,
            sort: "top".to_string(),
            limit,
            weight,
            mode: Mode::Http {
                client: reqwest::Client::new(),
            },
        }
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = sort.into();
        self
    }

    pub fn from_fixture(subreddit: impl Into<String>, json: &str, weight: f32) -> Self {
        let subreddit = subreddit.into();
        Self {
            name: format!("reddit/r/{subreddit}"),
            subreddit,
            sort: "top".to_string(),
            limit: 25,
            weight,
            mode: Mode::Fixture(json.to_string()),
        }
    }

    fn parse_listing(&self, body: &str) -> Result<Vec<NewsItem>> {
        let listing: Listing = serde_json::from_str(body)
            .with_context(|| format!("parsing reddit listing for r/{}", self.subreddit))?;

        let mut out = Vec::new();
        for child in listing.data.children.into_iter().take(self.limit) {
            let post = child.data;
            let title = normalize_text(&post.title);
            if title.is_empty() {
                continue;
            }
            let mut item = NewsItem::new(&self.name, self.weight);
            item.title = title;
            item.url = if post.permalink.is_empty() {
                String::new()
            } else {
                format!("https://reddit.com{}", post.permalink)
            };
            item.body = normalize_text(&post.selftext);
            item.published_at = (post.created_utc > 0.0)
                .then(|| Utc.timestamp_opt(post.created_utc as i64, 0).single())
                .flatten();
            item.engagement.upvotes = post.ups.max(0) as u32;
            item.engagement.comments = post.num_comments.max(0) as u32;
            out.push(item);
        }
        Ok(out)
    }
}

#[async_trait]
impl SourceProvider for RedditProvider {
    async fn fetch_latest(&self) -> Result<Vec<NewsItem>> {
        match &self.mode {
            Mode::Fixture(json) => self.parse_listing(json),
            Mode::Http { client } => {
                let url = format!(
                    "https://www.reddit.com/r/{}/{}.json",
                    self.subreddit, self.sort
                );
                let body = client
                    .get(&url)
                    .query(&[("limit", self.limit.to_string()), ("t", "day".to_string())])
                    .header(reqwest::header::USER_AGENT, USER_AGENT)
                    .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
                    .send()
                    .await
                    .with_context(|| format!("requesting r/{}", self.subreddit))?
                    .error_for_status()
                    .with_context(|| format!("r/{} returned error status", self.subreddit))?
                    .text()
                    .await
                    .context("reading reddit body")?;
                self.parse_listing(&body)
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn weight(&self) -> f32 {
        self.weight
    }
}
