// src/ingest/providers/gnews.rs
//! GNews headline/search API (`articles` array shape).

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::{parse_feed_date, HTTP_TIMEOUT_SECS, USER_AGENT};
use crate::ingest::normalize_text;
use crate::ingest::types::{NewsItem, SourceProvider};

const TOP_HEADLINES_URL: &str = "https://gnews.io/api/v4/top-headlines";
const SEARCH_URL: &str = "https://gnews.io/api/v4/search";

#[derive(Debug, Deserialize)]
struct ArticlesResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    url: String,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
    source: Option<ArticleSource>,
}

#[derive(Debug, Deserialize)]
struct ArticleSource {
    name: Option<String>,
}

enum Mode {
    Fixture(String),
    Http { client: reqwest::Client },
}

pub struct GnewsProvider {
    api_key: String,
    /// Search query; `None` means the top-headlines endpoint.
    query: Option<String>,
    max_items: usize,
    weight: f32,
    mode: Mode,
}

impl GnewsProvider {
    pub fn top_headlines(api_key: impl Into<String>, max_items: usize, weight: f32) -> Self {
        Self {
            api_key: api_key.into(),
            query: None,
            max_items,
            weight,
            mode: Mode::Http {
                client: reqwest::Client::new(),
            },
        }
    }

    pub fn search(
        api_key: impl Into<String>,
        query: impl Into<String>,
        max_items: usize,
        weight: f32,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            query: Some(query.into()),
            max_items,
            weight,
            mode: Mode::Http {
                client: reqwest::Client::new(),
            },
        }
    }

    pub fn from_fixture(json: &str, max_items: usize, weight: f32) -> Self {
        Self {
            api_key: String::new(),
            query: None,
            max_items,
            weight,
            mode: Mode::Fixture(json.to_string()),
        }
    }

    fn parse_articles(&self, body: &str) -> Result<Vec<NewsItem>> {
        let resp: ArticlesResponse =
            serde_json::from_str(body).context("parsing gnews articles response")?;

        let mut out = Vec::new();
        for article in resp.articles.into_iter().take(self.max_items) {
            let title = normalize_text(&article.title);
            if title.is_empty() {
                continue;
            }
            let source_name = article
                .source
                .and_then(|s| s.name)
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| "GNews".to_string());

            let mut item = NewsItem::new(source_name, self.weight);
            item.title = title;
            item.url = article.url;
            item.body = normalize_text(&article.description);
            item.published_at = article.published_at.as_deref().and_then(parse_feed_date);
            out.push(item);
        }
        Ok(out)
    }
}

#[async_trait]
impl SourceProvider for GnewsProvider {
    async fn fetch_latest(&self) -> Result<Vec<NewsItem>> {
        match &self.mode {
            Mode::Fixture(json) => self.parse_articles(json),
            Mode::Http { client } => {
                let mut params = vec![
                    ("token", self.api_key.clone()),
                    ("lang", "en".to_string()),
                    ("country", "us".to_string()),
                    ("max", self.max_items.to_string()),
                ];
                let endpoint = match &self.query {
                    Some(q) => {
                        params.push(("q", q.clone()));
                        SEARCH_URL
                    }
                    None => TOP_HEADLINES_URL,
                };
                let body = client
                    .get(endpoint)
                    .query(&params)
                    .header(reqwest::header::USER_AGENT, USER_AGENT)
                    .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
                    .send()
                    .await
                    .context("requesting gnews")?
                    .error_for_status()
                    .context("gnews returned error status")?
                    .text()
                    .await
                    .context("reading gnews body")?;
                self.parse_articles(&body)
            }
        }
    }

    fn name(&self) -> &str {
        match &self.query {
            Some(_) => "GNews search",
            None => "GNews top headlines",
        }
    }

    fn weight(&self) -> f32 {
        self.weight
    }
}
