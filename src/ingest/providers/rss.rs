// src/ingest/providers/rss.rs
//! Generic RSS 2.0 / Atom fetcher.
//!
//! Tolerant by design: missing titles, links, descriptions and malformed
//! dates never reject the whole document, only degrade the single item.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use quick_xml::de::from_str;
use serde::Deserialize;
use std::time::Duration;

use super::{parse_feed_date, HTTP_TIMEOUT_SECS, USER_AGENT};
use crate::ingest::normalize_text;
use crate::ingest::types::{NewsItem, SourceProvider};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct RssItem {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    title: Option<String>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
    summary: Option<String>,
    updated: Option<String>,
    published: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: Option<String>,
}

enum Mode {
    Fixture(String),
    Http {
        // Mirror list; tried in order until one responds.
        urls: Vec<String>,
        client: reqwest::Client,
    },
}

/// One configured feed endpoint (or a mirror set for the same logical feed).
pub struct FeedProvider {
    name: String,
    weight: f32,
    mode: Mode,
}

impl FeedProvider {
    pub fn from_url(name: impl Into<String>, url: impl Into<String>, weight: f32) -> Self {
        Self::from_mirrors(name, vec![url.into()], weight)
    }

    pub fn from_mirrors(name: impl Into<String>, urls: Vec<String>, weight: f32) -> Self {
        Self {
            name: name.into(),
            weight,
            mode: Mode::Http {
                urls,
                client: reqwest::Client::new(),
            },
        }
    }

    pub fn from_fixture(name: impl Into<String>, xml: &str, weight: f32) -> Self {
        Self {
            name: name.into(),
            weight,
            mode: Mode::Fixture(xml.to_string()),
        }
    }

    fn parse_document(&self, body: &str) -> Result<Vec<NewsItem>> {
        if let Ok(rss) = from_str::<Rss>(body) {
            return Ok(self.collect_rss(rss));
        }
        let feed: AtomFeed = from_str(body)
            .with_context(|| format!("parsing feed document for {}", self.name))?;
        Ok(self.collect_atom(feed))
    }

    fn collect_rss(&self, rss: Rss) -> Vec<NewsItem> {
        let mut out = Vec::with_capacity(rss.channel.items.len());
        for it in rss.channel.items {
            let title = normalize_text(it.title.as_deref().unwrap_or_default());
            if title.is_empty() {
                continue;
            }
            let mut item = NewsItem::new(&self.name, self.weight);
            item.title = title;
            item.url = it.link.map(|l| l.trim().to_string()).unwrap_or_default();
            item.body = normalize_text(it.description.as_deref().unwrap_or_default());
            item.published_at = it.pub_date.as_deref().and_then(parse_feed_date);
            out.push(item);
        }
        out
    }

    fn collect_atom(&self, feed: AtomFeed) -> Vec<NewsItem> {
        let mut out = Vec::with_capacity(feed.entries.len());
        for e in feed.entries {
            let title = normalize_text(e.title.as_deref().unwrap_or_default());
            if title.is_empty() {
                continue;
            }
            let mut item = NewsItem::new(&self.name, self.weight);
            item.title = title;
            item.url = e
                .links
                .iter()
                .find_map(|l| l.href.clone())
                .unwrap_or_default();
            item.body = normalize_text(e.summary.as_deref().unwrap_or_default());
            item.published_at = e
                .published
                .as_deref()
                .or(e.updated.as_deref())
                .and_then(parse_feed_date);
            out.push(item);
        }
        out
    }

    async fn fetch_http(&self, urls: &[String], client: &reqwest::Client) -> Result<Vec<NewsItem>> {
        let mut last_err = anyhow!("no feed urls configured for {}", self.name);
        for url in urls {
            let resp = client
                .get(url)
                .header(reqwest::header::USER_AGENT, USER_AGENT)
                .header(
                    reqwest::header::ACCEPT,
                    "application/rss+xml, application/xml, text/xml, */*",
                )
                .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
                .send()
                .await;
            match resp {
                Ok(resp) => match resp.error_for_status() {
                    Ok(resp) => {
                        let body = resp.text().await.context("reading feed body")?;
                        match self.parse_document(&body) {
                            Ok(items) => return Ok(items),
                            Err(e) => last_err = e,
                        }
                    }
                    Err(e) => last_err = e.into(),
                },
                Err(e) => last_err = e.into(),
            }
            tracing::debug!(source = %self.name, url = %url, "feed endpoint failed, trying next mirror");
        }
        Err(last_err)
    }
}

#[async_trait]
impl SourceProvider for FeedProvider {
    async fn fetch_latest(&self) -> Result<Vec<NewsItem>> {
        match &self.mode {
            Mode::Fixture(xml) => self.parse_document(xml),
            Mode::Http { urls, client } => self.fetch_http(urls, client).await,
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn weight(&self) -> f32 {
        self.weight
    }
}
