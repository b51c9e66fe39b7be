// src/ingest/mod.rs
pub mod providers;
pub mod types;

use std::time::Duration;

use rand::Rng;

use crate::ingest::types::{NewsItem, SourceProvider};
use crate::store::Store;

/// Courtesy pause between per-source fetches, jittered per call.
#[derive(Debug, Clone, Copy)]
pub struct FetchPacing {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for FetchPacing {
    fn default() -> Self {
        Self {
            min_delay_ms: 500,
            max_delay_ms: 1_500,
        }
    }
}

impl FetchPacing {
    /// No sleeping at all; used by tests.
    pub fn none() -> Self {
        Self {
            min_delay_ms: 0,
            max_delay_ms: 0,
        }
    }

    fn jittered(&self) -> Duration {
        if self.max_delay_ms == 0 {
            return Duration::ZERO;
        }
        let ms = rand::rng().random_range(self.min_delay_ms..=self.max_delay_ms);
        Duration::from_millis(ms)
    }
}

/// Normalize feed text: decode HTML entities, strip tags, collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, " ").to_string();

    // Curly quotes and guillemets to ASCII quotes.
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    let mut collapsed = String::with_capacity(out.len());
    let mut last_was_space = true;
    for ch in out.chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                collapsed.push(' ');
                last_was_space = true;
            }
        } else {
            collapsed.push(ch);
            last_was_space = false;
        }
    }
    out = collapsed.trim_end().to_string();

    // Excerpts never need more than this.
    if out.chars().count() > 1_500 {
        out = out.chars().take(1_500).collect();
    }
    out
}

/// Fetch from every healthy provider in sequence.
///
/// A failing source is recorded against the health table and skipped; it
/// never aborts the run. Unhealthy sources (3+ consecutive failures on
/// record) are not contacted at all.
pub async fn fetch_all(
    providers: &[Box<dyn SourceProvider>],
    store: &Store,
    pacing: FetchPacing,
) -> Vec<NewsItem> {
    let mut all = Vec::new();
    for (i, provider) in providers.iter().enumerate() {
        let name = provider.name();
        match store.is_healthy(name) {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!(source = name, "skipping unhealthy source");
                continue;
            }
            Err(e) => {
                tracing::warn!(error = ?e, source = name, "health lookup failed, proceeding");
            }
        }

        match provider.fetch_latest().await {
            Ok(mut items) => {
                tracing::info!(source = name, count = items.len(), "fetched");
                if let Err(e) = store.record_success(name, provider.weight()) {
                    tracing::warn!(error = ?e, source = name, "recording success failed");
                }
                all.append(&mut items);
            }
            Err(e) => {
                tracing::warn!(error = ?e, source = name, "source fetch failed");
                if let Err(e) = store.record_failure(name) {
                    tracing::warn!(error = ?e, source = name, "recording failure failed");
                }
            }
        }

        if i + 1 < providers.len() {
            let pause = pacing.jittered();
            if !pause.is_zero() {
                tokio::time::sleep(pause).await;
            }
        }
    }
    all
}
