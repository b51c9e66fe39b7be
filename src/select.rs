// src/select.rs
//! Batch-level quality filtering, ranking, and the delivery budget.

use std::collections::HashSet;

use crate::ingest::types::NewsItem;

/// Items scoring below this never ship.
pub const MIN_QUALITY: f32 = 3.0;
/// Short-body items ship only when their score clears this bar.
pub const SHORT_BODY_OVERRIDE: f32 = 8.0;
const MIN_BODY_CHARS: usize = 20;
const MIN_TITLE_CHARS: usize = 10;

const SPAM_PHRASES: &[&str] = &["click here", "free money", "guaranteed", "make money fast"];

/// Base number of items per digest; adjusted by time of day.
pub const BASE_BUDGET: usize = 15;

/// Delivery budget for the given hour (0-23, local to the schedule).
/// Mornings get a larger digest, evenings the baseline.
pub fn delivery_budget(hour: u32) -> usize {
    match hour {
        6..=12 => BASE_BUDGET + 5,
        18..=22 => BASE_BUDGET,
        _ => BASE_BUDGET + 2,
    }
}

/// Filter, rank, and truncate one scored batch.
///
/// Items are ranked by `(quality_score, published_at)` descending before
/// the in-batch dedup passes, so when two items share a URL or title the
/// higher-scored one survives regardless of arrival order. Then: quality
/// floor, title dedup, URL dedup, short-body and short-title drops, spam
/// phrases, and finally the cut to `budget`.
pub fn select(mut items: Vec<NewsItem>, budget: usize) -> Vec<NewsItem> {
    items.sort_by(|a, b| {
        b.quality_score
            .total_cmp(&a.quality_score)
            .then_with(|| b.published_at.cmp(&a.published_at))
    });

    let mut seen_titles: HashSet<String> = HashSet::new();
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut kept = Vec::with_capacity(items.len());

    for item in items {
        if item.quality_score < MIN_QUALITY {
            continue;
        }

        let title_key = item.title.trim().to_lowercase();
        if title_key.is_empty() || seen_titles.contains(&title_key) {
            continue;
        }
        if seen_urls.contains(&item.url) {
            continue;
        }

        if item.body.chars().count() < MIN_BODY_CHARS && item.quality_score < SHORT_BODY_OVERRIDE {
            continue;
        }
        if title_key.chars().count() < MIN_TITLE_CHARS {
            continue;
        }
        if SPAM_PHRASES.iter().any(|p| title_key.contains(p)) {
            continue;
        }

        seen_titles.insert(title_key);
        seen_urls.insert(item.url.clone());
        kept.push(item);
    }

    kept.truncate(budget);
    kept
}
