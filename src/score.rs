// src/score.rs
//! Composite quality scoring.
//!
//! `score` is a pure function of the item's fields; the weights below are
//! the tuned literals and are deliberately not configurable.

use crate::ingest::types::NewsItem;

/// Substring -> points lookup over the source name, first match wins.
const SOURCE_POINTS: &[(&str, f32)] = &[
    ("un news", 8.0),
    ("nato news", 8.0),
    ("eu news", 7.0),
    ("bbc world", 7.0),
    ("reuters", 7.0),
    ("south china morning post", 6.0),
    ("foreign policy", 6.0),
    ("wall street journal", 6.0),
    ("financial times", 6.0),
    ("al jazeera", 5.0),
    ("cnn", 5.0),
    ("truth social", 4.0),
    ("youtube", 3.0),
    ("reddit", 2.0),
];

const DEFAULT_SOURCE_POINTS: f32 = 1.0;

const HIGH_PRIORITY_KEYWORDS: &[&str] = &[
    "breaking",
    "urgent",
    "crisis",
    "emergency",
    "alert",
    "war",
    "conflict",
    "attack",
    "bomb",
    "explosion",
    "election",
    "vote",
    "president",
    "congress",
    "senate",
    "market crash",
    "recession",
    "inflation",
    "fed",
    "interest rate",
];

const MEDIUM_PRIORITY_KEYWORDS: &[&str] = &[
    "analysis",
    "report",
    "study",
    "research",
    "data",
    "policy",
    "law",
    "regulation",
    "trade",
    "tariff",
    "technology",
    "ai",
    "artificial intelligence",
    "cyber",
];

fn source_points(source_name: &str) -> f32 {
    let s = source_name.to_lowercase();
    SOURCE_POINTS
        .iter()
        .find(|(pat, _)| s.contains(pat))
        .map(|&(_, pts)| pts)
        .unwrap_or(DEFAULT_SOURCE_POINTS)
}

/// Compute the composite quality score. Never negative.
pub fn score(item: &NewsItem) -> f32 {
    let mut score = source_points(&item.source_name);

    score += f32::from(item.freshness_score) * 2.0;

    let title = item.title.to_lowercase();
    let text = format!("{} {}", title, item.body.to_lowercase());

    // Only the highest matching keyword tier contributes.
    if HIGH_PRIORITY_KEYWORDS.iter().any(|k| text.contains(k)) {
        score += 4.0;
    } else if MEDIUM_PRIORITY_KEYWORDS.iter().any(|k| text.contains(k)) {
        score += 2.0;
    }

    let body_len = item.body.chars().count();
    if body_len > 200 {
        score += 2.0;
    } else if body_len > 100 {
        score += 1.0;
    }

    let title_len = title.chars().count();
    if (20..=100).contains(&title_len) {
        score += 1.0;
    }

    if item.engagement.upvotes > 100 {
        score += 2.0;
    } else if item.engagement.upvotes > 50 {
        score += 1.0;
    }
    if item.engagement.comments > 50 {
        score += 1.0;
    }

    if text.contains("repost") || title.contains("re:") {
        score -= 2.0;
    }

    score.max(0.0)
}

/// Assign `quality_score` to every item in place.
pub fn apply(items: &mut [NewsItem]) {
    for item in items.iter_mut() {
        item.quality_score = score(item);
    }
}
