// src/freshness.rs
//! Recency bucketing and the per-item admission threshold.

use chrono::{DateTime, Duration, Utc};

use crate::ingest::types::NewsItem;

/// Default hard admission threshold.
pub const DEFAULT_MAX_AGE_HOURS: i64 = 6;
/// Urgency-marked titles get a longer allowance.
pub const URGENT_MAX_AGE_HOURS: i64 = 12;
/// Analysis/opinion pieces stay relevant much longer.
pub const ANALYSIS_MAX_AGE_HOURS: i64 = 48;

const URGENCY_MARKERS: &[&str] = &["breaking", "urgent", "live", "just in"];
const ANALYSIS_MARKERS: &[&str] = &["analysis", "opinion", "review"];

/// Coarse recency bucket: <=2h -> 3, <=6h -> 2, <=24h -> 1, else 0.
pub fn bucket(age: Duration) -> u8 {
    let hours = age.num_seconds() as f64 / 3600.0;
    if hours <= 2.0 {
        3
    } else if hours <= 6.0 {
        2
    } else if hours <= 24.0 {
        1
    } else {
        0
    }
}

/// Admission threshold for an item, decided by title markers.
pub fn max_age_hours(title: &str) -> i64 {
    let t = title.to_lowercase();
    if URGENCY_MARKERS.iter().any(|m| t.contains(m)) {
        URGENT_MAX_AGE_HOURS
    } else if ANALYSIS_MARKERS.iter().any(|m| t.contains(m)) {
        ANALYSIS_MAX_AGE_HOURS
    } else {
        DEFAULT_MAX_AGE_HOURS
    }
}

/// Drop stale items and stamp `freshness_score` on the survivors.
///
/// Items without a usable publish time are admitted (fail-open) with
/// bucket 0 rather than dropped.
pub fn filter_fresh(items: Vec<NewsItem>, now: DateTime<Utc>) -> Vec<NewsItem> {
    let mut fresh = Vec::with_capacity(items.len());
    for mut item in items {
        match item.age(now) {
            Some(age) => {
                item.freshness_score = bucket(age);
                let limit = Duration::hours(max_age_hours(&item.title));
                if age <= limit {
                    fresh.push(item);
                }
            }
            None => {
                item.freshness_score = 0;
                fresh.push(item);
            }
        }
    }
    fresh
}
