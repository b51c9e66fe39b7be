// tests/selector.rs
use chrono::{Duration, Utc};
use news_digest_bot::select::{delivery_budget, select, BASE_BUDGET};
use news_digest_bot::NewsItem;

fn item(title: &str, url: &str, score: f32) -> NewsItem {
    let mut it = NewsItem::new("BBC World", 0.85);
    it.title = title.to_string();
    it.url = url.to_string();
    it.body = "a body comfortably over twenty characters".to_string();
    it.quality_score = score;
    it.published_at = Some(Utc::now() - Duration::hours(1));
    it
}

#[test]
fn low_quality_is_dropped_regardless_of_other_fields() {
    let mut rich = item("Low quality but otherwise lovely", "https://e.com/1", 2.0);
    rich.engagement.upvotes = 10_000;
    rich.body = "x".repeat(500);
    assert!(select(vec![rich], 10).is_empty());
}

#[test]
fn quality_three_with_modest_body_is_retained() {
    let mut it = item("Just clears the quality bar", "https://e.com/2", 3.0);
    it.body = "b".repeat(25);
    let out = select(vec![it], 10);
    assert_eq!(out.len(), 1);
}

#[test]
fn titles_dedup_case_insensitively() {
    let a = item("Same Headline Today", "https://e.com/a", 5.0);
    let b = item("  same headline today ", "https://e.com/b", 4.0);
    let out = select(vec![a, b], 10);
    assert_eq!(out.len(), 1);
    // Higher score wins the collision.
    assert_eq!(out[0].url, "https://e.com/a");
}

#[test]
fn urls_dedup_keeping_the_higher_score() {
    let winner = item("First angle on the story", "https://e.com/shared", 9.0);
    let loser = item("Second angle on the story", "https://e.com/shared", 5.0);
    // Input order deliberately reversed; ranking happens before dedup.
    let out = select(vec![loser, winner], 10);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].title, "First angle on the story");
}

#[test]
fn short_body_needs_a_high_score() {
    let mut weak = item("Short body, ordinary score", "https://e.com/3", 5.0);
    weak.body = "too short".to_string();
    let mut strong = item("Short body, strong score", "https://e.com/4", 8.0);
    strong.body = "too short".to_string();
    let out = select(vec![weak, strong], 10);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].title, "Short body, strong score");
}

#[test]
fn tiny_titles_and_spam_phrases_are_dropped() {
    let tiny = item("so brief", "https://e.com/5", 6.0);
    let spam = item("Click here for free money today", "https://e.com/6", 6.0);
    let ok = item("A perfectly ordinary headline", "https://e.com/7", 6.0);
    let out = select(vec![tiny, spam, ok], 10);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].url, "https://e.com/7");
}

#[test]
fn sorted_by_score_then_recency_and_truncated() {
    let now = Utc::now();
    let mut older = item("Equal score but older item", "https://e.com/8", 7.0);
    older.published_at = Some(now - Duration::hours(5));
    let mut newer = item("Equal score but newer item", "https://e.com/9", 7.0);
    newer.published_at = Some(now - Duration::hours(1));
    let top = item("Highest scoring item of all", "https://e.com/10", 9.0);

    let out = select(vec![older.clone(), newer.clone(), top.clone()], 2);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].url, "https://e.com/10");
    assert_eq!(out[1].url, "https://e.com/9");
}

#[test]
fn budget_policy_by_hour() {
    assert_eq!(delivery_budget(6), BASE_BUDGET + 5);
    assert_eq!(delivery_budget(12), BASE_BUDGET + 5);
    assert_eq!(delivery_budget(18), BASE_BUDGET);
    assert_eq!(delivery_budget(22), BASE_BUDGET);
    assert_eq!(delivery_budget(0), BASE_BUDGET + 2);
    assert_eq!(delivery_budget(14), BASE_BUDGET + 2);
}
