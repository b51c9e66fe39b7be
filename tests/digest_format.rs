// tests/digest_format.rs
use chrono::{Duration, Utc};
use news_digest_bot::digest::{render, TRANSPORT_MAX_CHARS};
use news_digest_bot::{Category, NewsItem};

fn item(n: usize, category: Category) -> NewsItem {
    let mut it = NewsItem::new("BBC World", 0.85);
    it.title = format!("Headline number {n} with some extra words attached");
    it.url = format!("https://example.com/story/{n}");
    it.body = "c".repeat(180);
    it.category = category;
    it.quality_score = 5.0;
    it.freshness_score = 3;
    it.published_at = Some(Utc::now() - Duration::hours(1));
    it
}

#[test]
fn output_never_exceeds_the_transport_limit() {
    for count in [1usize, 5, 20, 60, 200] {
        let items: Vec<NewsItem> = (0..count).map(|n| item(n, Category::General)).collect();
        let out = render(&items, "2025-08-29 09:00");
        assert!(
            out.chars().count() <= TRANSPORT_MAX_CHARS,
            "{count} items rendered {} chars",
            out.chars().count()
        );
    }
}

#[test]
fn oversized_output_ends_with_ellipsis() {
    let items: Vec<NewsItem> = (0..100).map(|n| item(n, Category::General)).collect();
    let out = render(&items, "2025-08-29 09:00");
    assert!(out.ends_with("..."));
}

#[test]
fn items_are_grouped_in_category_order() {
    let general = item(1, Category::General);
    let us_china = item(2, Category::UsChina);
    let markets = item(3, Category::Markets);
    let out = render(&[general.clone(), us_china.clone(), markets.clone()], "ts");

    let pos_us_china = out.find("US-China").unwrap();
    let pos_markets = out.find("Markets").unwrap();
    let pos_general = out.find("General").unwrap();
    assert!(pos_us_china < pos_markets && pos_markets < pos_general);
    assert!(out.find(&us_china.url).unwrap() < out.find(&general.url).unwrap());
}

#[test]
fn titles_render_as_links_when_a_url_exists() {
    let linked = item(1, Category::General);
    let mut bare = item(2, Category::General);
    bare.url.clear();
    let out = render(&[linked.clone(), bare.clone()], "ts");
    assert!(out.contains(&format!("]({})", linked.url)));
    assert!(out.contains(&bare.title));
    assert!(!out.contains("]()"));
}

#[test]
fn engagement_and_freshness_annotations_appear() {
    let mut it = item(1, Category::Social);
    it.engagement.upvotes = 120;
    it.engagement.comments = 60;
    let out = render(&[it], "ts");
    assert!(out.contains("👍 120"));
    assert!(out.contains("💬 60"));
    assert!(out.contains("🕐 fresh"));
}

#[test]
fn footer_carries_the_timestamp() {
    let out = render(&[item(1, Category::General)], "2025-08-29 09:00");
    assert!(out.contains("2025-08-29 09:00"));
}

#[test]
fn source_names_are_escaped_in_the_meta_line() {
    let mut it = item(1, Category::General);
    it.source_name = "Daily*Star_Wire".to_string();
    let out = render(&[it], "ts");
    assert!(out.contains(r"via Daily\*Star\_Wire"));
}

#[test]
fn parentheses_in_urls_do_not_break_the_link() {
    let mut it = item(1, Category::General);
    it.url = "https://example.com/story_(2025)".to_string();
    let out = render(&[it], "ts");
    assert!(out.contains("(https://example.com/story_%282025%29)"));
}

#[test]
fn markdown_in_titles_is_escaped() {
    let mut it = item(1, Category::General);
    it.title = "A headline_with [brackets] and *stars*".to_string();
    let out = render(&[it], "ts");
    assert!(out.contains(r"\[brackets\]"));
    assert!(out.contains(r"\*stars\*"));
}
