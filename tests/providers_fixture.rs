// tests/providers_fixture.rs
use news_digest_bot::ingest::providers::gnews::GnewsProvider;
use news_digest_bot::ingest::providers::reddit::RedditProvider;
use news_digest_bot::ingest::providers::rss::FeedProvider;
use news_digest_bot::SourceProvider;

const RSS_FIXTURE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Example Feed</title>
    <item>
      <title>First &amp; finest story</title>
      <link>https://example.com/first</link>
      <description>&lt;p&gt;Lead paragraph with &lt;b&gt;markup&lt;/b&gt;&lt;/p&gt;</description>
      <pubDate>Tue, 12 Aug 2025 09:00:00 GMT</pubDate>
    </item>
    <item>
      <title>Dateless and linkless</title>
    </item>
    <item>
      <title></title>
      <link>https://example.com/ignored</link>
    </item>
    <item>
      <title>Bad date survives</title>
      <link>https://example.com/bad-date</link>
      <pubDate>sometime last week</pubDate>
    </item>
  </channel>
</rss>"#;

const ATOM_FIXTURE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Channel uploads</title>
  <entry>
    <title>New video posted</title>
    <link rel="alternate" href="https://video.example/watch?v=abc"/>
    <updated>2025-08-12T10:30:00Z</updated>
  </entry>
  <entry>
    <title>Older clip</title>
    <link href="https://video.example/watch?v=def"/>
    <summary>Short description here</summary>
    <published>2025-08-11T08:00:00Z</published>
  </entry>
</feed>"#;

const REDDIT_FIXTURE: &str = r#"{
  "data": {
    "children": [
      {
        "data": {
          "title": "Market thread for today",
          "permalink": "/r/stocks/comments/abc/market_thread/",
          "selftext": "Discuss earnings and rates here.",
          "created_utc": 1754989200.0,
          "ups": 240,
          "num_comments": 85
        }
      },
      {
        "data": {
          "title": "Post with defaults"
        }
      }
    ]
  }
}"#;

const GNEWS_FIXTURE: &str = r#"{
  "totalArticles": 2,
  "articles": [
    {
      "title": "Summit talks resume",
      "description": "Delegations met for a second day.",
      "url": "https://news.example/summit",
      "publishedAt": "2025-08-12T07:45:00Z",
      "source": {"name": "Example Wire", "url": "https://news.example"}
    },
    {
      "title": "No source on this one",
      "description": "",
      "url": "https://news.example/anon",
      "publishedAt": "not-a-date"
    }
  ]
}"#;

#[tokio::test]
async fn rss_fixture_parses_tolerantly() {
    let provider = FeedProvider::from_fixture("Example Feed", RSS_FIXTURE, 0.8);
    let items = provider.fetch_latest().await.unwrap();

    // The empty-title item is skipped; everything else survives.
    assert_eq!(items.len(), 3);

    let first = &items[0];
    assert_eq!(first.title, "First & finest story");
    assert_eq!(first.url, "https://example.com/first");
    assert_eq!(first.body, "Lead paragraph with markup");
    assert_eq!(first.published_at.unwrap().timestamp(), 1_754_989_200);
    assert_eq!(first.source_name, "Example Feed");

    let second = &items[1];
    assert!(second.url.is_empty());
    assert!(second.published_at.is_none());

    let bad_date = &items[2];
    assert!(bad_date.published_at.is_none());
}

#[tokio::test]
async fn atom_fixture_parses_links_and_dates() {
    let provider = FeedProvider::from_fixture("Channel uploads", ATOM_FIXTURE, 0.5);
    let items = provider.fetch_latest().await.unwrap();
    assert_eq!(items.len(), 2);

    assert_eq!(items[0].url, "https://video.example/watch?v=abc");
    assert!(items[0].published_at.is_some());
    assert_eq!(items[1].body, "Short description here");
    assert!(items[1].published_at.is_some());
}

#[tokio::test]
async fn reddit_fixture_maps_engagement() {
    let provider = RedditProvider::from_fixture("stocks", REDDIT_FIXTURE, 0.4);
    let items = provider.fetch_latest().await.unwrap();
    assert_eq!(items.len(), 2);

    let post = &items[0];
    assert_eq!(post.source_name, "reddit/r/stocks");
    assert_eq!(
        post.url,
        "https://reddit.com/r/stocks/comments/abc/market_thread/"
    );
    assert_eq!(post.engagement.upvotes, 240);
    assert_eq!(post.engagement.comments, 85);
    assert_eq!(post.published_at.unwrap().timestamp(), 1_754_989_200);

    let bare = &items[1];
    assert!(bare.url.is_empty());
    assert!(bare.published_at.is_none());
    assert_eq!(bare.engagement.upvotes, 0);
}

#[tokio::test]
async fn gnews_fixture_maps_source_names() {
    let provider = GnewsProvider::from_fixture(GNEWS_FIXTURE, 5, 0.7);
    let items = provider.fetch_latest().await.unwrap();
    assert_eq!(items.len(), 2);

    assert_eq!(items[0].source_name, "Example Wire");
    assert!(items[0].published_at.is_some());

    // Missing source falls back; malformed date fails open.
    assert_eq!(items[1].source_name, "GNews");
    assert!(items[1].published_at.is_none());
}

#[tokio::test]
async fn gnews_fixture_respects_max_items() {
    let provider = GnewsProvider::from_fixture(GNEWS_FIXTURE, 1, 0.7);
    let items = provider.fetch_latest().await.unwrap();
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn atom_feed_with_no_entries_is_empty_not_an_error() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Quiet Channel</title>
  <updated>2025-08-12T10:30:00Z</updated>
</feed>"#;
    let provider = FeedProvider::from_fixture("Quiet Channel", xml, 0.5);
    let items = provider.fetch_latest().await.unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn garbage_document_is_an_error() {
    let provider = FeedProvider::from_fixture("Broken", "this is not xml at all", 0.5);
    assert!(provider.fetch_latest().await.is_err());
}
