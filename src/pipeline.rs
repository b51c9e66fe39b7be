// src/pipeline.rs
//! One full pipeline run: fetch -> filter -> classify -> dedup -> score ->
//! select -> render -> deliver. Invoked once per scheduler tick.

use anyhow::{anyhow, Context, Result};
use chrono::{Duration, Timelike, Utc};

use crate::classify::{classify, Category};
use crate::config::Config;
use crate::digest;
use crate::freshness;
use crate::ingest::providers::gnews::GnewsProvider;
use crate::ingest::providers::reddit::RedditProvider;
use crate::ingest::providers::rss::FeedProvider;
use crate::ingest::types::{NewsItem, SourceProvider};
use crate::ingest::{fetch_all, FetchPacing};
use crate::score;
use crate::select::{delivery_budget, select};
use crate::sources::SourceRegistry;
use crate::store::dedup::DEFAULT_DEDUP_WINDOW_HOURS;
use crate::store::Store;
use crate::telegram::TelegramSender;

/// Fallback digests older than this are not re-delivered.
const FALLBACK_MAX_AGE_HOURS: i64 = 48;

/// All state for one run, built once from config + persistent store.
pub struct PipelineContext {
    pub config: Config,
    pub registry: SourceRegistry,
    pub store: Store,
    pub pacing: FetchPacing,
}

impl PipelineContext {
    pub fn new(config: Config, registry: SourceRegistry, store: Store) -> Self {
        Self {
            config,
            registry,
            store,
            pacing: FetchPacing::default(),
        }
    }
}

#[derive(Debug)]
pub struct RunOutcome {
    pub digest: String,
    pub item_count: usize,
    pub delivered: bool,
    pub fallback_used: bool,
}

/// Build the provider set for this run from the registry and config.
pub fn build_providers(
    registry: &SourceRegistry,
    config: &Config,
) -> Vec<Box<dyn SourceProvider>> {
    let mut providers: Vec<Box<dyn SourceProvider>> = Vec::new();

    for feed in registry.feeds() {
        providers.push(Box::new(FeedProvider::from_url(
            &feed.name, &feed.url, feed.weight,
        )));
    }

    if registry.social.enabled {
        for handle in &registry.social.accounts {
            providers.push(Box::new(FeedProvider::from_mirrors(
                format!("Twitter-{handle}"),
                registry.social_feed_urls(handle),
                registry.social.weight,
            )));
        }
    }

    if registry.reddit.enabled {
        for sub in &registry.reddit.subreddits {
            providers.push(Box::new(
                RedditProvider::new(sub, registry.reddit.posts_per_subreddit, registry.reddit.weight)
                    .with_sort("new"),
            ));
        }
    }

    if let Some(key) = &config.gnews_api_key {
        providers.push(Box::new(GnewsProvider::top_headlines(key, 5, 0.7)));
        providers.push(Box::new(GnewsProvider::search(
            key,
            "China US relations",
            3,
            0.7,
        )));
    }

    providers
}

/// Keyword filter applied to social-mirror items only; feed items pass
/// through untouched. Strict title+body match first; if that leaves no
/// social items, relax to title-only; if still empty, keep them all.
pub fn filter_social_keywords(items: Vec<NewsItem>, keywords: &[String]) -> Vec<NewsItem> {
    if keywords.is_empty() {
        return items;
    }

    let (social, others): (Vec<NewsItem>, Vec<NewsItem>) = items
        .into_iter()
        .partition(|i| i.category == Category::Social);
    if social.is_empty() {
        return others;
    }

    let matches = |text: &str| {
        let t = text.to_lowercase();
        keywords.iter().any(|k| t.contains(k))
    };

    let strict: Vec<NewsItem> = social
        .iter()
        .filter(|i| matches(&format!("{} {}", i.title, i.body)))
        .cloned()
        .collect();
    let picked = if !strict.is_empty() {
        strict
    } else {
        let relaxed: Vec<NewsItem> = social
            .iter()
            .filter(|i| matches(&i.title))
            .cloned()
            .collect();
        if !relaxed.is_empty() {
            relaxed
        } else {
            social
        }
    };

    picked.into_iter().chain(others).collect()
}

/// Execute one pipeline run end to end.
pub async fn run(ctx: &PipelineContext) -> Result<RunOutcome> {
    let now = Utc::now();
    let providers = build_providers(&ctx.registry, &ctx.config);
    run_with_providers(ctx, &providers, now).await
}

/// Run against an explicit provider set; `run` delegates here and tests
/// inject fixtures through it.
pub async fn run_with_providers(
    ctx: &PipelineContext,
    providers: &[Box<dyn SourceProvider>],
    now: chrono::DateTime<Utc>,
) -> Result<RunOutcome> {
    let sender = if ctx.config.dry_run {
        None
    } else {
        let token = ctx
            .config
            .bot_token
            .clone()
            .ok_or_else(|| anyhow!("bot token missing"))?;
        let chat_id = ctx
            .config
            .chat_id
            .clone()
            .ok_or_else(|| anyhow!("chat id missing"))?;
        let mut sender = TelegramSender::new(token, chat_id);
        if let Some(base) = &ctx.config.telegram_api_base {
            sender = sender.with_api_base(base);
        }
        sender
            .validate()
            .await
            .context("telegram credential validation failed")?;
        Some(sender)
    };

    let mut items = fetch_all(providers, &ctx.store, ctx.pacing).await;
    let fetched = items.len();
    tracing::info!(fetched, "fetch complete");

    items = freshness::filter_fresh(items, now);
    tracing::info!(admitted = items.len(), "freshness filter complete");

    for item in items.iter_mut() {
        let text = format!("{} {}", item.title, item.body);
        item.category = classify(&item.source_name, &text);
    }

    items = filter_social_keywords(items, &ctx.config.filter_keywords);

    if ctx.config.dry_run {
        tracing::info!("dry run: skipping dedup against the cache");
    } else {
        let window = Duration::hours(DEFAULT_DEDUP_WINDOW_HOURS);
        let purged = ctx.store.purge_dedup(window, now)?;
        tracing::debug!(purged, "dedup cache purged");
        let before = items.len();
        let mut kept = Vec::with_capacity(items.len());
        for item in items {
            // URL-less items can never be suppressed later, so they do not
            // ship at all in the delivery path.
            if !item.url.is_empty() && !ctx.store.is_duplicate(&item.url)? {
                kept.push(item);
            }
        }
        items = kept;
        tracing::info!(deduped = before - items.len(), "dedup complete");
    }

    score::apply(&mut items);

    let budget = delivery_budget(now.hour());
    let selected = select(items, budget);
    tracing::info!(selected = selected.len(), budget, "selection complete");

    let timestamp = now.format("%Y-%m-%d %H:%M").to_string();

    if selected.is_empty() {
        // Content starvation: fall back to the most recent delivered digest.
        let cached = ctx
            .store
            .latest_digest(Duration::hours(FALLBACK_MAX_AGE_HOURS), now)?;
        let Some(body) = cached else {
            return Err(anyhow!("no items survived the pipeline and no cached digest available"));
        };
        tracing::warn!("no items survived, re-delivering cached digest");
        let delivered = deliver(&sender, &body).await?;
        return Ok(RunOutcome {
            digest: body,
            item_count: 0,
            delivered,
            fallback_used: true,
        });
    }

    let body = digest::render(&selected, &timestamp);
    let delivered = deliver(&sender, &body).await?;

    if delivered {
        for item in &selected {
            ctx.store.mark_delivered(&item.url, now)?;
        }
        ctx.store.record_digest(&body, now)?;
    }

    Ok(RunOutcome {
        digest: body,
        item_count: selected.len(),
        delivered,
        fallback_used: false,
    })
}

/// Send via Telegram, or preview on stdout in dry-run mode.
/// Delivery errors are terminal for the run.
async fn deliver(sender: &Option<TelegramSender>, body: &str) -> Result<bool> {
    match sender {
        Some(sender) => {
            sender.send(body).await.context("digest delivery failed")?;
            tracing::info!(chars = body.chars().count(), "digest delivered");
            Ok(true)
        }
        None => {
            println!("====== digest preview ======");
            println!("{body}");
            println!("====== end preview ======");
            Ok(false)
        }
    }
}
