//! News digest bot — binary entrypoint.
//!
//! Runs the aggregation pipeline exactly once and exits; scheduling is
//! external (cron / CI workflow). Exit codes: 0 delivered or dry-run
//! preview, 2 configuration error, 1 anything else.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use news_digest_bot::{pipeline, Config, PipelineContext, SourceRegistry, Store};

const EXIT_CONFIG: i32 = 2;
const EXIT_FAILURE: i32 = 1;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("news_digest_bot=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "configuration error");
            std::process::exit(EXIT_CONFIG);
        }
    };

    let registry = match SourceRegistry::load_default() {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(error = %e, "source registry error");
            std::process::exit(EXIT_CONFIG);
        }
    };

    let store = match Store::open(&config.db_path) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "store error");
            std::process::exit(EXIT_FAILURE);
        }
    };

    let ctx = PipelineContext::new(config, registry, store);
    match pipeline::run(&ctx).await {
        Ok(outcome) => {
            tracing::info!(
                items = outcome.item_count,
                delivered = outcome.delivered,
                fallback = outcome.fallback_used,
                "run complete"
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "run failed");
            std::process::exit(EXIT_FAILURE);
        }
    }
}
