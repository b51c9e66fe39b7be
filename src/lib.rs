// src/lib.rs
// Public library surface for the binary and the integration tests.

pub mod classify;
pub mod config;
pub mod digest;
pub mod freshness;
pub mod ingest;
pub mod pipeline;
pub mod score;
pub mod select;
pub mod sources;
pub mod store;
pub mod telegram;

// ---- Re-exports for stable public API ----
pub use crate::classify::Category;
pub use crate::config::Config;
pub use crate::ingest::types::{Engagement, NewsItem, SourceProvider};
pub use crate::pipeline::{run, PipelineContext, RunOutcome};
pub use crate::sources::SourceRegistry;
pub use crate::store::Store;
pub use crate::telegram::{SendError, TelegramSender};
