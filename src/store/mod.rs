// src/store/mod.rs
//! On-disk SQLite store: source health, delivered-URL dedup cache, and the
//! last-digest history used as a starvation fallback.
//!
//! Per-statement atomicity only; the deployment model is one invocation at
//! a time, so no cross-process locking is attempted.

pub mod dedup;
pub mod health;

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

pub struct Store {
    pub(crate) conn: Connection,
}

impl Store {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .with_context(|| format!("opening store at {}", path.as_ref().display()))?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// In-memory store for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("opening in-memory store")?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS source_health (
                     source_name   TEXT PRIMARY KEY,
                     last_success  INTEGER,
                     last_failure  INTEGER,
                     failure_count INTEGER NOT NULL DEFAULT 0,
                     is_healthy    INTEGER NOT NULL DEFAULT 1,
                     weight        REAL NOT NULL DEFAULT 1.0
                 );
                 CREATE TABLE IF NOT EXISTS dedup_cache (
                     url          TEXT PRIMARY KEY,
                     delivered_at INTEGER NOT NULL
                 );
                 CREATE TABLE IF NOT EXISTS digest_history (
                     delivered_at INTEGER NOT NULL,
                     body         TEXT NOT NULL
                 );",
            )
            .context("initializing store schema")?;
        Ok(())
    }

    /// Remember a delivered digest for the starvation fallback.
    pub fn record_digest(&self, body: &str, now: chrono::DateTime<chrono::Utc>) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO digest_history (delivered_at, body) VALUES (?1, ?2)",
                rusqlite::params![now.timestamp(), body],
            )
            .context("recording digest history")?;
        Ok(())
    }

    /// Most recent digest no older than `max_age`, if any.
    pub fn latest_digest(
        &self,
        max_age: chrono::Duration,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<Option<String>> {
        let cutoff = now.timestamp() - max_age.num_seconds();
        let body = self
            .conn
            .query_row(
                "SELECT body FROM digest_history
                 WHERE delivered_at >= ?1
                 ORDER BY delivered_at DESC LIMIT 1",
                [cutoff],
                |row| row.get::<_, String>(0),
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })
            .context("loading latest digest")?;
        Ok(body)
    }
}
