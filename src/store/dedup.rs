// src/store/dedup.rs
//! Delivered-URL dedup cache with rolling expiry.
//!
//! The key is the raw URL string. Tracking parameters, case, and trailing
//! slashes are NOT normalized, so URLs differing only in those details count
//! as distinct. Known weakness, kept as-is.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};

use super::Store;

/// Default rolling suppression window.
pub const DEFAULT_DEDUP_WINDOW_HOURS: i64 = 24;

impl Store {
    /// Drop entries whose delivery time fell out of the window. Run before
    /// each dedup check batch; there is no background expiry.
    pub fn purge_dedup(&self, window: Duration, now: DateTime<Utc>) -> Result<usize> {
        let cutoff = now.timestamp() - window.num_seconds();
        let removed = self
            .conn
            .execute("DELETE FROM dedup_cache WHERE delivered_at < ?1", [cutoff])
            .context("purging dedup cache")?;
        Ok(removed)
    }

    pub fn is_duplicate(&self, url: &str) -> Result<bool> {
        if url.is_empty() {
            return Ok(false);
        }
        let found = self
            .conn
            .query_row("SELECT 1 FROM dedup_cache WHERE url = ?1", [url], |_| Ok(()))
            .map(|_| true)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(false),
                other => Err(other),
            })
            .context("dedup lookup")?;
        Ok(found)
    }

    pub fn mark_delivered(&self, url: &str, now: DateTime<Utc>) -> Result<()> {
        self.mark_delivered_at(url, now.timestamp())
    }

    /// Insert with an explicit timestamp; lets tests age entries artificially.
    pub fn mark_delivered_at(&self, url: &str, delivered_at: i64) -> Result<()> {
        if url.is_empty() {
            return Ok(());
        }
        self.conn
            .execute(
                "INSERT OR REPLACE INTO dedup_cache (url, delivered_at) VALUES (?1, ?2)",
                rusqlite::params![url, delivered_at],
            )
            .context("marking url delivered")?;
        Ok(())
    }
}
