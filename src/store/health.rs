// src/store/health.rs
//! Per-source success/failure tracking.
//!
//! Policy: a source turns unhealthy after 3 consecutive recorded failures
//! and recovers fully on the next success. Unknown sources are presumed
//! healthy. Records are never deleted; the table is bounded by the registry.

use anyhow::{Context, Result};
use chrono::Utc;

use super::Store;

/// Consecutive failures before a source is skipped.
pub const UNHEALTHY_AFTER: i64 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct SourceHealth {
    pub source_name: String,
    pub last_success: Option<i64>,
    pub last_failure: Option<i64>,
    pub failure_count: i64,
    pub healthy: bool,
    pub weight: f32,
}

impl Store {
    pub fn record_success(&self, source: &str, weight: f32) -> Result<()> {
        let now = Utc::now().timestamp();
        self.conn
            .execute(
                "INSERT INTO source_health
                     (source_name, last_success, failure_count, is_healthy, weight)
                 VALUES (?1, ?2, 0, 1, ?3)
                 ON CONFLICT(source_name) DO UPDATE SET
                     last_success  = excluded.last_success,
                     failure_count = 0,
                     is_healthy    = 1,
                     weight        = excluded.weight",
                rusqlite::params![source, now, f64::from(weight)],
            )
            .with_context(|| format!("recording success for {source}"))?;
        Ok(())
    }

    pub fn record_failure(&self, source: &str) -> Result<()> {
        let now = Utc::now().timestamp();
        self.conn
            .execute(
                "INSERT INTO source_health
                     (source_name, last_failure, failure_count, is_healthy)
                 VALUES (?1, ?2, 1, CASE WHEN 1 >= ?3 THEN 0 ELSE 1 END)
                 ON CONFLICT(source_name) DO UPDATE SET
                     last_failure  = excluded.last_failure,
                     failure_count = source_health.failure_count + 1,
                     is_healthy    = CASE
                         WHEN source_health.failure_count + 1 >= ?3 THEN 0
                         ELSE 1
                     END",
                rusqlite::params![source, now, UNHEALTHY_AFTER],
            )
            .with_context(|| format!("recording failure for {source}"))?;
        Ok(())
    }

    /// Unknown sources default to healthy.
    pub fn is_healthy(&self, source: &str) -> Result<bool> {
        let healthy = self
            .conn
            .query_row(
                "SELECT is_healthy FROM source_health WHERE source_name = ?1",
                [source],
                |row| row.get::<_, i64>(0),
            )
            .map(|v| v != 0)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(true),
                other => Err(other),
            })
            .with_context(|| format!("health lookup for {source}"))?;
        Ok(healthy)
    }

    pub fn health_snapshot(&self, source: &str) -> Result<Option<SourceHealth>> {
        let row = self
            .conn
            .query_row(
                "SELECT source_name, last_success, last_failure, failure_count, is_healthy, weight
                 FROM source_health WHERE source_name = ?1",
                [source],
                |row| {
                    Ok(SourceHealth {
                        source_name: row.get(0)?,
                        last_success: row.get(1)?,
                        last_failure: row.get(2)?,
                        failure_count: row.get(3)?,
                        healthy: row.get::<_, i64>(4)? != 0,
                        weight: row.get::<_, f64>(5)? as f32,
                    })
                },
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })
            .with_context(|| format!("health snapshot for {source}"))?;
        Ok(row)
    }
}
