// src/ingest/providers/mod.rs
pub mod gnews;
pub mod reddit;
pub mod rss;

use chrono::{DateTime, TimeZone, Utc};
use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::OffsetDateTime;

/// Browser-ish UA; several feed hosts reject the default reqwest agent.
pub(crate) const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/91.0.4472.124 Safari/537.36";

pub(crate) const HTTP_TIMEOUT_SECS: u64 = 15;

/// Parse an RSS/Atom date string (RFC 2822 first, then RFC 3339).
/// Malformed dates yield `None`; admission is decided fail-open downstream.
pub fn parse_feed_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    let parsed = OffsetDateTime::parse(raw, &Rfc2822)
        .or_else(|_| OffsetDateTime::parse(raw, &Rfc3339))
        .ok()?;
    Utc.timestamp_opt(parsed.unix_timestamp(), 0).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc2822_and_rfc3339() {
        let a = parse_feed_date("Tue, 12 Aug 2025 09:00:00 GMT").unwrap();
        assert_eq!(a.timestamp(), 1_754_989_200);
        let b = parse_feed_date("2025-08-12T09:00:00Z").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn malformed_dates_are_none() {
        assert!(parse_feed_date("yesterday-ish").is_none());
        assert!(parse_feed_date("").is_none());
    }
}
