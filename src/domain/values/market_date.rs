use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::America::New_York;

/// Current calendar date on the US equity market clock.
pub fn market_today(now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&New_York).date_naive()
}

/// Date carried by a freshness stamp such as `"2025-11-28 16:15:59 US/Eastern"`.
pub fn date_from_freshness(stamp: &str) -> Option<NaiveDate> {
    let first = stamp.split_whitespace().next()?;
    NaiveDate::parse_from_str(first, "%Y-%m-%d").ok()
}

/// Anchor date for a snapshot: the feed's own stamp when it parses, otherwise
/// today's market date.
pub fn snapshot_date(stamp: &str, now: DateTime<Utc>) -> NaiveDate {
    match date_from_freshness(stamp) {
        Some(date) => date,
        None => {
            let fallback = market_today(now);
            tracing::warn!(stamp, %fallback, "unusable freshness stamp, using market date");
            fallback
        }
    }
}
