use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Dynamic per-day facts for a security, keyed by `(security_id, date)` and
/// overwritten whenever a fresher profile arrives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityMetric {
    pub security_id: i64,
    pub date: NaiveDate,
    pub market_cap: f64,
    pub volume: i64,
    pub average_volume: i64,
    pub beta: f64,
    pub last_dividend: f64,
}
