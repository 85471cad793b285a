use crate::domain::entities::security::Security;
use crate::domain::values::category::RankingCategory;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One leaderboard row. Identity is `(security_id, date, category)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRanking {
    pub id: i64,
    pub security_id: i64,
    pub date: NaiveDate,
    pub category: RankingCategory,
    pub rank: u32,
    pub change_amount: f64,
    /// Percentage as a decimal: 5.42 means +5.42%.
    pub change_rate: f64,
    pub price: f64,
    pub news_summary: String,
    pub ai_analysis: String,
}

/// Values written by snapshot ingestion. News summary and AI analysis are
/// owned by later stages and are never part of an upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingUpsert {
    pub security_id: i64,
    pub date: NaiveDate,
    pub category: RankingCategory,
    pub rank: u32,
    pub change_amount: f64,
    pub change_rate: f64,
    pub price: f64,
}

/// A ranking row joined with its security.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSecurity {
    #[serde(flatten)]
    pub ranking: DailyRanking,
    pub security: Security,
}
