use crate::domain::entities::daily_ranking::{DailyRanking, RankedSecurity, RankingUpsert};
use crate::domain::entities::news_search::NewsSearchBatch;
use crate::domain::entities::security::{Security, StaticProfile};
use crate::domain::entities::security_metric::SecurityMetric;
use crate::domain::error::DomainError;
use crate::domain::values::category::RankingCategory;
use chrono::{DateTime, NaiveDate, Utc};

/// Create-or-update store for everything the sync pipeline produces.
///
/// Finders only return ranked rows (`rank >= 1`).
///
/// Every upsert is idempotent on its unique key:
/// - securities on `ticker`
/// - rankings on `(security_id, date, category)`
/// - metrics on `(security_id, date)`
pub trait MarketRepository: Send + Sync {
    /// Create the security if unseen. For an existing security, only fields
    /// that are still empty are filled from `profile`; non-empty fields are
    /// never overwritten.
    fn upsert_security(&self, ticker: &str, profile: &StaticProfile) -> Result<Security, DomainError>;
    fn find_security_by_ticker(&self, ticker: &str) -> Result<Security, DomainError>;

    /// Insert or refresh rank and amounts. Existing news summary and AI
    /// analysis are kept. Any other row holding the same rank on that date
    /// and category is unranked (rank 0).
    fn upsert_ranking(&self, ranking: &RankingUpsert) -> Result<DailyRanking, DomainError>;
    /// Unrank rows of `date`/`category` whose security is not in `listed`.
    /// Unranked rows keep their data but are invisible to the finders.
    fn unrank_unlisted(
        &self,
        date: NaiveDate,
        category: RankingCategory,
        listed: &[i64],
    ) -> Result<usize, DomainError>;
    fn update_ranking(&self, ranking: &DailyRanking) -> Result<(), DomainError>;
    /// Rows with `rank <= max_rank`, ordered by rank.
    fn find_rankings_by_date(
        &self,
        date: NaiveDate,
        category: RankingCategory,
        max_rank: u32,
    ) -> Result<Vec<RankedSecurity>, DomainError>;
    fn find_ranking_by_date_rank_category(
        &self,
        date: NaiveDate,
        rank: u32,
        category: RankingCategory,
    ) -> Result<RankedSecurity, DomainError>;
    /// Every ranking of one ticker, newest date first.
    fn find_rankings_by_ticker(&self, ticker: &str) -> Result<Vec<RankedSecurity>, DomainError>;
    fn latest_ranking_date(&self, category: RankingCategory) -> Result<Option<NaiveDate>, DomainError>;

    fn upsert_metric(&self, metric: &SecurityMetric) -> Result<(), DomainError>;
    fn find_metric(&self, security_id: i64, date: NaiveDate) -> Result<Option<SecurityMetric>, DomainError>;

    /// Persist a batch and its items atomically. Returns the batch id.
    fn create_news_batch(&self, batch: &NewsSearchBatch) -> Result<i64, DomainError>;
    fn find_latest_news_batch(&self, subject: &str) -> Result<Option<NewsSearchBatch>, DomainError>;
    /// Delete batches searched before `cutoff`, items included. Returns how
    /// many batches were removed.
    fn delete_news_batches_before(&self, cutoff: DateTime<Utc>) -> Result<usize, DomainError>;
}
