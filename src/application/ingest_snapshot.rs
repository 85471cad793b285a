use crate::application::ItemFailure;
use crate::domain::entities::daily_ranking::RankingUpsert;
use crate::domain::entities::market_snapshot::{MarketSnapshot, MoverEntry};
use crate::domain::entities::security::StaticProfile;
use crate::domain::error::DomainError;
use crate::domain::ports::market_data::MarketSnapshotProvider;
use crate::domain::ports::market_repository::MarketRepository;
use crate::domain::values::category::RankingCategory;
use crate::domain::values::market_date::snapshot_date;
use crate::domain::values::normalize::{parse_float, parse_percentage};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;

pub struct IngestSnapshotUseCase {
    repo: Arc<dyn MarketRepository>,
    feed: Arc<dyn MarketSnapshotProvider>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: RankingCategory,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestReport {
    pub date: NaiveDate,
    /// Entries the feed listed across all categories.
    pub listed: usize,
    pub stored: Vec<CategoryCount>,
    pub errors: Vec<ItemFailure>,
}

impl IngestReport {
    pub fn stored_total(&self) -> usize {
        self.stored.iter().map(|c| c.count).sum()
    }

    pub fn stored_in(&self, category: RankingCategory) -> usize {
        self.stored
            .iter()
            .find(|c| c.category == category)
            .map_or(0, |c| c.count)
    }
}

impl IngestSnapshotUseCase {
    pub fn new(repo: Arc<dyn MarketRepository>, feed: Arc<dyn MarketSnapshotProvider>) -> Self {
        Self { repo, feed }
    }

    pub fn ensure_configured(&self) -> Result<(), DomainError> {
        self.feed.ensure_configured()
    }

    /// Fetch the latest snapshot and store it.
    pub async fn execute(&self) -> Result<IngestReport, DomainError> {
        self.feed.ensure_configured()?;
        let snapshot = self.feed.fetch_snapshot().await?;
        Ok(self.ingest(&snapshot, Utc::now()))
    }

    /// Store every list of `snapshot` in feed order. Per-entry failures are
    /// collected in the report; they never stop the remaining entries.
    pub fn ingest(&self, snapshot: &MarketSnapshot, now: DateTime<Utc>) -> IngestReport {
        let date = snapshot_date(&snapshot.last_updated, now);
        let mut stored = Vec::with_capacity(RankingCategory::ALL.len());
        let mut errors = Vec::new();

        for category in RankingCategory::ALL {
            let mut listed_ids = Vec::new();
            for (idx, entry) in snapshot.list(category).iter().enumerate() {
                let rank = idx as u32 + 1;
                let ticker = entry.ticker.trim();
                if ticker.is_empty() {
                    tracing::warn!(%category, rank, "skipping entry without ticker");
                    errors.push(ItemFailure::new(
                        format!("{category} #{rank}"),
                        "entry has no ticker",
                    ));
                    continue;
                }

                match self.store_entry(ticker, entry, date, category, rank) {
                    Ok(security_id) => listed_ids.push(security_id),
                    Err(e) => {
                        tracing::warn!(%category, rank, ticker, error = %e, "failed to store ranking");
                        errors.push(ItemFailure::new(format!("{category} #{rank} {ticker}"), e));
                    }
                }
            }
            // Rows left over from an earlier ingest of the same day lose their rank.
            if !listed_ids.is_empty() {
                match self.repo.unrank_unlisted(date, category, &listed_ids) {
                    Ok(0) => {}
                    Ok(n) => tracing::info!(%category, %date, unranked = n, "unranked rows no longer listed"),
                    Err(e) => {
                        tracing::warn!(%category, error = %e, "failed to unrank stale rows");
                        errors.push(ItemFailure::new(format!("{category} stale ranks"), e));
                    }
                }
            }
            stored.push(CategoryCount {
                category,
                count: listed_ids.len(),
            });
        }

        let report = IngestReport {
            date,
            listed: snapshot.total_entries(),
            stored,
            errors,
        };
        tracing::info!(
            %date,
            listed = report.listed,
            stored = report.stored_total(),
            errors = report.errors.len(),
            "snapshot ingested"
        );
        report
    }

    fn store_entry(
        &self,
        ticker: &str,
        entry: &MoverEntry,
        date: NaiveDate,
        category: RankingCategory,
        rank: u32,
    ) -> Result<i64, DomainError> {
        let security = self.repo.upsert_security(ticker, &StaticProfile::default())?;
        self.repo.upsert_ranking(&RankingUpsert {
            security_id: security.id,
            date,
            category,
            rank,
            change_amount: parse_float(&entry.change_amount),
            change_rate: parse_percentage(&entry.change_percentage),
            price: parse_float(&entry.price),
        })?;
        Ok(security.id)
    }
}
