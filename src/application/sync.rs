use crate::application::analysis::{AnalysisReport, AnalysisUseCase};
use crate::application::enrich_profile::{EnrichProfileUseCase, EnrichReport};
use crate::application::ingest_snapshot::{IngestReport, IngestSnapshotUseCase};
use crate::domain::error::DomainError;
use crate::domain::ports::market_repository::MarketRepository;
use crate::domain::values::category::RankingCategory;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub date: NaiveDate,
    pub ingest: IngestReport,
    pub enrich: EnrichReport,
    pub analysis: AnalysisReport,
}

/// Daily run: ingest the movers snapshot, enrich the gainers' profiles, then
/// analyse the top gainers. Stages run one after another.
pub struct SyncPipeline {
    repo: Arc<dyn MarketRepository>,
    ingest: Arc<IngestSnapshotUseCase>,
    enrich: Arc<EnrichProfileUseCase>,
    analysis: Arc<AnalysisUseCase>,
}

impl SyncPipeline {
    pub fn new(
        repo: Arc<dyn MarketRepository>,
        ingest: Arc<IngestSnapshotUseCase>,
        enrich: Arc<EnrichProfileUseCase>,
        analysis: Arc<AnalysisUseCase>,
    ) -> Self {
        Self {
            repo,
            ingest,
            enrich,
            analysis,
        }
    }

    /// Every credential the run needs, checked before any request goes out.
    pub fn preflight(&self) -> Result<(), DomainError> {
        self.ingest.ensure_configured()?;
        self.enrich.ensure_configured()?;
        self.analysis.ensure_configured()
    }

    pub async fn run(&self) -> Result<SyncReport, DomainError> {
        self.preflight()?;

        let ingest = self.ingest.execute().await?;
        if ingest.listed > 0 && ingest.stored_total() == 0 {
            let first = ingest
                .errors
                .first()
                .map(|f| format!("{}: {}", f.item, f.error))
                .unwrap_or_default();
            return Err(DomainError::Database(format!(
                "snapshot listed {} entries but none were stored ({first})",
                ingest.listed
            )));
        }
        let date = ingest.date;

        let tickers: Vec<String> = self
            .repo
            .find_rankings_by_date(date, RankingCategory::TopGainers, u32::MAX)?
            .into_iter()
            .map(|row| row.security.ticker)
            .collect();
        let enrich = self.enrich.enrich_many(&tickers).await;

        let analysis = self.analysis.run_for_date(date).await?;

        tracing::info!(
            %date,
            stored = ingest.stored_total(),
            enriched = enrich.enriched.len(),
            analyzed = analysis.analyzed.len(),
            "sync finished"
        );
        Ok(SyncReport {
            date,
            ingest,
            enrich,
            analysis,
        })
    }
}
