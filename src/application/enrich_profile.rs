use crate::application::ItemFailure;
use crate::domain::entities::market_snapshot::CompanyProfile;
use crate::domain::entities::security::{Security, StaticProfile};
use crate::domain::entities::security_metric::SecurityMetric;
use crate::domain::error::DomainError;
use crate::domain::ports::market_data::ProfileProvider;
use crate::domain::ports::market_repository::MarketRepository;
use crate::domain::values::market_date::market_today;
use crate::domain::values::normalize::parse_int;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;

pub struct EnrichProfileUseCase {
    repo: Arc<dyn MarketRepository>,
    profiles: Arc<dyn ProfileProvider>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnrichOutcome {
    pub security: Security,
    pub metric: SecurityMetric,
    /// True when this run copied the static profile in.
    pub profile_filled: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EnrichReport {
    pub enriched: Vec<String>,
    pub failures: Vec<ItemFailure>,
}

fn static_fields(p: &CompanyProfile) -> StaticProfile {
    StaticProfile {
        name: p.company_name.clone(),
        sector: p.sector.clone(),
        industry: p.industry.clone(),
        description: p.description.clone(),
        website: p.website.clone(),
        country: p.country.clone(),
        employees: parse_int(&p.full_time_employees),
        logo: p.image.clone(),
        ipo_date: p.ipo_date.clone(),
        ceo: p.ceo.clone(),
    }
}

fn metric_from(security_id: i64, date: NaiveDate, p: &CompanyProfile) -> SecurityMetric {
    SecurityMetric {
        security_id,
        date,
        market_cap: p.market_cap,
        volume: p.volume,
        average_volume: p.average_volume,
        beta: p.beta,
        last_dividend: p.last_dividend,
    }
}

impl EnrichProfileUseCase {
    pub fn new(repo: Arc<dyn MarketRepository>, profiles: Arc<dyn ProfileProvider>) -> Self {
        Self { repo, profiles }
    }

    pub fn ensure_configured(&self) -> Result<(), DomainError> {
        self.profiles.ensure_configured()
    }

    /// Fetch the profile for a stored `ticker`. Static fields are copied only
    /// while the security has no name yet; today's metrics are always written.
    /// A ticker the store has never seen is `NotFound` and nothing is fetched.
    pub async fn enrich(&self, ticker: &str) -> Result<EnrichOutcome, DomainError> {
        let existing = self.repo.find_security_by_ticker(ticker)?;
        let profile = self.profiles.fetch_profile(ticker).await?;

        let (security, profile_filled) = if existing.is_enriched() {
            (existing, false)
        } else {
            (self.repo.upsert_security(ticker, &static_fields(&profile))?, true)
        };

        let metric = metric_from(security.id, market_today(Utc::now()), &profile);
        self.repo.upsert_metric(&metric)?;

        tracing::debug!(ticker, profile_filled, "profile enriched");
        Ok(EnrichOutcome {
            security,
            metric,
            profile_filled,
        })
    }

    /// Enrich each ticker in turn. A failure is logged and recorded, and the
    /// loop moves on.
    pub async fn enrich_many(&self, tickers: &[String]) -> EnrichReport {
        let mut report = EnrichReport::default();
        for ticker in tickers {
            match self.enrich(ticker).await {
                Ok(_) => report.enriched.push(ticker.clone()),
                Err(e) => {
                    tracing::warn!(ticker = %ticker, error = %e, "profile enrichment failed");
                    report.failures.push(ItemFailure::new(ticker.as_str(), e));
                }
            }
        }
        tracing::info!(
            enriched = report.enriched.len(),
            failed = report.failures.len(),
            "profile enrichment finished"
        );
        report
    }
}
