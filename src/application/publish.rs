use crate::application::ItemFailure;
use crate::domain::error::DomainError;
use crate::domain::ports::market_repository::MarketRepository;
use crate::domain::ports::social_publisher::SocialPublisher;
use crate::domain::values::category::RankingCategory;
use crate::domain::values::post::{build_analysis_post, build_ranking_post, rank_glyph, RANK_GLYPHS};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostKind {
    Ranking,
    Analysis,
    /// Ranking post, then the single-analysis posts.
    All,
}

impl fmt::Display for PostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostKind::Ranking => write!(f, "ranking"),
            PostKind::Analysis => write!(f, "analysis"),
            PostKind::All => write!(f, "all"),
        }
    }
}

impl FromStr for PostKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ranking" => Ok(PostKind::Ranking),
            "analysis" => Ok(PostKind::Analysis),
            "all" => Ok(PostKind::All),
            _ => Err(format!("Unknown post type: {s} (expected ranking, analysis or all)")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PublishReport {
    pub date: NaiveDate,
    pub ranking_posted: bool,
    pub analysis_posted: Vec<u32>,
    pub failures: Vec<ItemFailure>,
}

impl PublishReport {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            ranking_posted: false,
            analysis_posted: Vec::new(),
            failures: Vec::new(),
        }
    }
}

pub struct PublishUseCase {
    repo: Arc<dyn MarketRepository>,
    publisher: Arc<dyn SocialPublisher>,
    delay: Duration,
}

impl PublishUseCase {
    pub fn new(repo: Arc<dyn MarketRepository>, publisher: Arc<dyn SocialPublisher>, delay: Duration) -> Self {
        Self { repo, publisher, delay }
    }

    fn resolve_date(&self, date: Option<NaiveDate>) -> Result<NaiveDate, DomainError> {
        match date {
            Some(d) => Ok(d),
            None => self
                .repo
                .latest_ranking_date(RankingCategory::TopGainers)?
                .ok_or_else(|| DomainError::NotFound("No rankings stored yet".into())),
        }
    }

    /// Leaderboard post text for `date`.
    pub fn compose_ranking(&self, date: NaiveDate) -> Result<String, DomainError> {
        let rows = self
            .repo
            .find_rankings_by_date(date, RankingCategory::TopGainers, RANK_GLYPHS.len() as u32)?;
        if rows.is_empty() {
            return Err(DomainError::NotFound(format!("No Top Gainers rankings on {date}")));
        }
        Ok(build_ranking_post(date, &rows))
    }

    /// Single-analysis post text for one rank of `date`.
    pub fn compose_analysis(&self, date: NaiveDate, rank: u32) -> Result<String, DomainError> {
        if rank_glyph(rank).is_none() {
            return Err(DomainError::InvalidInput(format!("rank must be 1-5, got {rank}")));
        }
        let row = self
            .repo
            .find_ranking_by_date_rank_category(date, rank, RankingCategory::TopGainers)?;
        if row.ranking.ai_analysis.is_empty() {
            return Err(DomainError::NotFound(format!(
                "{} (#{rank} on {date}) has no analysis yet",
                row.security.ticker
            )));
        }
        build_analysis_post(&row)
    }

    pub async fn post_ranking(&self, date: Option<NaiveDate>) -> Result<PublishReport, DomainError> {
        self.publisher.ensure_configured()?;
        let date = self.resolve_date(date)?;
        let text = self.compose_ranking(date)?;
        self.publisher.publish(&text).await?;
        tracing::info!(%date, "ranking post published");

        let mut report = PublishReport::new(date);
        report.ranking_posted = true;
        Ok(report)
    }

    pub async fn post_single_analysis(&self, date: Option<NaiveDate>, rank: u32) -> Result<PublishReport, DomainError> {
        self.publisher.ensure_configured()?;
        let date = self.resolve_date(date)?;
        let text = self.compose_analysis(date, rank)?;
        self.publisher.publish(&text).await?;
        tracing::info!(%date, rank, "analysis post published");

        let mut report = PublishReport::new(date);
        report.analysis_posted.push(rank);
        Ok(report)
    }

    /// Post ranks 1 through 5 in order, waiting `delay` between posts. A failed
    /// rank is recorded and the loop continues.
    pub async fn post_analysis(&self, date: Option<NaiveDate>) -> Result<PublishReport, DomainError> {
        self.publisher.ensure_configured()?;
        let date = self.resolve_date(date)?;
        let mut report = PublishReport::new(date);
        self.post_analysis_into(&mut report).await;
        Ok(report)
    }

    async fn post_analysis_into(&self, report: &mut PublishReport) {
        let date = report.date;
        for rank in 1..=RANK_GLYPHS.len() as u32 {
            if rank > 1 {
                tokio::time::sleep(self.delay).await;
            }
            let outcome = match self.compose_analysis(date, rank) {
                Ok(text) => self.publisher.publish(&text).await,
                Err(e) => Err(e),
            };
            match outcome {
                Ok(()) => {
                    tracing::info!(%date, rank, "analysis post published");
                    report.analysis_posted.push(rank);
                }
                Err(e) => {
                    tracing::warn!(%date, rank, error = %e, "analysis post failed");
                    report.failures.push(ItemFailure::new(format!("#{rank}"), e));
                }
            }
        }
    }

    /// Publish `kind` for `date` (latest date when `None`). For
    /// [`PostKind::All`] a failed ranking post aborts the run.
    pub async fn publish(&self, kind: PostKind, date: Option<NaiveDate>) -> Result<PublishReport, DomainError> {
        match kind {
            PostKind::Ranking => self.post_ranking(date).await,
            PostKind::Analysis => self.post_analysis(date).await,
            PostKind::All => {
                let mut report = self.post_ranking(date).await?;
                tokio::time::sleep(self.delay).await;
                self.post_analysis_into(&mut report).await;
                Ok(report)
            }
        }
    }
}
