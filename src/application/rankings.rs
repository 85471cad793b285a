use crate::domain::entities::daily_ranking::RankedSecurity;
use crate::domain::error::DomainError;
use crate::domain::ports::market_repository::MarketRepository;
use crate::domain::values::category::RankingCategory;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

/// Ranks shown by the "latest" board.
pub const LATEST_DEPTH: u32 = 5;

#[derive(Debug, Clone, Serialize)]
pub struct Leaderboard {
    pub date: NaiveDate,
    pub category: RankingCategory,
    pub rankings: Vec<RankedSecurity>,
}

pub struct RankingQueryUseCase {
    repo: Arc<dyn MarketRepository>,
}

impl RankingQueryUseCase {
    pub fn new(repo: Arc<dyn MarketRepository>) -> Self {
        Self { repo }
    }

    /// Top five gainers of the most recent stored date.
    pub fn latest(&self) -> Result<Leaderboard, DomainError> {
        let category = RankingCategory::TopGainers;
        let date = self
            .repo
            .latest_ranking_date(category)?
            .ok_or_else(|| DomainError::NotFound("No rankings stored yet".into()))?;
        self.by_date(date, category, LATEST_DEPTH)
    }

    pub fn by_date(&self, date: NaiveDate, category: RankingCategory, max_rank: u32) -> Result<Leaderboard, DomainError> {
        let rankings = self.repo.find_rankings_by_date(date, category, max_rank)?;
        Ok(Leaderboard {
            date,
            category,
            rankings,
        })
    }

    /// Every ranking a ticker ever held, newest first.
    pub fn history(&self, ticker: &str) -> Result<Vec<RankedSecurity>, DomainError> {
        self.repo.find_security_by_ticker(ticker)?;
        self.repo.find_rankings_by_ticker(ticker)
    }
}
