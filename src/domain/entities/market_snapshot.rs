use crate::domain::values::category::RankingCategory;
use serde::{Deserialize, Serialize};

/// One row of a movers list exactly as the provider sent it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoverEntry {
    pub ticker: String,
    pub price: String,
    pub change_amount: String,
    pub change_percentage: String,
}

/// Raw movers snapshot. List order is the provider's ranking order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub last_updated: String,
    pub top_gainers: Vec<MoverEntry>,
    pub top_losers: Vec<MoverEntry>,
    pub most_active: Vec<MoverEntry>,
}

impl MarketSnapshot {
    pub fn list(&self, category: RankingCategory) -> &[MoverEntry] {
        match category {
            RankingCategory::TopGainers => &self.top_gainers,
            RankingCategory::TopLosers => &self.top_losers,
            RankingCategory::MostActive => &self.most_active,
        }
    }

    pub fn total_entries(&self) -> usize {
        self.top_gainers.len() + self.top_losers.len() + self.most_active.len()
    }
}

/// Company profile as delivered by the profile provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub symbol: String,
    pub company_name: String,
    pub sector: String,
    pub industry: String,
    pub description: String,
    pub website: String,
    pub country: String,
    /// Provider sends the head count as a string.
    pub full_time_employees: String,
    pub image: String,
    pub ipo_date: String,
    pub ceo: String,
    pub market_cap: f64,
    pub volume: i64,
    pub average_volume: i64,
    pub beta: f64,
    pub last_dividend: f64,
}
