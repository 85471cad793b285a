use crate::domain::entities::market_snapshot::{CompanyProfile, MarketSnapshot};
use crate::domain::error::DomainError;

/// Source of the daily movers snapshot.
#[async_trait::async_trait]
pub trait MarketSnapshotProvider: Send + Sync {
    async fn fetch_snapshot(&self) -> Result<MarketSnapshot, DomainError>;

    /// Fails with [`DomainError::Config`] when credentials are missing.
    /// Called before any network traffic.
    fn ensure_configured(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

/// Source of company profiles, one ticker at a time.
#[async_trait::async_trait]
pub trait ProfileProvider: Send + Sync {
    async fn fetch_profile(&self, ticker: &str) -> Result<CompanyProfile, DomainError>;

    fn ensure_configured(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
