use crate::domain::error::DomainError;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub content: String,
    pub score: f64,
}

/// Web/news search backend. One call per query.
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, DomainError>;

    fn ensure_configured(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
