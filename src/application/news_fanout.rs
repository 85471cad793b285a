use crate::application::scatter::scatter_gather;
use crate::application::ItemFailure;
use crate::domain::entities::news_search::{NewsItem, NewsSearchBatch};
use crate::domain::error::DomainError;
use crate::domain::ports::market_repository::MarketRepository;
use crate::domain::ports::search_provider::{SearchHit, SearchProvider};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Which queries a fan-out issues for a subject.
#[derive(Debug, Clone, PartialEq)]
pub enum NewsQueryMode {
    /// One query about today's price move. Subject is a ticker.
    Movement,
    /// Business model and earnings coverage. Subject is a company name.
    Company,
    /// Caller-supplied queries; `{subject}` is replaced by the subject.
    Custom(Vec<String>),
}

impl NewsQueryMode {
    pub fn queries(&self, subject: &str) -> Vec<String> {
        match self {
            NewsQueryMode::Movement => vec![format!("{subject} stock price surge news today reasons")],
            NewsQueryMode::Company => vec![
                format!("{subject} business model"),
                format!("{subject} earnings summary"),
            ],
            NewsQueryMode::Custom(queries) => queries.iter().map(|q| q.replace("{subject}", subject)).collect(),
        }
    }
}

impl fmt::Display for NewsQueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NewsQueryMode::Movement => write!(f, "movement"),
            NewsQueryMode::Company => write!(f, "company"),
            NewsQueryMode::Custom(_) => write!(f, "custom"),
        }
    }
}

impl FromStr for NewsQueryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "movement" => Ok(NewsQueryMode::Movement),
            "company" => Ok(NewsQueryMode::Company),
            _ => Err(format!("Unknown news mode: {s} (expected movement or company)")),
        }
    }
}

/// Outcome of one subject in a multi-subject run.
#[derive(Debug, Clone, Serialize)]
pub struct StoredBatch {
    pub subject: String,
    pub batch_id: i64,
    pub items: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewsBatchReport {
    pub succeeded: Vec<StoredBatch>,
    pub failed: Vec<ItemFailure>,
}

#[derive(Clone)]
pub struct NewsFanOutUseCase {
    repo: Arc<dyn MarketRepository>,
    search: Arc<dyn SearchProvider>,
    timeout: Duration,
}

impl NewsFanOutUseCase {
    pub fn new(repo: Arc<dyn MarketRepository>, search: Arc<dyn SearchProvider>, timeout: Duration) -> Self {
        Self { repo, search, timeout }
    }

    pub fn ensure_configured(&self) -> Result<(), DomainError> {
        self.search.ensure_configured()
    }

    /// Run every query for `subject` concurrently and merge the hits.
    ///
    /// All queries run to completion. Failed or timed-out queries are logged
    /// and skipped; the call only fails when no query produced any item.
    pub async fn gather(&self, subject: &str, mode: &NewsQueryMode) -> Result<Vec<NewsItem>, DomainError> {
        let queries = mode.queries(subject);
        if queries.is_empty() {
            return Err(DomainError::InvalidInput(format!("no search queries for {subject}")));
        }
        self.search.ensure_configured()?;

        let total = queries.len();
        let search = self.search.clone();
        let timeout = self.timeout;
        let outcomes = scatter_gather(queries, move |query: String| {
            let search = search.clone();
            async move {
                let result = match tokio::time::timeout(timeout, search.search(&query)).await {
                    Ok(result) => result,
                    Err(_) => Err(DomainError::Network(format!("search timed out after {timeout:?}"))),
                };
                (query, result)
            }
        })
        .await;

        let mut items = Vec::new();
        let mut failures = Vec::new();
        for (query, result) in outcomes {
            match result {
                Ok(hits) => items.extend(hits.into_iter().map(|hit| tag_hit(&query, hit))),
                Err(e) => {
                    tracing::warn!(subject, query = %query, error = %e, "news query failed");
                    failures.push(e.to_string());
                }
            }
        }

        if failures.len() == total {
            return Err(DomainError::NoResults(format!(
                "all {total} news queries failed for {subject}: {}",
                failures.join("; ")
            )));
        }
        if items.is_empty() {
            return Err(DomainError::NoResults(format!("no news items found for {subject}")));
        }

        tracing::debug!(subject, items = items.len(), failed = failures.len(), "news gathered");
        Ok(items)
    }

    /// Gather news for `subject` and persist it as one batch.
    pub async fn search_and_store(&self, subject: &str, mode: &NewsQueryMode) -> Result<NewsSearchBatch, DomainError> {
        let items = self.gather(subject, mode).await?;
        let mut batch = NewsSearchBatch::new(subject.to_string(), items);
        let id = self.repo.create_news_batch(&batch)?;
        batch.id = Some(id);
        tracing::info!(subject, batch_id = id, items = batch.items.len(), "news batch stored");
        Ok(batch)
    }

    /// [`search_and_store`](Self::search_and_store) for several subjects at
    /// once. Fails only when every subject failed.
    pub async fn search_and_store_many(
        &self,
        subjects: Vec<String>,
        mode: NewsQueryMode,
    ) -> Result<NewsBatchReport, DomainError> {
        if subjects.is_empty() {
            return Err(DomainError::InvalidInput("no subjects given".into()));
        }
        self.search.ensure_configured()?;

        let this = self.clone();
        let mode = Arc::new(mode);
        let outcomes = scatter_gather(subjects, move |subject: String| {
            let this = this.clone();
            let mode = mode.clone();
            async move {
                let result = this.search_and_store(&subject, &mode).await;
                (subject, result)
            }
        })
        .await;

        let mut report = NewsBatchReport {
            succeeded: Vec::new(),
            failed: Vec::new(),
        };
        for (subject, result) in outcomes {
            match result {
                Ok(batch) => report.succeeded.push(StoredBatch {
                    subject,
                    batch_id: batch.id.unwrap_or_default(),
                    items: batch.items.len(),
                }),
                Err(e) => {
                    tracing::warn!(subject = %subject, error = %e, "news batch failed");
                    report.failed.push(ItemFailure::new(subject, e));
                }
            }
        }

        if report.succeeded.is_empty() {
            let detail: Vec<String> = report
                .failed
                .iter()
                .map(|f| format!("{}: {}", f.item, f.error))
                .collect();
            return Err(DomainError::NoResults(format!(
                "news search failed for every subject: {}",
                detail.join("; ")
            )));
        }
        Ok(report)
    }

    pub fn latest(&self, subject: &str) -> Result<NewsSearchBatch, DomainError> {
        self.repo
            .find_latest_news_batch(subject)?
            .ok_or_else(|| DomainError::NotFound(format!("No news stored for {subject}")))
    }

    /// Delete batches (and their items) searched before `cutoff`.
    pub fn prune_before(&self, cutoff: DateTime<Utc>) -> Result<usize, DomainError> {
        let removed = self.repo.delete_news_batches_before(cutoff)?;
        tracing::info!(removed, %cutoff, "old news batches pruned");
        Ok(removed)
    }
}

fn tag_hit(query: &str, hit: SearchHit) -> NewsItem {
    NewsItem {
        query: query.to_string(),
        title: hit.title,
        url: hit.url,
        content: hit.content,
        score: hit.score,
    }
}
