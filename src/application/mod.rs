pub mod analysis;
pub mod enrich_profile;
pub mod ingest_snapshot;
pub mod news_fanout;
pub mod publish;
pub mod rankings;
pub mod scatter;
pub mod sync;

/// One item that was skipped by a continue-on-error loop.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ItemFailure {
    /// Ticker, subject or rank the failure belongs to.
    pub item: String,
    pub error: String,
}

impl ItemFailure {
    pub fn new(item: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self {
            item: item.into(),
            error: error.to_string(),
        }
    }
}
