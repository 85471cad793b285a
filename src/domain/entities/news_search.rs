use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const BLOCK_DELIMITER: &str = "\n---\n\n";

/// One search hit, tagged with the query that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub query: String,
    pub title: String,
    pub url: String,
    pub content: String,
    pub score: f64,
}

impl NewsItem {
    /// Text block handed to the generator and kept in the combined corpus.
    pub fn as_block(&self) -> String {
        format!(
            "Query: {}\nTitle: {}\nContent: {}\nURL: {}\n\n",
            self.query, self.title, self.content, self.url
        )
    }
}

/// All items gathered by one fan-out run for one subject. The batch owns its
/// items; deleting the batch deletes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsSearchBatch {
    /// Store id, `None` until persisted.
    pub id: Option<i64>,
    pub subject: String,
    pub searched_at: DateTime<Utc>,
    pub combined_content: String,
    pub items: Vec<NewsItem>,
}

impl NewsSearchBatch {
    pub fn new(subject: String, items: Vec<NewsItem>) -> Self {
        let combined_content = items
            .iter()
            .map(NewsItem::as_block)
            .collect::<Vec<_>>()
            .join(BLOCK_DELIMITER);
        Self {
            id: None,
            subject,
            searched_at: Utc::now(),
            combined_content,
            items,
        }
    }

    pub fn blocks(&self) -> Vec<String> {
        self.items.iter().map(NewsItem::as_block).collect()
    }
}
