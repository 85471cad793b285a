use crate::domain::error::DomainError;
use crate::domain::ports::search_provider::{SearchHit, SearchProvider};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const MAX_RESULTS: u32 = 5;

/// Tavily web search, restricted to the past week of coverage.
pub struct TavilySearch {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: &'a str,
    max_results: u32,
    include_answer: bool,
    time_range: &'a str,
}

#[derive(Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    score: f64,
}

impl TavilySearch {
    pub fn new(api_key: String, timeout: Duration) -> Self {
        Self {
            api_key,
            base_url: "https://api.tavily.com".into(),
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SearchProvider for TavilySearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, DomainError> {
        self.ensure_configured()?;

        let resp = self
            .client
            .post(format!("{}/search", self.base_url))
            .json(&TavilyRequest {
                api_key: &self.api_key,
                query,
                search_depth: "basic",
                max_results: MAX_RESULTS,
                include_answer: false,
                time_range: "week",
            })
            .send()
            .await
            .map_err(|e| DomainError::Network(format!("Tavily request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::Network(format!("Tavily API {status}: {body}")));
        }

        let result: TavilyResponse = resp
            .json()
            .await
            .map_err(|e| DomainError::Decode(format!("Tavily response: {e}")))?;

        Ok(result
            .results
            .into_iter()
            .map(|r| SearchHit {
                title: r.title,
                url: r.url,
                content: r.content,
                score: r.score,
            })
            .collect())
    }

    fn ensure_configured(&self) -> Result<(), DomainError> {
        if self.api_key.trim().is_empty() {
            return Err(DomainError::Config("TAVILY_API_KEY is not set".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let body = serde_json::to_value(TavilyRequest {
            api_key: "k",
            query: "ACME business model",
            search_depth: "basic",
            max_results: MAX_RESULTS,
            include_answer: false,
            time_range: "week",
        })
        .unwrap();
        assert_eq!(body["search_depth"], "basic");
        assert_eq!(body["max_results"], 5);
        assert_eq!(body["include_answer"], false);
    }

    #[test]
    fn test_missing_key() {
        let search = TavilySearch::new(String::new(), Duration::from_secs(15));
        assert!(matches!(search.ensure_configured(), Err(DomainError::Config(_))));
    }
}
