use crate::domain::entities::market_snapshot::{MarketSnapshot, MoverEntry};
use crate::domain::error::DomainError;
use crate::domain::ports::market_data::MarketSnapshotProvider;
use async_trait::async_trait;
use std::time::Duration;

/// Alpha Vantage `TOP_GAINERS_LOSERS` endpoint: one call returns all three
/// movers lists for the latest US session.
pub struct AlphaVantageFeed {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl AlphaVantageFeed {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: "https://www.alphavantage.co".into(),
            client: reqwest::Client::builder()
                .user_agent("moverwatch/0.1")
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, serde::Deserialize)]
struct MoversResponse {
    #[serde(default)]
    last_updated: String,
    #[serde(default)]
    top_gainers: Vec<MoverRow>,
    #[serde(default)]
    top_losers: Vec<MoverRow>,
    #[serde(default)]
    most_actively_traded: Vec<MoverRow>,
    /// Rate-limit and quota notices arrive with HTTP 200 under one of these keys.
    #[serde(default, rename = "Information")]
    information: Option<String>,
    #[serde(default, rename = "Note")]
    note: Option<String>,
    #[serde(default, rename = "Error Message")]
    error_message: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct MoverRow {
    #[serde(default)]
    ticker: String,
    #[serde(default)]
    price: String,
    #[serde(default)]
    change_amount: String,
    #[serde(default)]
    change_percentage: String,
}

impl From<MoverRow> for MoverEntry {
    fn from(row: MoverRow) -> Self {
        MoverEntry {
            ticker: row.ticker,
            price: row.price,
            change_amount: row.change_amount,
            change_percentage: row.change_percentage,
        }
    }
}

/// Decode a movers payload. Provider notices without any list data are errors.
fn decode_snapshot(body: &str) -> Result<MarketSnapshot, DomainError> {
    let data: MoversResponse =
        serde_json::from_str(body).map_err(|e| DomainError::Decode(format!("Alpha Vantage payload: {e}")))?;

    let no_lists = data.top_gainers.is_empty() && data.top_losers.is_empty() && data.most_actively_traded.is_empty();
    if no_lists {
        if let Some(notice) = data.error_message.or(data.information).or(data.note) {
            return Err(DomainError::Network(format!("Alpha Vantage: {notice}")));
        }
    }

    Ok(MarketSnapshot {
        last_updated: data.last_updated,
        top_gainers: data.top_gainers.into_iter().map(Into::into).collect(),
        top_losers: data.top_losers.into_iter().map(Into::into).collect(),
        most_active: data.most_actively_traded.into_iter().map(Into::into).collect(),
    })
}

#[async_trait]
impl MarketSnapshotProvider for AlphaVantageFeed {
    async fn fetch_snapshot(&self) -> Result<MarketSnapshot, DomainError> {
        self.ensure_configured()?;
        let url = format!("{}/query", self.base_url);

        let resp = self
            .client
            .get(&url)
            .query(&[("function", "TOP_GAINERS_LOSERS"), ("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| DomainError::Network(format!("Alpha Vantage request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(DomainError::Network(format!(
                "Alpha Vantage returned {}",
                resp.status()
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| DomainError::Network(format!("Alpha Vantage body: {e}")))?;
        let snapshot = decode_snapshot(&body)?;

        tracing::debug!(
            last_updated = %snapshot.last_updated,
            entries = snapshot.total_entries(),
            "fetched movers snapshot"
        );
        Ok(snapshot)
    }

    fn ensure_configured(&self) -> Result<(), DomainError> {
        if self.api_key.trim().is_empty() {
            return Err(DomainError::Config("ALPHA_VANTAGE_API_KEY is not set".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_movers_payload() {
        let body = r#"{
            "metadata": "Top gainers, losers, and most actively traded US tickers",
            "last_updated": "2025-11-28 16:15:59 US/Eastern",
            "top_gainers": [
                {"ticker": "AAA", "price": "21.0", "change_amount": "1.0", "change_percentage": "5.0%", "volume": "100"},
                {"ticker": "BBB", "price": "10.3", "change_amount": "0.3", "change_percentage": "3.0%", "volume": "200"}
            ],
            "top_losers": [],
            "most_actively_traded": [
                {"ticker": "CCC", "price": "1.01", "change_amount": "0.01", "change_percentage": "1.0%", "volume": "900"}
            ]
        }"#;
        let snap = decode_snapshot(body).unwrap();
        assert_eq!(snap.last_updated, "2025-11-28 16:15:59 US/Eastern");
        assert_eq!(snap.top_gainers.len(), 2);
        assert_eq!(snap.top_gainers[1].ticker, "BBB");
        assert_eq!(snap.most_active[0].change_percentage, "1.0%");
        assert!(snap.top_losers.is_empty());
    }

    #[test]
    fn test_rate_limit_notice_is_error() {
        let body = r#"{"Information": "Thank you for using Alpha Vantage! Our standard API rate limit is 25 requests per day."}"#;
        assert!(matches!(decode_snapshot(body), Err(DomainError::Network(_))));
    }

    #[test]
    fn test_missing_key_fails_before_request() {
        let feed = AlphaVantageFeed::new("  ".into());
        assert!(matches!(feed.ensure_configured(), Err(DomainError::Config(_))));
    }
}
