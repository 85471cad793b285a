use crate::domain::entities::market_snapshot::CompanyProfile;
use crate::domain::error::DomainError;
use crate::domain::ports::market_data::ProfileProvider;
use async_trait::async_trait;
use std::time::Duration;

/// Financial Modeling Prep company profile feed (`/stable/profile`).
pub struct FmpProfileFeed {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl FmpProfileFeed {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: "https://financialmodelingprep.com/stable".into(),
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

#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct FmpProfile {
    symbol: Option<String>,
    company_name: Option<String>,
    sector: Option<String>,
    industry: Option<String>,
    description: Option<String>,
    website: Option<String>,
    country: Option<String>,
    /// Usually a string, occasionally a bare number.
    full_time_employees: Option<serde_json::Value>,
    image: Option<String>,
    ipo_date: Option<String>,
    ceo: Option<String>,
    market_cap: Option<f64>,
    volume: Option<f64>,
    average_volume: Option<f64>,
    beta: Option<f64>,
    last_dividend: Option<f64>,
}

impl FmpProfile {
    fn into_profile(self, ticker: &str) -> CompanyProfile {
        let employees = match self.full_time_employees {
            Some(serde_json::Value::String(s)) => s,
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };
        CompanyProfile {
            symbol: self.symbol.unwrap_or_else(|| ticker.to_string()),
            company_name: self.company_name.unwrap_or_default(),
            sector: self.sector.unwrap_or_default(),
            industry: self.industry.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            website: self.website.unwrap_or_default(),
            country: self.country.unwrap_or_default(),
            full_time_employees: employees,
            image: self.image.unwrap_or_default(),
            ipo_date: self.ipo_date.unwrap_or_default(),
            ceo: self.ceo.unwrap_or_default(),
            market_cap: self.market_cap.unwrap_or(0.0),
            volume: self.volume.unwrap_or(0.0) as i64,
            average_volume: self.average_volume.unwrap_or(0.0) as i64,
            beta: self.beta.unwrap_or(0.0),
            last_dividend: self.last_dividend.unwrap_or(0.0),
        }
    }
}

/// Decode the profile array. An empty array means the ticker is unknown.
fn decode_profile(body: &str, ticker: &str) -> Result<CompanyProfile, DomainError> {
    let profiles: Vec<FmpProfile> =
        serde_json::from_str(body).map_err(|e| DomainError::Decode(format!("FMP profile for {ticker}: {e}")))?;
    profiles
        .into_iter()
        .next()
        .map(|p| p.into_profile(ticker))
        .ok_or_else(|| DomainError::NotFound(format!("No profile for {ticker}")))
}

#[async_trait]
impl ProfileProvider for FmpProfileFeed {
    async fn fetch_profile(&self, ticker: &str) -> Result<CompanyProfile, DomainError> {
        self.ensure_configured()?;
        let url = format!("{}/profile", self.base_url);

        let resp = self
            .client
            .get(&url)
            .query(&[("symbol", ticker), ("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| DomainError::Network(format!("FMP request for {ticker} failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::Network(format!("FMP {status} for {ticker}: {body}")));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| DomainError::Network(format!("FMP body for {ticker}: {e}")))?;
        decode_profile(&body, ticker)
    }

    fn ensure_configured(&self) -> Result<(), DomainError> {
        if self.api_key.trim().is_empty() {
            return Err(DomainError::Config("FMP_API_KEY is not set".into()));
        }
        Ok(())
    }
}
