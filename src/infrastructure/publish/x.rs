use crate::domain::error::DomainError;
use crate::domain::ports::social_publisher::SocialPublisher;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;

/// X API v2 publisher authenticated with an OAuth 2.0 user-context access
/// token (scopes `tweet.write tweet.read users.read`).
pub struct XPublisher {
    access_token: String,
    base_url: String,
    client: reqwest::Client,
}

#[derive(serde::Serialize)]
struct TweetRequest<'a> {
    text: &'a str,
}

impl XPublisher {
    pub fn new(access_token: String) -> Self {
        Self {
            access_token,
            base_url: "https://api.twitter.com/2".into(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(15))
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
impl SocialPublisher for XPublisher {
    async fn publish(&self, text: &str) -> Result<(), DomainError> {
        self.ensure_configured()?;

        let resp = self
            .client
            .post(format!("{}/tweets", self.base_url))
            .bearer_auth(&self.access_token)
            .json(&TweetRequest { text })
            .send()
            .await
            .map_err(|e| DomainError::Network(format!("X request failed: {e}")))?;

        if resp.status() != StatusCode::CREATED {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::Publish(format!("X API {status}: {body}")));
        }
        Ok(())
    }

    fn ensure_configured(&self) -> Result<(), DomainError> {
        if self.access_token.trim().is_empty() {
            return Err(DomainError::Config("X_ACCESS_TOKEN is not set".into()));
        }
        Ok(())
    }
}
