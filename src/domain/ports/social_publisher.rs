use crate::domain::error::DomainError;

/// Publishes one text post. Authentication is the implementation's concern.
#[async_trait::async_trait]
pub trait SocialPublisher: Send + Sync {
    async fn publish(&self, text: &str) -> Result<(), DomainError>;

    fn ensure_configured(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
