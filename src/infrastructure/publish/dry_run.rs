use crate::domain::error::DomainError;
use crate::domain::ports::social_publisher::SocialPublisher;

/// Publisher that only logs what would have been posted.
pub struct DryRunPublisher;

#[async_trait::async_trait]
impl SocialPublisher for DryRunPublisher {
    async fn publish(&self, text: &str) -> Result<(), DomainError> {
        tracing::info!(chars = text.chars().count(), "dry run post:\n{text}");
        Ok(())
    }
}
