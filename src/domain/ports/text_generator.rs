use crate::domain::error::DomainError;

/// Chat-style text generation: a system instruction plus one user message in,
/// one reply out.
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String, DomainError>;

    fn ensure_configured(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
