use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("No results found: {0}")]
    NoResults(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Publish error: {0}")]
    Publish(String),
}

impl DomainError {
    /// Errors caused by what the caller asked for (4xx class) rather than by a
    /// provider or the store (5xx class).
    pub fn is_caller_error(&self) -> bool {
        matches!(self, DomainError::InvalidInput(_) | DomainError::NotFound(_))
    }
}

impl From<rusqlite::Error> for DomainError {
    fn from(e: rusqlite::Error) -> Self {
        DomainError::Database(e.to_string())
    }
}
