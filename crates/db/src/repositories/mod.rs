use async_trait::async_trait;
use thiserror::Error;

use soundrush_core::quote::{QuoteDraft, QuoteDraftId};

pub mod memory;
pub mod quote_draft;

pub use memory::InMemoryQuoteDraftRepository;
pub use quote_draft::SqlQuoteDraftRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("encode error: {0}")]
    Encode(String),
    #[error("decode error: {0}")]
    Decode(String),
}

#[async_trait]
pub trait QuoteDraftRepository: Send + Sync {
    async fn save(&self, draft: QuoteDraft) -> Result<(), RepositoryError>;
    async fn find_by_id(&self, id: &QuoteDraftId) -> Result<Option<QuoteDraft>, RepositoryError>;
    /// Newest first.
    async fn list_recent(&self, limit: u32) -> Result<Vec<QuoteDraft>, RepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::RepositoryError;

    #[test]
    fn encode_and_decode_failures_are_reported_apart() {
        let encode = RepositoryError::Encode("answers: key must be a string".to_string());
        let decode = RepositoryError::Decode("invalid advice_json: EOF".to_string());

        assert_eq!(encode.to_string(), "encode error: answers: key must be a string");
        assert_eq!(decode.to_string(), "decode error: invalid advice_json: EOF");
    }
}
