use async_trait::async_trait;

use crate::domain::Embedding;

/// Turns chunk and query text into vectors. One embedder serves both sides, so
/// document and query vectors always share a model and dimension.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbedderError>;

    /// Returns one embedding per input, in input order.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbedderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum EmbedderError {
    #[error("embedding api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("embedding provider rate limited the request")]
    RateLimited,
    #[error("invalid embedding response: {0}")]
    InvalidResponse(String),
}
