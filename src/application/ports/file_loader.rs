use async_trait::async_trait;

use crate::domain::Page;

#[async_trait]
pub trait FileLoader: Send + Sync {
    /// Extracts non-empty pages in document order.
    async fn extract_pages(&self, data: &[u8], filename: &str)
    -> Result<Vec<Page>, FileLoaderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FileLoaderError {
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),
    #[error("no text found in {0}")]
    NoTextFound(String),
}
