use async_trait::async_trait;

use crate::application::ports::{Embedder, EmbedderError};
use crate::domain::Embedding;

pub const MOCK_EMBEDDING_DIMENSIONS: usize = 8;

/// Deterministic embedder: identical texts map to identical vectors.
pub struct MockEmbedder;

impl MockEmbedder {
    fn vector_for(text: &str) -> Embedding {
        let mut values = vec![0.0f32; MOCK_EMBEDDING_DIMENSIONS];
        for (i, byte) in text.bytes().enumerate() {
            values[i % MOCK_EMBEDDING_DIMENSIONS] += f32::from(byte) / 255.0;
        }
        if values.iter().all(|v| *v == 0.0) {
            values[0] = 1.0;
        }
        Embedding::new(values)
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbedderError> {
        Ok(Self::vector_for(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbedderError> {
        Ok(texts.iter().map(|t| Self::vector_for(t)).collect())
    }
}
