use async_trait::async_trait;

use super::{CollectionConfig, SearchResult, StoredDocument, VectorStoreError};
use crate::domain::Embedding;

/// Named-collection vector database.
#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn list_collections(&self) -> Result<Vec<String>, VectorStoreError>;

    async fn collection_exists(&self, name: &str) -> Result<bool, VectorStoreError>;

    /// Returns `false` when the collection was already there.
    async fn create_collection(
        &self,
        name: &str,
        config: &CollectionConfig,
    ) -> Result<bool, VectorStoreError>;

    async fn delete_collection(&self, name: &str) -> Result<(), VectorStoreError>;

    async fn count(&self, name: &str) -> Result<u64, VectorStoreError>;

    async fn upsert(
        &self,
        name: &str,
        documents: &[StoredDocument],
        embeddings: &[Embedding],
    ) -> Result<(), VectorStoreError>;

    /// Results come back best match first.
    async fn search(
        &self,
        name: &str,
        embedding: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, VectorStoreError>;
}
