use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::ports::{
    CollectionConfig, SearchResult, StoredDocument, VectorStore, VectorStoreError,
};
use crate::domain::Embedding;

type Collection = Vec<(StoredDocument, Embedding)>;

/// In-memory vector store ranking by cosine similarity.
#[derive(Default)]
pub struct MockVectorStore {
    collections: Mutex<BTreeMap<String, Collection>>,
}

impl MockVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates a collection with documents and their vectors.
    pub fn with_collection(
        self,
        name: &str,
        entries: impl IntoIterator<Item = (StoredDocument, Embedding)>,
    ) -> Self {
        if let Ok(mut collections) = self.collections.lock() {
            collections.insert(name.to_string(), entries.into_iter().collect());
        }
        self
    }

    pub fn documents(&self, name: &str) -> Vec<StoredDocument> {
        self.collections
            .lock()
            .ok()
            .and_then(|c| c.get(name).map(|docs| docs.iter().map(|(d, _)| d.clone()).collect()))
            .unwrap_or_default()
    }
}

fn lock_failed<T>(e: std::sync::PoisonError<T>) -> VectorStoreError {
    VectorStoreError::ConnectionFailed(e.to_string())
}

#[async_trait]
impl VectorStore for MockVectorStore {
    async fn list_collections(&self) -> Result<Vec<String>, VectorStoreError> {
        Ok(self
            .collections
            .lock()
            .map_err(lock_failed)?
            .keys()
            .cloned()
            .collect())
    }

    async fn collection_exists(&self, name: &str) -> Result<bool, VectorStoreError> {
        Ok(self.collections.lock().map_err(lock_failed)?.contains_key(name))
    }

    async fn create_collection(
        &self,
        name: &str,
        _config: &CollectionConfig,
    ) -> Result<bool, VectorStoreError> {
        let mut collections = self.collections.lock().map_err(lock_failed)?;
        if collections.contains_key(name) {
            return Ok(false);
        }
        collections.insert(name.to_string(), Vec::new());
        Ok(true)
    }

    async fn delete_collection(&self, name: &str) -> Result<(), VectorStoreError> {
        self.collections.lock().map_err(lock_failed)?.remove(name);
        Ok(())
    }

    async fn count(&self, name: &str) -> Result<u64, VectorStoreError> {
        let collections = self.collections.lock().map_err(lock_failed)?;
        collections
            .get(name)
            .map(|docs| docs.len() as u64)
            .ok_or_else(|| VectorStoreError::CollectionNotFound(name.to_string()))
    }

    async fn upsert(
        &self,
        name: &str,
        documents: &[StoredDocument],
        embeddings: &[Embedding],
    ) -> Result<(), VectorStoreError> {
        if documents.len() != embeddings.len() {
            return Err(VectorStoreError::UpsertFailed(
                "documents and embeddings count mismatch".to_string(),
            ));
        }
        let mut collections = self.collections.lock().map_err(lock_failed)?;
        let collection = collections
            .get_mut(name)
            .ok_or_else(|| VectorStoreError::CollectionNotFound(name.to_string()))?;
        for (document, embedding) in documents.iter().zip(embeddings) {
            collection.retain(|(d, _)| d.id != document.id);
            collection.push((document.clone(), embedding.clone()));
        }
        Ok(())
    }

    async fn search(
        &self,
        name: &str,
        embedding: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, VectorStoreError> {
        let collections = self.collections.lock().map_err(lock_failed)?;
        let collection = collections
            .get(name)
            .ok_or_else(|| VectorStoreError::CollectionNotFound(name.to_string()))?;

        let mut results: Vec<SearchResult> = collection
            .iter()
            .map(|(document, stored)| SearchResult {
                document: document.clone(),
                score: embedding.cosine_similarity(stored),
            })
            .collect();
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(top_k);
        Ok(results)
    }
}
