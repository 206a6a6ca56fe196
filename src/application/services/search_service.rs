use std::cmp::Ordering;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::application::ports::{
    Embedder, EmbedderError, SearchResult, VectorStore, VectorStoreError,
};
use crate::domain::{CollectionName, Embedding, UserId};

/// Upper bound on hits returned by one search.
pub const MAX_N_RESULTS: usize = 20;

fn bounded(n_results: usize) -> usize {
    n_results.clamp(1, MAX_N_RESULTS)
}

/// One retrieved chunk, ranked within the collection it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub document: String,
    pub metadata: Map<String, Value>,
    pub rank: usize,
    pub collection_name: String,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionInfo {
    pub name: String,
    pub document_name: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionPage {
    pub collections: Vec<CollectionInfo>,
    pub page: usize,
    pub limit: usize,
    pub total: usize,
}

pub struct SearchService {
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
}

impl SearchService {
    pub fn new(embedder: Arc<dyn Embedder>, vector_store: Arc<dyn VectorStore>) -> Self {
        Self {
            embedder,
            vector_store,
        }
    }

    #[tracing::instrument(skip(self, query), fields(user_id = %user_id, collection = %collection))]
    pub async fn search_in_collection(
        &self,
        user_id: &UserId,
        query: &str,
        collection: &CollectionName,
        n_results: usize,
    ) -> Result<Vec<SearchHit>, SearchError> {
        ensure_owned(user_id, collection)?;
        let n_results = bounded(n_results);

        if !self
            .vector_store
            .collection_exists(collection.as_str())
            .await?
        {
            return Err(SearchError::CollectionNotFound(collection.to_string()));
        }

        let embedding = self.embedder.embed(query).await?;
        let results = self
            .vector_store
            .search(collection.as_str(), &embedding, n_results)
            .await?;

        tracing::info!(found = results.len(), "Collection search completed");
        Ok(rank_hits(collection.as_str(), results))
    }

    /// Searches every collection the user owns and merges the per-collection rankings.
    /// Returns the merged hits and how many collections were searched.
    #[tracing::instrument(skip(self, query), fields(user_id = %user_id))]
    pub async fn search_across_user_collections(
        &self,
        user_id: &UserId,
        query: &str,
        n_results: usize,
    ) -> Result<(Vec<SearchHit>, usize), SearchError> {
        let n_results = bounded(n_results);
        let collections = self.user_collections(user_id).await?;
        tracing::info!(collections = collections.len(), "User collections found");

        if collections.is_empty() {
            tracing::warn!("No collections found for user");
            return Ok((Vec::new(), 0));
        }

        let embedding = self.embedder.embed(query).await?;
        let mut hits = Vec::new();
        for collection in &collections {
            hits.extend(self.search_one(collection, &embedding, n_results).await?);
        }

        let merged = merge_ranked(hits, n_results);
        tracing::info!(
            returned = merged.len(),
            collections = collections.len(),
            "Cross-collection search completed"
        );
        Ok((merged, collections.len()))
    }

    pub async fn list_collections(
        &self,
        user_id: &UserId,
        page: usize,
        limit: usize,
    ) -> Result<CollectionPage, SearchError> {
        let collections = self.user_collections(user_id).await?;
        let total = collections.len();
        let start = page.saturating_sub(1).saturating_mul(limit);

        let mut infos = Vec::new();
        for collection in collections.iter().skip(start).take(limit) {
            let count = self.vector_store.count(collection.as_str()).await?;
            infos.push(CollectionInfo {
                name: collection.to_string(),
                document_name: collection.document_name(user_id),
                count,
            });
        }

        Ok(CollectionPage {
            collections: infos,
            page,
            limit,
            total,
        })
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id, collection = %collection))]
    pub async fn delete_collection(
        &self,
        user_id: &UserId,
        collection: &CollectionName,
    ) -> Result<(), SearchError> {
        ensure_owned(user_id, collection)?;

        let names = self.vector_store.list_collections().await?;
        if !names.iter().any(|n| n == collection.as_str()) {
            tracing::warn!("Collection not found");
            return Err(SearchError::CollectionNotFound(collection.to_string()));
        }

        self.vector_store
            .delete_collection(collection.as_str())
            .await?;
        tracing::info!("Collection deleted");
        Ok(())
    }

    async fn user_collections(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<CollectionName>, SearchError> {
        let prefix = CollectionName::user_prefix(user_id);
        let mut names: Vec<CollectionName> = self
            .vector_store
            .list_collections()
            .await?
            .into_iter()
            .filter(|name| name.starts_with(&prefix))
            .map(CollectionName::from_raw)
            .collect();
        names.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Ok(names)
    }

    async fn search_one(
        &self,
        collection: &CollectionName,
        embedding: &Embedding,
        n_results: usize,
    ) -> Result<Vec<SearchHit>, SearchError> {
        let results = self
            .vector_store
            .search(collection.as_str(), embedding, n_results)
            .await?;
        tracing::debug!(collection = %collection, found = results.len(), "Collection searched");
        Ok(rank_hits(collection.as_str(), results))
    }
}

fn ensure_owned(user_id: &UserId, collection: &CollectionName) -> Result<(), SearchError> {
    if collection.is_owned_by(user_id) {
        Ok(())
    } else {
        tracing::warn!(user_id = %user_id, collection = %collection, "Access denied to collection");
        Err(SearchError::AccessDenied)
    }
}

fn rank_hits(collection: &str, results: Vec<SearchResult>) -> Vec<SearchHit> {
    results
        .into_iter()
        .enumerate()
        .map(|(i, result)| SearchHit {
            document: result.document.text,
            metadata: result.document.metadata,
            rank: i + 1,
            collection_name: collection.to_string(),
            score: result.score,
        })
        .collect()
}

/// Orders hits by per-collection rank, breaking ties by score, and keeps the top `n`.
pub fn merge_ranked(mut hits: Vec<SearchHit>, n: usize) -> Vec<SearchHit> {
    hits.sort_by(|a, b| {
        a.rank
            .cmp(&b.rank)
            .then_with(|| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal))
    });
    hits.truncate(n);
    hits
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Access denied to this collection")]
    AccessDenied,
    #[error("Collection not found")]
    CollectionNotFound(String),
    #[error("embedding: {0}")]
    Embedding(#[from] EmbedderError),
    #[error("vector store: {0}")]
    VectorStore(#[from] VectorStoreError),
}
