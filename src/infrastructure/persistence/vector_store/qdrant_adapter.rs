use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::{
    CountPointsBuilder, CreateCollectionBuilder, CreateFieldIndexCollectionBuilder, Distance,
    FieldType, PointId, PointStruct, SearchPointsBuilder, UpsertPointsBuilder,
    VectorParamsBuilder, VectorsConfig,
};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::application::ports::{
    CollectionConfig, DistanceMetric, PayloadFieldType, SearchResult, StoredDocument, VectorStore,
    VectorStoreError,
};
use crate::domain::Embedding;

const TEXT_FIELD: &str = "text";

/// Qdrant over gRPC. Each stored document is one point whose payload holds the
/// text plus its metadata fields.
pub struct QdrantAdapter {
    client: Arc<Qdrant>,
}

impl QdrantAdapter {
    pub fn new(url: &str, api_key: Option<String>) -> Result<Self, VectorStoreError> {
        let client = Qdrant::from_url(url)
            .api_key(api_key)
            .build()
            .map_err(|e| VectorStoreError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    pub fn with_client(client: Arc<Qdrant>) -> Self {
        Self { client }
    }

    fn map_distance_metric(metric: &DistanceMetric) -> Distance {
        match metric {
            DistanceMetric::Cosine => Distance::Cosine,
            DistanceMetric::Euclidean => Distance::Euclid,
            DistanceMetric::DotProduct => Distance::Dot,
        }
    }

    fn map_field_type(field_type: &PayloadFieldType) -> FieldType {
        match field_type {
            PayloadFieldType::Keyword => FieldType::Keyword,
            PayloadFieldType::Integer => FieldType::Integer,
            PayloadFieldType::Bool => FieldType::Bool,
        }
    }
}

#[async_trait]
impl VectorStore for QdrantAdapter {
    #[instrument(skip(self))]
    async fn list_collections(&self) -> Result<Vec<String>, VectorStoreError> {
        let response = self
            .client
            .list_collections()
            .await
            .map_err(|e| VectorStoreError::ConnectionFailed(e.to_string()))?;

        Ok(response.collections.into_iter().map(|c| c.name).collect())
    }

    #[instrument(skip(self))]
    async fn collection_exists(&self, name: &str) -> Result<bool, VectorStoreError> {
        self.client
            .collection_exists(name)
            .await
            .map_err(|e| VectorStoreError::ConnectionFailed(e.to_string()))
    }

    #[instrument(skip(self, config), fields(dimensions = config.vector_dimensions))]
    async fn create_collection(
        &self,
        name: &str,
        config: &CollectionConfig,
    ) -> Result<bool, VectorStoreError> {
        if self.collection_exists(name).await? {
            info!(collection = name, "collection already exists");
            return Ok(false);
        }

        let vectors_config = VectorsConfig::from(VectorParamsBuilder::new(
            config.vector_dimensions,
            Self::map_distance_metric(&config.distance_metric),
        ));

        if let Err(e) = self
            .client
            .create_collection(CreateCollectionBuilder::new(name).vectors_config(vectors_config))
            .await
        {
            let message = e.to_string();
            if is_already_exists(&message) {
                info!(collection = name, "collection created concurrently");
                return Ok(false);
            }
            return Err(VectorStoreError::CollectionCreationFailed(message));
        }

        info!(collection = name, "collection_created");

        for index in &config.payload_indexes {
            self.client
                .create_field_index(CreateFieldIndexCollectionBuilder::new(
                    name,
                    &index.field_name,
                    Self::map_field_type(&index.field_type),
                ))
                .await
                .map_err(|e| VectorStoreError::PayloadIndexFailed(e.to_string()))?;

            info!(collection = name, field = %index.field_name, "payload_index_applied");
        }

        Ok(true)
    }

    #[instrument(skip(self))]
    async fn delete_collection(&self, name: &str) -> Result<(), VectorStoreError> {
        if !self.collection_exists(name).await? {
            return Ok(());
        }

        self.client
            .delete_collection(name)
            .await
            .map_err(|e| VectorStoreError::CollectionDeletionFailed(e.to_string()))?;

        info!(collection = name, "collection_deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn count(&self, name: &str) -> Result<u64, VectorStoreError> {
        let response = self
            .client
            .count(CountPointsBuilder::new(name).exact(true))
            .await
            .map_err(|e| VectorStoreError::ConnectionFailed(e.to_string()))?;

        Ok(response.result.map(|r| r.count).unwrap_or_default())
    }

    #[instrument(skip(self, documents, embeddings), fields(count = documents.len()))]
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

        let points: Vec<PointStruct> = documents
            .iter()
            .zip(embeddings.iter())
            .map(|(document, embedding)| {
                let mut payload: HashMap<String, Value> = document
                    .metadata
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                payload.insert(TEXT_FIELD.to_string(), Value::String(document.text.clone()));

                PointStruct::new(
                    PointId::from(document.id.to_string()),
                    embedding.values.clone(),
                    payload,
                )
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(name, points).wait(true))
            .await
            .map_err(|e| VectorStoreError::UpsertFailed(e.to_string()))?;

        info!(collection = name, count = documents.len(), "points_upserted");
        Ok(())
    }

    #[instrument(skip(self, embedding))]
    async fn search(
        &self,
        name: &str,
        embedding: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, VectorStoreError> {
        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(name, embedding.values.clone(), top_k as u64)
                    .with_payload(true),
            )
            .await
            .map_err(|e| VectorStoreError::SearchFailed(e.to_string()))?;

        let results = response
            .result
            .into_iter()
            .filter_map(|point| {
                let id = match point.id?.point_id_options? {
                    PointIdOptions::Uuid(uuid) => Uuid::parse_str(&uuid).ok()?,
                    PointIdOptions::Num(_) => return None,
                };

                let mut metadata: Map<String, Value> = point
                    .payload
                    .into_iter()
                    .map(|(k, v)| (k, v.into_json()))
                    .collect();
                let text = match metadata.remove(TEXT_FIELD) {
                    Some(Value::String(text)) => text,
                    _ => return None,
                };

                Some(SearchResult {
                    document: StoredDocument { id, text, metadata },
                    score: point.score,
                })
            })
            .collect();

        Ok(results)
    }
}

/// Qdrant reports a create for an existing name as "Collection `x` already exists!".
fn is_already_exists(message: &str) -> bool {
    message.contains("already exists")
}
