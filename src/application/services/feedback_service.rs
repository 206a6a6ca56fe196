use std::sync::Arc;

use serde_json::{Map, Value};

use crate::application::ports::{
    ChatRepository, CollectionConfig, Embedder, EmbedderError, RepositoryError, StoredDocument,
    VectorStore, VectorStoreError,
};
use crate::domain::{ChatRecord, ChatRecordId, Feedback, UserId};

pub const FEEDBACK_COLLECTION: &str = "feedback";

/// What the user is rating. Without `chat_id` or `query` the latest exchange is rated.
#[derive(Debug, Clone, Default)]
pub struct FeedbackRequest {
    pub is_positive: bool,
    pub chat_id: Option<ChatRecordId>,
    pub query: Option<String>,
    pub comments: Option<String>,
}

pub struct FeedbackService {
    chat_repository: Arc<dyn ChatRepository>,
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
}

impl FeedbackService {
    pub fn new(
        chat_repository: Arc<dyn ChatRepository>,
        embedder: Arc<dyn Embedder>,
        vector_store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            chat_repository,
            embedder,
            vector_store,
        }
    }

    #[tracing::instrument(skip(self, request), fields(user_id = %user_id, positive = request.is_positive))]
    pub async fn record_feedback(
        &self,
        user_id: &UserId,
        request: FeedbackRequest,
    ) -> Result<Feedback, FeedbackError> {
        let chat = self
            .target_chat(user_id, &request)
            .await?
            .ok_or(FeedbackError::ChatNotFound)?;

        let feedback = Feedback {
            user_id: user_id.clone(),
            input: chat.query,
            output: chat.llm_response,
            is_positive: Some(request.is_positive),
            comments: request.comments,
        };

        let text = feedback.to_document_text();
        let embedding = self.embedder.embed(&text).await?;

        if !self
            .vector_store
            .collection_exists(FEEDBACK_COLLECTION)
            .await?
        {
            self.vector_store
                .create_collection(
                    FEEDBACK_COLLECTION,
                    &CollectionConfig::feedback_collection(embedding.dimensions() as u64),
                )
                .await?;
            tracing::info!("Feedback collection created");
        }

        let mut metadata = Map::new();
        metadata.insert("type".to_string(), Value::from("feedback"));
        metadata.insert("user_id".to_string(), Value::from(user_id.as_str()));
        metadata.insert("is_positive".to_string(), Value::from(request.is_positive));

        self.vector_store
            .upsert(
                FEEDBACK_COLLECTION,
                &[StoredDocument::new(text, metadata)],
                &[embedding],
            )
            .await?;

        tracing::info!(chat_id = %chat.id.as_uuid(), "Feedback stored");
        Ok(feedback)
    }

    /// Feedback documents closest to `query`; empty until the first feedback is stored.
    pub async fn similar_feedback(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<String>, FeedbackError> {
        if !self
            .vector_store
            .collection_exists(FEEDBACK_COLLECTION)
            .await?
        {
            return Ok(Vec::new());
        }

        let embedding = self.embedder.embed(query).await?;
        let results = self
            .vector_store
            .search(FEEDBACK_COLLECTION, &embedding, limit)
            .await?;

        Ok(results.into_iter().map(|r| r.document.text).collect())
    }

    async fn target_chat(
        &self,
        user_id: &UserId,
        request: &FeedbackRequest,
    ) -> Result<Option<ChatRecord>, FeedbackError> {
        let chat = match (&request.chat_id, &request.query) {
            (Some(id), _) => self.chat_repository.find(user_id, *id).await?,
            (None, Some(query)) => self.chat_repository.latest_by_query(user_id, query).await?,
            (None, None) => self.chat_repository.latest(user_id).await?,
        };
        Ok(chat)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    #[error("Chat not found")]
    ChatNotFound,
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
    #[error("embedding: {0}")]
    Embedding(#[from] EmbedderError),
    #[error("vector store: {0}")]
    VectorStore(#[from] VectorStoreError),
}
