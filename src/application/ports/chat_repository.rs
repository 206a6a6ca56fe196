use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::RepositoryError;
use crate::domain::{ChatRecord, ChatRecordId, CollectionName, UserId};

#[async_trait]
pub trait ChatRepository: Send + Sync {
    async fn save(&self, record: &ChatRecord) -> Result<(), RepositoryError>;

    async fn find(
        &self,
        user_id: &UserId,
        id: ChatRecordId,
    ) -> Result<Option<ChatRecord>, RepositoryError>;

    async fn latest(&self, user_id: &UserId) -> Result<Option<ChatRecord>, RepositoryError>;

    async fn latest_by_query(
        &self,
        user_id: &UserId,
        query: &str,
    ) -> Result<Option<ChatRecord>, RepositoryError>;

    /// Most recent records in one scope (`None` = unscoped chats), oldest first.
    async fn recent(
        &self,
        user_id: &UserId,
        collection: Option<&CollectionName>,
        limit: usize,
    ) -> Result<Vec<ChatRecord>, RepositoryError>;

    /// Records of one collection created strictly before `before`, newest first.
    async fn page(
        &self,
        user_id: &UserId,
        collection: &CollectionName,
        before: Option<DateTime<Utc>>,
        limit: usize,
    ) -> Result<Vec<ChatRecord>, RepositoryError>;
}
