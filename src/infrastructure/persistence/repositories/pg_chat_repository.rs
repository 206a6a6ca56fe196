use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{ChatRepository, RepositoryError};
use crate::domain::{ChatRecord, ChatRecordId, CollectionName, UserId};
use crate::infrastructure::persistence::pg_pool::map_sqlx_error;

const CHAT_COLUMNS: &str =
    "id, user_id, collection_name, query, retrieved_documents, llm_response, created_at, updated_at";

pub struct PgChatRepository {
    pool: PgPool,
}

impl PgChatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ChatRow {
    id: Uuid,
    user_id: String,
    collection_name: Option<String>,
    query: String,
    retrieved_documents: Option<String>,
    llm_response: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ChatRow> for ChatRecord {
    fn from(row: ChatRow) -> Self {
        Self {
            id: ChatRecordId::from_uuid(row.id),
            user_id: UserId::from_raw(row.user_id),
            collection_name: row.collection_name.map(CollectionName::from_raw),
            query: row.query,
            retrieved_documents: row.retrieved_documents,
            llm_response: row.llm_response,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ChatRepository for PgChatRepository {
    #[instrument(skip(self, record), fields(chat_id = %record.id.as_uuid(), user_id = %record.user_id))]
    async fn save(&self, record: &ChatRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO user_chats
                (id, user_id, collection_name, query, retrieved_documents, llm_response, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.user_id.as_str())
        .bind(record.collection_name.as_ref().map(CollectionName::as_str))
        .bind(&record.query)
        .bind(&record.retrieved_documents)
        .bind(&record.llm_response)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %user_id, chat_id = %id.as_uuid()))]
    async fn find(
        &self,
        user_id: &UserId,
        id: ChatRecordId,
    ) -> Result<Option<ChatRecord>, RepositoryError> {
        let row: Option<ChatRow> = sqlx::query_as(&format!(
            "SELECT {CHAT_COLUMNS} FROM user_chats WHERE id = $1 AND user_id = $2"
        ))
        .bind(id.as_uuid())
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(ChatRecord::from))
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn latest(&self, user_id: &UserId) -> Result<Option<ChatRecord>, RepositoryError> {
        let row: Option<ChatRow> = sqlx::query_as(&format!(
            "SELECT {CHAT_COLUMNS} FROM user_chats WHERE user_id = $1 \
             ORDER BY created_at DESC LIMIT 1"
        ))
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(ChatRecord::from))
    }

    #[instrument(skip(self, query), fields(user_id = %user_id))]
    async fn latest_by_query(
        &self,
        user_id: &UserId,
        query: &str,
    ) -> Result<Option<ChatRecord>, RepositoryError> {
        let row: Option<ChatRow> = sqlx::query_as(&format!(
            "SELECT {CHAT_COLUMNS} FROM user_chats WHERE user_id = $1 AND query = $2 \
             ORDER BY created_at DESC LIMIT 1"
        ))
        .bind(user_id.as_str())
        .bind(query)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(ChatRecord::from))
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn recent(
        &self,
        user_id: &UserId,
        collection: Option<&CollectionName>,
        limit: usize,
    ) -> Result<Vec<ChatRecord>, RepositoryError> {
        let rows: Vec<ChatRow> = sqlx::query_as(&format!(
            "SELECT {CHAT_COLUMNS} FROM user_chats \
             WHERE user_id = $1 AND collection_name IS NOT DISTINCT FROM $2 \
             ORDER BY created_at DESC LIMIT $3"
        ))
        .bind(user_id.as_str())
        .bind(collection.map(CollectionName::as_str))
        .bind(sql_limit(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().rev().map(ChatRecord::from).collect())
    }

    #[instrument(skip(self), fields(user_id = %user_id, collection = %collection))]
    async fn page(
        &self,
        user_id: &UserId,
        collection: &CollectionName,
        before: Option<DateTime<Utc>>,
        limit: usize,
    ) -> Result<Vec<ChatRecord>, RepositoryError> {
        let rows: Vec<ChatRow> = sqlx::query_as(&format!(
            "SELECT {CHAT_COLUMNS} FROM user_chats \
             WHERE user_id = $1 AND collection_name = $2 \
               AND ($3::timestamptz IS NULL OR created_at < $3) \
             ORDER BY created_at DESC LIMIT $4"
        ))
        .bind(user_id.as_str())
        .bind(collection.as_str())
        .bind(before)
        .bind(sql_limit(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ChatRecord::from).collect())
    }
}

/// Saturates instead of wrapping, so huge page sizes never reach Postgres as negatives.
fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}
