use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::ports::{ChatRepository, RepositoryError};
use crate::domain::{ChatRecord, CollectionName, MessageRole, UserId};

/// One bubble of a rendered conversation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryMessage {
    pub id: String,
    pub role: &'static str,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPage {
    pub messages: Vec<HistoryMessage>,
    pub next_cursor: Option<String>,
}

pub struct HistoryService {
    chat_repository: Arc<dyn ChatRepository>,
}

impl HistoryService {
    pub fn new(chat_repository: Arc<dyn ChatRepository>) -> Self {
        Self { chat_repository }
    }

    /// Pages backwards through a collection's chats. `cursor` is the RFC 3339
    /// `next_cursor` of the previous page.
    #[tracing::instrument(skip(self), fields(user_id = %user_id, collection = %collection))]
    pub async fn history_page(
        &self,
        user_id: &UserId,
        collection: &CollectionName,
        limit: usize,
        cursor: Option<&str>,
    ) -> Result<HistoryPage, HistoryError> {
        if !collection.is_owned_by(user_id) {
            return Err(HistoryError::AccessDenied);
        }

        let before = cursor.map(parse_cursor).transpose()?;
        let mut records = self
            .chat_repository
            .page(user_id, collection, before, limit)
            .await?;

        let next_cursor = if limit > 0 && records.len() == limit {
            records.last().map(|r| r.created_at.to_rfc3339())
        } else {
            None
        };

        records.reverse();
        let messages = records.into_iter().flat_map(expand_record).collect();

        Ok(HistoryPage {
            messages,
            next_cursor,
        })
    }
}

fn parse_cursor(raw: &str) -> Result<DateTime<Utc>, HistoryError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| HistoryError::InvalidCursor(raw.to_string()))
}

fn expand_record(record: ChatRecord) -> [HistoryMessage; 2] {
    let id = record.id.as_uuid().to_string();
    [
        HistoryMessage {
            id: id.clone(),
            role: MessageRole::User.as_str(),
            content: record.query,
            created_at: record.created_at,
        },
        HistoryMessage {
            id: format!("{id}-ai"),
            role: MessageRole::Assistant.as_str(),
            content: record.llm_response,
            created_at: record.created_at,
        },
    ]
}

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("Access denied to this collection")]
    AccessDenied,
    #[error("Invalid cursor format: {0}")]
    InvalidCursor(String),
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
}
