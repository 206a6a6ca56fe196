use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{CollectionName, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatRecordId(Uuid);

impl ChatRecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ChatRecordId {
    fn default() -> Self {
        Self::new()
    }
}

/// One persisted question/answer exchange with the agent.
#[derive(Debug, Clone)]
pub struct ChatRecord {
    pub id: ChatRecordId,
    pub user_id: UserId,
    pub collection_name: Option<CollectionName>,
    pub query: String,
    pub retrieved_documents: Option<String>,
    pub llm_response: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChatRecord {
    pub fn new(
        user_id: UserId,
        collection_name: Option<CollectionName>,
        query: String,
        retrieved_documents: Option<String>,
        llm_response: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ChatRecordId::new(),
            user_id,
            collection_name,
            query,
            retrieved_documents,
            llm_response,
            created_at: now,
            updated_at: now,
        }
    }
}
