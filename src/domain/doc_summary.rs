use chrono::{DateTime, Utc};

use super::{CollectionName, UserId};

/// LLM-written summary of an uploaded PDF.
#[derive(Debug, Clone)]
pub struct DocSummary {
    pub user_id: UserId,
    pub filename: String,
    pub collection_name: CollectionName,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

impl DocSummary {
    pub fn new(
        user_id: UserId,
        filename: String,
        collection_name: CollectionName,
        summary: String,
    ) -> Self {
        Self {
            user_id,
            filename,
            collection_name,
            summary,
            created_at: Utc::now(),
        }
    }
}
