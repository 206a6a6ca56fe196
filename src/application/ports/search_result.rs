use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::Chunk;

/// A text record plus arbitrary metadata, as written to a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: Uuid,
    pub text: String,
    pub metadata: Map<String, Value>,
}

impl StoredDocument {
    pub fn new(text: String, metadata: Map<String, Value>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            metadata,
        }
    }
}

impl From<&Chunk> for StoredDocument {
    fn from(chunk: &Chunk) -> Self {
        let mut metadata = Map::new();
        metadata.insert(
            "page".to_string(),
            chunk.page.map(Value::from).unwrap_or(Value::Null),
        );
        metadata.insert("source".to_string(), Value::from(chunk.source.clone()));
        metadata.insert("offset".to_string(), Value::from(chunk.offset as u64));

        Self {
            id: chunk.id.as_uuid(),
            text: chunk.text.clone(),
            metadata,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub document: StoredDocument,
    pub score: f32,
}
