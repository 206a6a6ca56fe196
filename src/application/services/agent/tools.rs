use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use crate::application::ports::ToolDefinition;
use crate::application::services::{MAX_N_RESULTS, SearchError, SearchService};
use crate::domain::{CollectionName, ToolCall, UserId};

pub const SEARCH_IN_COLLECTION: &str = "search_in_collection";
pub const SEARCH_ACROSS_USER_COLLECTIONS: &str = "search_across_user_collections";

#[derive(Debug, Deserialize)]
struct SearchInCollectionArgs {
    query: String,
    #[serde(default)]
    collection_name: Option<String>,
    #[serde(default)]
    n_results: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct SearchAcrossArgs {
    query: String,
    #[serde(default)]
    n_results: Option<usize>,
}

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Retrieval tools exposed to the agent. The acting user is always bound by the
/// caller and never taken from model-supplied arguments.
pub struct RetrievalTools {
    search_service: Arc<SearchService>,
    default_n_results: usize,
}

impl RetrievalTools {
    pub fn new(search_service: Arc<SearchService>, default_n_results: usize) -> Self {
        Self {
            search_service,
            default_n_results,
        }
    }

    /// Tools offered for a scope: a scoped agent only gets the single-collection search.
    pub fn definitions(&self, scope: Option<&CollectionName>) -> Vec<ToolDefinition> {
        let mut tools = vec![search_in_collection_definition(scope)];
        if scope.is_none() {
            tools.push(search_across_definition());
        }
        tools
    }

    /// Runs one tool call and renders its outcome as the tool message content.
    #[tracing::instrument(skip(self, call), fields(tool = %call.name, call_id = %call.id))]
    pub async fn execute(
        &self,
        user_id: &UserId,
        scope: Option<&CollectionName>,
        call: &ToolCall,
    ) -> String {
        let outcome = match call.name.as_str() {
            SEARCH_IN_COLLECTION => self.search_in_collection(user_id, scope, call).await,
            SEARCH_ACROSS_USER_COLLECTIONS if scope.is_none() => {
                self.search_across(user_id, call).await
            }
            _ => {
                tracing::warn!("Model requested an unknown tool");
                return format!("Tool {} not found", call.name);
            }
        };

        match outcome {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(error = %e, "Tool execution failed");
                format!("Tool {} failed: {}", call.name, e)
            }
        }
    }

    async fn search_in_collection(
        &self,
        user_id: &UserId,
        scope: Option<&CollectionName>,
        call: &ToolCall,
    ) -> Result<String, ToolError> {
        let args: SearchInCollectionArgs = serde_json::from_value(call.arguments.clone())
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        let collection = match (scope, args.collection_name) {
            (Some(scope), _) => scope.clone(),
            (None, Some(name)) => CollectionName::from_raw(name),
            (None, None) => {
                return Err(ToolError::InvalidArguments(
                    "collection_name is required".to_string(),
                ));
            }
        };

        let hits = self
            .search_service
            .search_in_collection(user_id, &args.query, &collection, self.n_results(args.n_results))
            .await?;

        Ok(serde_json::to_string(&hits)?)
    }

    async fn search_across(&self, user_id: &UserId, call: &ToolCall) -> Result<String, ToolError> {
        let args: SearchAcrossArgs = serde_json::from_value(call.arguments.clone())
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        let (hits, collections_searched) = self
            .search_service
            .search_across_user_collections(user_id, &args.query, self.n_results(args.n_results))
            .await?;

        Ok(serde_json::to_string(&json!({
            "results": hits,
            "collections_searched": collections_searched,
        }))?)
    }

    fn n_results(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_n_results)
            .clamp(1, MAX_N_RESULTS)
    }
}

fn search_in_collection_definition(scope: Option<&CollectionName>) -> ToolDefinition {
    let description = match scope {
        Some(collection) => format!(
            "Search the document collection `{collection}` for passages relevant to the query. \
             Returns the top matching chunks with their page and source metadata."
        ),
        None => "Search one specific document collection of the user for passages relevant \
                 to the query. Returns the top matching chunks with their page and source metadata."
            .to_string(),
    };

    ToolDefinition {
        name: SEARCH_IN_COLLECTION.to_string(),
        description,
        parameters: json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "The search query." },
                "collection_name": {
                    "type": "string",
                    "description": "Name of the collection to search."
                },
                "n_results": {
                    "type": "integer",
                    "description": "Maximum number of results to return.",
                    "default": 5
                }
            },
            "required": if scope.is_some() { json!(["query"]) } else { json!(["query", "collection_name"]) }
        }),
    }
}

fn search_across_definition() -> ToolDefinition {
    ToolDefinition {
        name: SEARCH_ACROSS_USER_COLLECTIONS.to_string(),
        description: "Search all documents uploaded by the user for passages relevant to the \
                      query. Returns the top matching chunks and the number of collections searched."
            .to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "The search query." },
                "n_results": {
                    "type": "integer",
                    "description": "Maximum number of results to return.",
                    "default": 5
                }
            },
            "required": ["query"]
        }),
    }
}
