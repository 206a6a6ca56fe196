use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use serde::{Deserialize, Serialize};

use crate::application::services::{CollectionInfo, HistoryMessage, SearchHit};
use crate::domain::CollectionName;
use crate::presentation::error::ApiError;
use crate::presentation::extractors::AuthUser;
use crate::presentation::state::AppState;

const UPLOAD_FIELD: &str = "file";

#[derive(Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    pub filename: String,
    pub user_id: String,
    pub collection_name: String,
    pub pages_loaded: usize,
    pub chunks_created: usize,
}

#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub async fn upload_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::new(e.status(), e.body_text()))?
            .ok_or_else(|| ApiError::bad_request("No file uploaded"))?;

        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        state.ingestion_service.validate_upload(&filename, 0)?;

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::new(e.status(), e.body_text()))?;
        tracing::info!(filename = %filename, bytes = data.len(), "Document upload received");

        let report = state
            .ingestion_service
            .ingest_pdf(&user.id, &filename, &data)
            .await?;

        tracing::info!(
            collection = %report.collection_name,
            chunks = report.chunks_created,
            "Document upload completed"
        );
        return Ok(Json(UploadResponse {
            message: "Document uploaded and processed successfully",
            filename: report.filename,
            user_id: report.user_id.to_string(),
            collection_name: report.collection_name.to_string(),
            pages_loaded: report.pages_loaded,
            chunks_created: report.chunks_created,
        }));
    }
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub query: String,
    pub collection_name: Option<String>,
    #[serde(default = "default_n_results")]
    pub n_results: usize,
}

fn default_n_results() -> usize {
    5
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub results: Vec<SearchHit>,
}

#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub async fn search_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    match params.collection_name.filter(|c| !c.is_empty()) {
        Some(name) => {
            let collection = CollectionName::from_raw(name);
            let results = state
                .search_service
                .search_in_collection(&user.id, &params.query, &collection, params.n_results)
                .await?;
            Ok(Json(SearchResponse {
                query: params.query,
                user_id: user.id.to_string(),
                collection_name: Some(collection.to_string()),
                message: None,
                results,
            }))
        }
        None => {
            let (results, searched) = state
                .search_service
                .search_across_user_collections(&user.id, &params.query, params.n_results)
                .await?;
            let message = if results.is_empty() {
                "No documents found for this user".to_string()
            } else {
                format!("Searched across {searched} collections")
            };
            Ok(Json(SearchResponse {
                query: params.query,
                user_id: user.id.to_string(),
                collection_name: None,
                message: Some(message),
                results,
            }))
        }
    }
}

#[derive(Deserialize)]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    20
}

#[derive(Serialize)]
pub struct CollectionsResponse {
    pub user_id: String,
    pub collections: Vec<CollectionInfo>,
    pub page: usize,
    pub limit: usize,
    pub total: usize,
}

pub async fn list_collections_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<PageParams>,
) -> Result<Json<CollectionsResponse>, ApiError> {
    let page = state
        .search_service
        .list_collections(&user.id, params.page, params.limit)
        .await?;

    Ok(Json(CollectionsResponse {
        user_id: user.id.to_string(),
        collections: page.collections,
        page: page.page,
        limit: page.limit,
        total: page.total,
    }))
}

#[derive(Serialize)]
pub struct DeleteCollectionResponse {
    pub message: &'static str,
    pub collection_name: String,
    pub user_id: String,
}

#[tracing::instrument(skip_all, fields(user_id = %user.id, collection = %collection_name))]
pub async fn delete_collection_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(collection_name): Path<String>,
) -> Result<Json<DeleteCollectionResponse>, ApiError> {
    let collection = CollectionName::from_raw(collection_name);
    state
        .search_service
        .delete_collection(&user.id, &collection)
        .await?;

    Ok(Json(DeleteCollectionResponse {
        message: "Collection deleted successfully",
        collection_name: collection.to_string(),
        user_id: user.id.to_string(),
    }))
}

#[derive(Deserialize)]
pub struct HistoryParams {
    #[serde(default = "default_limit")]
    pub limit: usize,
    pub cursor: Option<String>,
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub messages: Vec<HistoryMessage>,
    pub next_cursor: Option<String>,
    pub limit: usize,
}

pub async fn chat_history_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(collection_name): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let collection = CollectionName::from_raw(collection_name);
    let page = state
        .history_service
        .history_page(&user.id, &collection, params.limit, params.cursor.as_deref())
        .await?;

    Ok(Json(HistoryResponse {
        messages: page.messages,
        next_cursor: page.next_cursor,
        limit: params.limit,
    }))
}
