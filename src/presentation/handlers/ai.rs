use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::services::FeedbackRequest;
use crate::domain::{ChatRecordId, CollectionName};
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::error::ApiError;
use crate::presentation::extractors::AuthUser;
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct AskParams {
    pub query: String,
    pub collection_name: Option<String>,
}

#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub async fn ask_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<AskParams>,
) -> Result<Json<String>, ApiError> {
    tracing::debug!(query = %sanitize_prompt(&params.query), "Ask request received");

    let collection = params
        .collection_name
        .filter(|c| !c.is_empty())
        .map(CollectionName::from_raw);

    let answer = state
        .agent_service
        .ask(&user.id, &params.query, collection.as_ref())
        .await?;

    Ok(Json(answer.answer))
}

#[derive(Deserialize)]
pub struct FeedbackPayload {
    pub is_positive_feedback: bool,
    pub chat_id: Option<String>,
    pub query: Option<String>,
    pub comments: Option<String>,
}

#[derive(Serialize)]
pub struct FeedbackResponse {
    pub message: &'static str,
}

#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub async fn feedback_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<FeedbackPayload>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    let chat_id = match payload.chat_id.filter(|id| !id.is_empty()) {
        Some(raw) => Some(
            Uuid::parse_str(&raw)
                .map(ChatRecordId::from_uuid)
                .map_err(|_| ApiError::not_found("Chat not found"))?,
        ),
        None => None,
    };

    state
        .feedback_service
        .record_feedback(
            &user.id,
            FeedbackRequest {
                is_positive: payload.is_positive_feedback,
                chat_id,
                query: payload.query.filter(|q| !q.is_empty()),
                comments: payload.comments.filter(|c| !c.is_empty()),
            },
        )
        .await?;

    Ok(Json(FeedbackResponse {
        message: "Feedback saved successfully",
    }))
}
