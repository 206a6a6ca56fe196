use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::services::{
    AgentError, AuthError, FeedbackError, HistoryError, IngestionError, SearchError,
};

#[derive(Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// An HTTP error rendered as `{"detail": ...}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, detail)
    }

    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, detail)
    }

    /// 500 with the failing operation named in front of the cause.
    pub fn internal(context: &str, error: impl std::fmt::Display) -> Self {
        tracing::error!(error = %error, "{context}");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("{context}: {error}"),
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                detail: self.detail,
            }),
        )
            .into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::Validation(_) => Self::new(StatusCode::UNPROCESSABLE_ENTITY, error.to_string()),
            AuthError::EmailTaken => Self::new(StatusCode::CONFLICT, error.to_string()),
            AuthError::InvalidCredentials
            | AuthError::TokenExpired
            | AuthError::InvalidToken
            | AuthError::InvalidTokenPayload
            | AuthError::UserNotFound
            | AuthError::UserInactive => Self::unauthorized(error.to_string()),
            AuthError::ResetTokenInvalid
            | AuthError::ResetTokenUsed
            | AuthError::ResetTokenExpired => Self::bad_request(error.to_string()),
            AuthError::Credentials(_) | AuthError::Repository(_) => {
                Self::internal("Authentication error", error)
            }
        }
    }
}

impl From<IngestionError> for ApiError {
    fn from(error: IngestionError) -> Self {
        match error {
            IngestionError::InvalidFile(detail) => Self::bad_request(detail),
            IngestionError::NoContent => Self::bad_request(error.to_string()),
            other => Self::internal("Error processing PDF", other),
        }
    }
}

impl From<SearchError> for ApiError {
    fn from(error: SearchError) -> Self {
        match error {
            SearchError::AccessDenied => Self::forbidden(error.to_string()),
            SearchError::CollectionNotFound(_) => Self::not_found(error.to_string()),
            other => Self::internal("Error searching documents", other),
        }
    }
}

impl From<AgentError> for ApiError {
    fn from(error: AgentError) -> Self {
        match error {
            AgentError::AccessDenied => Self::forbidden(error.to_string()),
            other => Self::internal("Error generating answer", other),
        }
    }
}

impl From<FeedbackError> for ApiError {
    fn from(error: FeedbackError) -> Self {
        match error {
            FeedbackError::ChatNotFound => Self::not_found(error.to_string()),
            other => Self::internal("Error recording feedback", other),
        }
    }
}

impl From<HistoryError> for ApiError {
    fn from(error: HistoryError) -> Self {
        match error {
            HistoryError::AccessDenied => Self::forbidden(error.to_string()),
            HistoryError::InvalidCursor(_) => Self::bad_request(error.to_string()),
            other => Self::internal("Error fetching messages", other),
        }
    }
}
