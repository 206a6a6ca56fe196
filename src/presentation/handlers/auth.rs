use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::application::services::SignupRequest;
use crate::domain::UserPublic;
use crate::presentation::error::ApiError;
use crate::presentation::extractors::AuthUser;
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct SignupPayload {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: UserPublic,
}

#[derive(Deserialize)]
pub struct PasswordResetRequestPayload {
    pub email: String,
}

#[derive(Deserialize)]
pub struct PasswordResetConfirmPayload {
    pub token: String,
    pub new_password: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[tracing::instrument(skip_all)]
pub async fn signup_handler(
    State(state): State<AppState>,
    Json(payload): Json<SignupPayload>,
) -> Result<Json<UserPublic>, ApiError> {
    let user = state
        .auth_service
        .signup(SignupRequest {
            name: payload.name,
            email: payload.email,
            password: payload.password,
        })
        .await?;
    Ok(Json(user))
}

#[tracing::instrument(skip_all)]
pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<LoginResponse>, ApiError> {
    let result = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;
    Ok(Json(LoginResponse {
        access_token: result.access_token,
        token_type: result.token_type,
        user: result.user,
    }))
}

pub async fn me_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<UserPublic>, ApiError> {
    Ok(Json(state.auth_service.me(&user.id).await?))
}

#[tracing::instrument(skip_all)]
pub async fn password_reset_request_handler(
    State(state): State<AppState>,
    Json(payload): Json<PasswordResetRequestPayload>,
) -> Result<Json<MessageResponse>, ApiError> {
    let message = state
        .auth_service
        .request_password_reset(&payload.email)
        .await?;
    Ok(Json(MessageResponse { message }))
}

#[tracing::instrument(skip_all)]
pub async fn password_reset_confirm_handler(
    State(state): State<AppState>,
    Json(payload): Json<PasswordResetConfirmPayload>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .auth_service
        .confirm_password_reset(&payload.token, &payload.new_password)
        .await?;
    Ok(Json(MessageResponse {
        message: "Password has been reset",
    }))
}
