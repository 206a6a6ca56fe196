use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn root_handler() -> Json<&'static str> {
    tracing::debug!("Root endpoint accessed");
    Json("Hello from NeuroDesk.")
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}
