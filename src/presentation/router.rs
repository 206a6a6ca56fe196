use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::middleware;
use axum::routing::{delete, get, post};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    ask_handler, chat_history_handler, delete_collection_handler, feedback_handler,
    health_handler, list_collections_handler, login_handler, me_handler,
    password_reset_confirm_handler, password_reset_request_handler, root_handler, search_handler,
    signup_handler, upload_handler,
};
use crate::presentation::state::AppState;

/// Multipart framing on top of the raw file size.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let body_limit =
        DefaultBodyLimit::max(state.settings.upload.max_upload_bytes + MULTIPART_OVERHEAD_BYTES);
    let cors = cors_layer(&state.settings.cors.allowed_origins);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/auth/signup", post(signup_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/me", get(me_handler))
        .route(
            "/auth/password-reset/request",
            post(password_reset_request_handler),
        )
        .route(
            "/auth/password-reset/confirm",
            post(password_reset_confirm_handler),
        )
        .route("/documents/upload", post(upload_handler))
        .route("/documents/search", get(search_handler))
        .route("/documents/collections", get(list_collections_handler))
        .route(
            "/documents/collections/{collection_name}",
            delete(delete_collection_handler),
        )
        .route(
            "/documents/{collection_name}/messages",
            get(chat_history_handler),
        )
        .route("/ai/ask", get(ask_handler))
        .route("/ai/ask/feedback", post(feedback_handler))
        .layer(body_limit)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}
