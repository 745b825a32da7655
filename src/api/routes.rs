//! HTTP route table

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::api::handlers;
use crate::AppState;

/// Build the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let max_upload_bytes = state.settings.server.max_upload_bytes;

    Router::new()
        .route("/generate_tryon", post(handlers::generate_tryon))
        .route("/download_image", get(handlers::download_image))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
