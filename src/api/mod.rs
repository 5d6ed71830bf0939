use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

pub mod handlers;
pub mod profile;
pub mod storage;
pub mod types;

// Room for multipart framing around the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/detect", post(handlers::detect))
        .route("/api/generate-story", post(handlers::generate_story))
        .route("/api/test-credentials", get(handlers::test_credentials))
        .route(
            "/api/profile",
            get(profile::get_profile).patch(profile::update_profile),
        )
        .route("/api/profile/detections", post(profile::record_detection))
        .route(
            "/api/storage/upload",
            post(storage::upload_image)
                .layer(DefaultBodyLimit::max(max_upload_bytes + MULTIPART_OVERHEAD)),
        )
        .route("/api/storage/files/{filename}", get(storage::get_image))
}

/// Full application: routes, CORS for the browser frontend, request tracing.
pub fn app(state: AppState) -> Router {
    router(state.storage.max_bytes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
