use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::{
    api::types::{CredentialsResponse, DetectRequest, StoryRequest, StoryResponse},
    auth::AuthenticatedUser,
    classifier::{classify, ClassificationResult},
    error::ApiError,
    state::AppState,
    vision::ImageSource,
};

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn detect(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(req): Json<DetectRequest>,
) -> Result<Json<ClassificationResult>, ApiError> {
    let image_url = req.image_url.trim();
    if image_url.is_empty() {
        return Err(ApiError::BadRequest("imageUrl is required".into()));
    }

    // Our own uploads are not reachable by the provider; send their bytes.
    let source = match state.storage.local_filename(image_url) {
        Some(filename) => {
            let bytes = state
                .storage
                .read_image(filename)
                .await
                .ok_or_else(|| ApiError::NotFound(format!("image {filename} not found")))?;
            ImageSource::Bytes(bytes)
        }
        None => ImageSource::Uri(image_url.to_string()),
    };

    let labels = state.vision.detect_labels(source).await.map_err(|err| {
        error!(?err, "Vision API error");
        ApiError::Upstream(err.to_string())
    })?;

    let result = classify(&labels);
    info!(
        user_id = %user.id(),
        is_hotdog = result.is_hotdog,
        confidence = result.confidence,
        labels = labels.len(),
        "image classified"
    );

    Ok(Json(result))
}

pub async fn generate_story(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(req): Json<StoryRequest>,
) -> Result<Json<StoryResponse>, ApiError> {
    let story = state
        .story
        .generate(req.is_hotdog, &req.labels)
        .await
        .map_err(|err| {
            error!(?err, "Story generation error");
            ApiError::Upstream(err.to_string())
        })?;

    info!(user_id = %user.id(), is_hotdog = req.is_hotdog, "story generated");
    Ok(Json(StoryResponse { story }))
}

pub async fn test_credentials(
    State(state): State<AppState>,
) -> Result<Json<CredentialsResponse>, ApiError> {
    let labels = state.vision.check_credentials().await.map_err(|err| {
        error!(?err, "vision credential check failed");
        ApiError::Upstream(err.to_string())
    })?;

    Ok(Json(CredentialsResponse {
        status: "Credentials is working!",
        labels,
    }))
}
