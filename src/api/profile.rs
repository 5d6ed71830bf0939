use axum::{extract::State, Json};
use tracing::info;

use crate::{
    api::types::{RecordDetectionRequest, RecordDetectionResponse},
    auth::AuthenticatedUser,
    error::ApiError,
    model::profile::{Profile, ProfileUpdate},
    state::AppState,
};

pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Profile>, ApiError> {
    let profile = state.db.ensure_profile(user.id(), user.email()).await?;
    Ok(Json(profile))
}

pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<Profile>, ApiError> {
    let update = update.validated().map_err(ApiError::BadRequest)?;
    let profile = state
        .db
        .update_profile(user.id(), user.email(), update)
        .await?;
    Ok(Json(profile))
}

pub async fn record_detection(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(req): Json<RecordDetectionRequest>,
) -> Result<Json<RecordDetectionResponse>, ApiError> {
    let story = req.story.trim();
    if story.is_empty() {
        return Err(ApiError::BadRequest("story is required".into()));
    }
    let image_url = req
        .image_url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty());

    let record = state
        .db
        .record_detection(
            user.id(),
            user.email(),
            req.is_hotdog,
            story.to_string(),
            image_url,
        )
        .await?;

    if !record.unlocked.is_empty() {
        info!(user_id = %user.id(), unlocked = ?record.unlocked, "achievements unlocked");
    }

    Ok(Json(RecordDetectionResponse {
        profile: record.profile,
        unlocked_achievements: record.unlocked,
    }))
}
