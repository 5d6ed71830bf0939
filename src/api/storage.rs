use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::info;

use crate::{
    api::types::UploadResponse,
    auth::AuthenticatedUser,
    error::ApiError,
    state::AppState,
    storage::{content_type_for, UploadRejection},
};

pub async fn upload_image(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.file_name().is_none() {
            continue;
        }

        let file_name = field.file_name().map(|s| s.to_string());
        let mime_type = field.content_type().map(|m| m.to_string());
        let bytes = field.bytes().await.map_err(multipart_error)?;

        state
            .storage
            .check_upload(mime_type.as_deref(), bytes.len())
            .map_err(rejection_error)?;

        let stored = state
            .storage
            .save_image(user.id(), bytes.as_ref(), file_name.as_deref())
            .await?;

        info!(
            user_id = %user.id(),
            filename = %stored.filename,
            size = stored.size,
            "image uploaded"
        );

        return Ok(Json(UploadResponse {
            url: stored.url(),
            filename: stored.filename,
            mime_type,
        }));
    }

    Err(ApiError::BadRequest(
        "No file found in multipart upload".to_string(),
    ))
}

pub async fn get_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let bytes = state
        .storage
        .read_image(&filename)
        .await
        .ok_or_else(|| ApiError::NotFound("File not found".to_string()))?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(content_type_for(&filename).as_ref())
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
    );
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=3600"),
    );

    Ok((headers, bytes))
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApiError::BadRequest(format!("Invalid multipart payload: {}", err.body_text()))
    }
}

fn rejection_error(rejection: UploadRejection) -> ApiError {
    match rejection {
        UploadRejection::NotAnImage => ApiError::UnsupportedMedia(rejection.to_string()),
        UploadRejection::TooLarge { .. } => ApiError::PayloadTooLarge(rejection.to_string()),
        UploadRejection::Empty => ApiError::BadRequest(rejection.to_string()),
    }
}
