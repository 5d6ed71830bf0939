use serde::{Deserialize, Serialize};

use crate::{classifier::LabelObservation, model::profile::Profile};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectRequest {
    #[serde(default)]
    pub image_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryRequest {
    pub is_hotdog: bool,
    #[serde(default)]
    pub labels: Vec<LabelObservation>,
}

#[derive(Debug, Serialize)]
pub struct StoryResponse {
    pub story: String,
}

#[derive(Debug, Serialize)]
pub struct CredentialsResponse {
    pub status: &'static str,
    pub labels: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDetectionRequest {
    pub is_hotdog: bool,
    pub story: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDetectionResponse {
    pub profile: Profile,
    pub unlocked_achievements: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub filename: String,
    pub mime_type: Option<String>,
    pub url: String,
}
