//! Label detection through the Google Cloud Vision REST API.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{classifier::LabelObservation, config::VisionConfig};

const MAX_LABELS: u32 = 20;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CREDENTIAL_CHECK_IMAGE: &str =
    "https://cloud.google.com/vision/docs/images/bicycle_example.png";

/// Where the provider should read the image from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Publicly reachable URL, fetched by the provider.
    Uri(String),
    /// Raw bytes sent inline.
    Bytes(Vec<u8>),
}

// --- images:annotate wire format ---

#[derive(Serialize)]
struct AnnotateRequest {
    requests: Vec<AnnotateImageRequest>,
}

#[derive(Serialize)]
struct AnnotateImageRequest {
    image: WireImage,
    features: Vec<Feature>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireImage {
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<WireImageSource>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireImageSource {
    image_uri: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
    max_results: u32,
}

#[derive(Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    label_annotations: Vec<WireLabel>,
    #[serde(default)]
    error: Option<WireStatus>,
}

#[derive(Deserialize)]
struct WireLabel {
    #[serde(default)]
    description: String,
    #[serde(default)]
    score: f64,
}

#[derive(Deserialize)]
struct WireStatus {
    #[serde(default)]
    message: String,
}

impl AnnotateRequest {
    fn labels_for(image: ImageSource) -> Self {
        let image = match image {
            ImageSource::Uri(uri) => WireImage {
                content: None,
                source: Some(WireImageSource { image_uri: uri }),
            },
            ImageSource::Bytes(bytes) => WireImage {
                content: Some(STANDARD.encode(bytes)),
                source: None,
            },
        };

        Self {
            requests: vec![AnnotateImageRequest {
                image,
                features: vec![Feature {
                    kind: "LABEL_DETECTION",
                    max_results: MAX_LABELS,
                }],
            }],
        }
    }
}

fn labels_from_response(response: AnnotateResponse) -> Result<Vec<LabelObservation>> {
    let Some(first) = response.responses.into_iter().next() else {
        return Ok(Vec::new());
    };

    if let Some(status) = first.error {
        return Err(anyhow!("vision_error: {}", status.message));
    }

    Ok(first
        .label_annotations
        .into_iter()
        .map(|l| LabelObservation::new(l.description, l.score))
        .collect())
}

#[derive(Clone)]
pub struct VisionClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl VisionClient {
    pub fn new(config: &VisionConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build vision http client")?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    pub async fn detect_labels(&self, image: ImageSource) -> Result<Vec<LabelObservation>> {
        let url = format!("{}/v1/images:annotate", self.endpoint);
        let body = AnnotateRequest::labels_for(image);

        let response = self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .context("vision request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("vision_error: {status}: {text}"));
        }

        let parsed: AnnotateResponse = response
            .json()
            .await
            .context("invalid vision response")?;
        let labels = labels_from_response(parsed)?;
        debug!(count = labels.len(), "vision labels received");
        Ok(labels)
    }

    /// Labels a known public image; used to confirm the API key works.
    pub async fn check_credentials(&self) -> Result<Vec<String>> {
        let labels = self
            .detect_labels(ImageSource::Uri(CREDENTIAL_CHECK_IMAGE.to_string()))
            .await?;
        Ok(labels.into_iter().map(|l| l.description).collect())
    }
}
