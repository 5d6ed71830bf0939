use std::{fmt::Display, path::PathBuf, str::FromStr};

use anyhow::{anyhow, Context, Result};
use tracing::{info, warn};

pub const DEFAULT_VISION_ENDPOINT: &str = "https://vision.googleapis.com";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_STORY_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub profile_db_path: PathBuf,
    pub image_storage_dir: PathBuf,
    pub jwt_secret: String,
    pub vision: VisionConfig,
    pub story: StoryConfig,
    pub max_upload_bytes: usize,
    /// Origin this service is reachable at, e.g. `https://hotdog.example`.
    pub public_base_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct VisionConfig {
    pub endpoint: String,
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct StoryConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl AppConfig {
    /// Reads the process environment (after loading `.env`, if any).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            bind_addr: or_default(&lookup, "BIND_ADDR", "0.0.0.0:3000"),
            profile_db_path: or_default(&lookup, "PROFILE_DB_PATH", "profiledb").into(),
            image_storage_dir: or_default(&lookup, "IMAGE_STORAGE_DIR", "uploads").into(),
            jwt_secret: required(&lookup, "JWT_SECRET")?,
            vision: VisionConfig {
                endpoint: or_default(&lookup, "GOOGLE_VISION_ENDPOINT", DEFAULT_VISION_ENDPOINT),
                api_key: required(&lookup, "GOOGLE_VISION_API_KEY")?,
            },
            story: StoryConfig {
                base_url: or_default(&lookup, "OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
                api_key: required(&lookup, "OPENAI_API_KEY")?,
                model: or_default(&lookup, "OPENAI_MODEL", DEFAULT_STORY_MODEL),
                max_tokens: parsed(&lookup, "STORY_MAX_TOKENS", 100)?,
                temperature: parsed(&lookup, "STORY_TEMPERATURE", 0.6)?,
            },
            max_upload_bytes: parsed(&lookup, "MAX_UPLOAD_BYTES", 5 * 1024 * 1024)?,
            public_base_url: lookup("PUBLIC_BASE_URL")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        })
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| anyhow!("missing required environment variable {key}"))
}

fn or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(v) => v.trim().to_string(),
        None => {
            info!("{key} not set, using default: {default}");
            default.to_string()
        }
    }
}

fn parsed<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| {
                warn!("Invalid {key} value: {e}");
                e
            })
            .with_context(|| format!("invalid value for {key}: {raw}")),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("JWT_SECRET", "s3cret"),
        ("GOOGLE_VISION_API_KEY", "vision-key"),
        ("OPENAI_API_KEY", "openai-key"),
    ];

    #[test]
    fn defaults_fill_optional_values() {
        let config = AppConfig::from_lookup(lookup_from(REQUIRED)).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.profile_db_path, PathBuf::from("profiledb"));
        assert_eq!(config.vision.endpoint, DEFAULT_VISION_ENDPOINT);
        assert_eq!(config.story.model, "gpt-4o-mini");
        assert_eq!(config.story.max_tokens, 100);
        assert!((config.story.temperature - 0.6).abs() < f32::EPSILON);
        assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
        assert_eq!(config.public_base_url, None);
    }

    #[test]
    fn overrides_are_applied() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("OPENAI_MODEL", "gpt-4o"));
        pairs.push(("STORY_MAX_TOKENS", " 250 "));
        pairs.push(("MAX_UPLOAD_BYTES", "1024"));
        pairs.push(("PUBLIC_BASE_URL", "https://hotdog.example"));
        let config = AppConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(
            config.public_base_url.as_deref(),
            Some("https://hotdog.example")
        );
        assert_eq!(config.story.model, "gpt-4o");
        assert_eq!(config.story.max_tokens, 250);
        assert_eq!(config.max_upload_bytes, 1024);
    }

    #[test]
    fn missing_secret_names_the_variable() {
        let err = AppConfig::from_lookup(lookup_from(&REQUIRED[1..])).unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn malformed_number_is_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("STORY_TEMPERATURE", "warm"));
        let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(err.to_string().contains("STORY_TEMPERATURE"));
    }
}
