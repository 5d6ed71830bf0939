use std::sync::Arc;

use anyhow::Result;

use crate::{
    config::AppConfig, db::DBLayer, storage::StorageService, story::StoryClient,
    vision::VisionClient,
};

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DBLayer>,
    pub storage: StorageService,
    pub vision: VisionClient,
    pub story: StoryClient,
    pub jwt_secret: String,
}

impl AppState {
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let db = Arc::new(DBLayer::new(&config.profile_db_path)?);
        let storage = StorageService::new(&config.image_storage_dir, config.max_upload_bytes)
            .await?
            .with_public_base_url(config.public_base_url.clone());
        let vision = VisionClient::new(&config.vision)?;
        let story = StoryClient::new(&config.story)?;

        Ok(Self {
            db,
            storage,
            vision,
            story,
            jwt_secret: config.jwt_secret.clone(),
        })
    }
}
