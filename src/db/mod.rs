use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rocksdb::{Options, DB};
use tokio::sync::Mutex;

use crate::model::profile::{Profile, ProfileUpdate};

pub struct DBLayer {
    db: DB,
    // Serializes read-modify-write cycles on profiles.
    write_lock: Mutex<()>,
}

/// Result of counting one detection against a profile.
#[derive(Debug, Clone)]
pub struct DetectionRecord {
    pub profile: Profile,
    pub unlocked: Vec<String>,
}

impl DBLayer {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path)
            .with_context(|| format!("failed to open profile db at {}", path.display()))?;
        Ok(Self {
            db,
            write_lock: Mutex::new(()),
        })
    }

    fn profile_key(user_id: &str) -> String {
        format!("profile:{user_id}")
    }

    // ============================================================
    // PROFILE STORAGE
    // ============================================================
    pub async fn save_profile(&self, profile: &Profile) -> Result<()> {
        let key = Self::profile_key(&profile.id);
        let val = serde_json::to_vec(profile)?;
        self.db.put(key, val)?;
        Ok(())
    }

    pub async fn load_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        let key = Self::profile_key(user_id);
        self.db
            .get(key)?
            .map(|v| serde_json::from_slice(&v))
            .transpose()
            .with_context(|| format!("corrupt profile record for {user_id}"))
    }

    pub async fn delete_profile(&self, user_id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.db.delete(Self::profile_key(user_id))?;
        Ok(())
    }

    /// Load the user's profile, creating the default one on first sight.
    pub async fn ensure_profile(&self, user_id: &str, email: Option<&str>) -> Result<Profile> {
        let _guard = self.write_lock.lock().await;
        self.load_or_create(user_id, email).await
    }

    pub async fn update_profile(
        &self,
        user_id: &str,
        email: Option<&str>,
        update: ProfileUpdate,
    ) -> Result<Profile> {
        let _guard = self.write_lock.lock().await;
        let mut profile = self.load_or_create(user_id, email).await?;
        profile.apply_update(update, Utc::now());
        self.save_profile(&profile).await?;
        Ok(profile)
    }

    pub async fn record_detection(
        &self,
        user_id: &str,
        email: Option<&str>,
        is_hotdog: bool,
        story: String,
        image_url: Option<String>,
    ) -> Result<DetectionRecord> {
        let _guard = self.write_lock.lock().await;
        let mut profile = self.load_or_create(user_id, email).await?;
        let unlocked = profile.record_detection(is_hotdog, story, image_url, Utc::now());
        self.save_profile(&profile).await?;
        Ok(DetectionRecord { profile, unlocked })
    }

    async fn load_or_create(&self, user_id: &str, email: Option<&str>) -> Result<Profile> {
        if let Some(existing) = self.load_profile(user_id).await? {
            return Ok(existing);
        }
        let profile = Profile::new_default(user_id, email, Utc::now());
        self.save_profile(&profile).await?;
        Ok(profile)
    }
}
