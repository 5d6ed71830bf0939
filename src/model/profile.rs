use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_NAME: &str = "Hotdog Enthusiast";
pub const DEFAULT_TITLE: &str = "Novice Wiener Spotter";
pub const RECENT_STORY_LIMIT: usize = 5;

pub const NOVICE_DETECTIVE: &str = "Novice Detective";
pub const MUSTARD_MASTER: &str = "Mustard Master";
pub const IMPOSTER_HUNTER: &str = "Imposter Hunter";

const NOVICE_DETECTIVE_TOTAL: u64 = 10;
const MUSTARD_MASTER_HOTDOGS: u64 = 5;
const IMPOSTER_HUNTER_MISSES: u64 = 5;

const MAX_NAME_CHARS: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentStory {
    pub is_hotdog: bool,
    pub story: String,
    /// RFC 3339, UTC.
    pub timestamp: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub hotdogs_detected: u64,
    #[serde(default)]
    pub not_hotdogs_detected: u64,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub recent_stories: Vec<RecentStory>,
    pub created_ts: i64,
    pub updated_ts: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl Profile {
    pub fn new_default(user_id: &str, email: Option<&str>, now: DateTime<Utc>) -> Self {
        let name = email
            .and_then(|e| e.split('@').next())
            .map(str::trim)
            .filter(|local| !local.is_empty())
            .unwrap_or(DEFAULT_NAME)
            .to_string();

        Self {
            id: user_id.to_string(),
            name,
            title: DEFAULT_TITLE.to_string(),
            hotdogs_detected: 0,
            not_hotdogs_detected: 0,
            achievements: Vec::new(),
            recent_stories: Vec::new(),
            created_ts: now.timestamp(),
            updated_ts: now.timestamp(),
        }
    }

    pub fn total_detections(&self) -> u64 {
        self.hotdogs_detected + self.not_hotdogs_detected
    }

    /// Counts one detection, keeps the newest stories, and returns any
    /// achievements unlocked by this detection.
    pub fn record_detection(
        &mut self,
        is_hotdog: bool,
        story: String,
        image_url: Option<String>,
        now: DateTime<Utc>,
    ) -> Vec<String> {
        if is_hotdog {
            self.hotdogs_detected += 1;
        } else {
            self.not_hotdogs_detected += 1;
        }

        self.recent_stories.push(RecentStory {
            is_hotdog,
            story,
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            image_url,
        });
        if self.recent_stories.len() > RECENT_STORY_LIMIT {
            let excess = self.recent_stories.len() - RECENT_STORY_LIMIT;
            self.recent_stories.drain(..excess);
        }

        self.updated_ts = now.timestamp();
        self.award_achievements()
    }

    fn award_achievements(&mut self) -> Vec<String> {
        let earned = [
            (
                NOVICE_DETECTIVE,
                self.total_detections() >= NOVICE_DETECTIVE_TOTAL,
            ),
            (
                MUSTARD_MASTER,
                self.hotdogs_detected >= MUSTARD_MASTER_HOTDOGS,
            ),
            (
                IMPOSTER_HUNTER,
                self.not_hotdogs_detected >= IMPOSTER_HUNTER_MISSES,
            ),
        ];

        let mut unlocked = Vec::new();
        for (name, reached) in earned {
            if reached && !self.achievements.iter().any(|a| a == name) {
                self.achievements.push(name.to_string());
                unlocked.push(name.to_string());
            }
        }
        unlocked
    }

    /// Expects an update already passed through [`ProfileUpdate::validated`].
    pub fn apply_update(&mut self, update: ProfileUpdate, now: DateTime<Utc>) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(title) = update.title {
            self.title = title;
        }
        self.updated_ts = now.timestamp();
    }
}

impl ProfileUpdate {
    /// Trims both fields and rejects blank or oversized values.
    pub fn validated(self) -> Result<Self, String> {
        Ok(Self {
            name: self.name.map(|n| clean_field("name", &n)).transpose()?,
            title: self.title.map(|t| clean_field("title", &t)).transpose()?,
        })
    }
}

fn clean_field(field: &str, raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    if trimmed.chars().count() > MAX_NAME_CHARS {
        return Err(format!("{field} must be at most {MAX_NAME_CHARS} characters"));
    }
    Ok(trimmed.to_string())
}
