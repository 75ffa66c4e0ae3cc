//! Settings service

use chrono::{DateTime, Utc};
use tracing::info;

use crate::db::RemoteDb;
use crate::error::{Error, Result};
use crate::models::{SettingsUpdate, UserSettings};

#[derive(Debug, Clone)]
pub struct SettingsService {
    db: RemoteDb,
}

impl SettingsService {
    pub fn new(db: RemoteDb) -> Self {
        Self { db }
    }

    /// Stored settings with defaults for anything unset
    pub async fn get(&self, user_id: &str) -> Result<UserSettings> {
        let settings = self.db.get_settings(user_id).await?.unwrap_or_else(|| UserSettings {
            user_id: Some(user_id.to_string()),
            ..Default::default()
        });
        Ok(settings.with_defaults())
    }

    /// Apply `update` and stamp `updated_at`; an empty update writes nothing
    pub async fn update(
        &self,
        user_id: &str,
        update: &SettingsUpdate,
        now: DateTime<Utc>,
    ) -> Result<UserSettings> {
        update.validate()?;
        if update.is_empty() {
            return self.get(user_id).await;
        }

        let settings = self
            .db
            .update_settings(user_id, update, now)
            .await?
            .ok_or_else(|| Error::NotFound(format!("settings for user {}", user_id)))?;
        info!("Updated settings for user {}", user_id);
        Ok(settings.with_defaults())
    }
}
