//! User settings operations

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Query, RemoteDb};
use crate::error::Result;
use crate::models::{SettingsUpdate, UserSettings};

const TABLE: &str = "user_settings";

/// Patch body stamped with the modification time
#[derive(Serialize)]
struct SettingsPatch<'a> {
    #[serde(flatten)]
    update: &'a SettingsUpdate,
    updated_at: DateTime<Utc>,
}

impl RemoteDb {
    pub async fn get_settings(&self, user_id: &str) -> Result<Option<UserSettings>> {
        self.select_one(TABLE, Query::new().eq("user_id", user_id))
            .await
    }

    /// Patch the user's settings row; `None` when the user has no row
    pub async fn update_settings(
        &self,
        user_id: &str,
        update: &SettingsUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<UserSettings>> {
        let patch = SettingsPatch {
            update,
            updated_at: now,
        };
        self.update(TABLE, &Query::new().eq("user_id", user_id), &patch)
            .await
    }
}
