use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::entities::store_settings;
use crate::errors::ServiceError;

/// Singleton row id.
const SETTINGS_ID: &str = "default";

/// Partial update; absent fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub is_open: Option<bool>,
    pub sound_notification: Option<bool>,
    pub tts_notification: Option<bool>,
    pub whatsapp_number: Option<String>,
    pub dana_number: Option<String>,
    pub dana_account_name: Option<String>,
}

#[derive(Clone)]
pub struct SettingsService {
    db_pool: Arc<DbPool>,
}

impl SettingsService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Fetches the settings row, seeding defaults on first access.
    #[instrument(skip(self))]
    pub async fn get_or_create(&self) -> Result<store_settings::Model, ServiceError> {
        let db = &*self.db_pool;

        if let Some(settings) = store_settings::Entity::find_by_id(SETTINGS_ID).one(db).await? {
            return Ok(settings);
        }

        let settings = default_settings().insert(db).await?;
        info!("Seeded default store settings");
        Ok(settings)
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        request: UpdateSettingsRequest,
    ) -> Result<store_settings::Model, ServiceError> {
        let db = &*self.db_pool;

        let current = self.get_or_create().await?;
        let mut active: store_settings::ActiveModel = current.into();

        if let Some(is_open) = request.is_open {
            active.is_open = Set(is_open);
        }
        if let Some(sound) = request.sound_notification {
            active.sound_notification = Set(sound);
        }
        if let Some(tts) = request.tts_notification {
            active.tts_notification = Set(tts);
        }
        if let Some(whatsapp) = request.whatsapp_number {
            active.whatsapp_number = Set(whatsapp);
        }
        if let Some(dana) = request.dana_number {
            active.dana_number = Set(dana);
        }
        if let Some(name) = request.dana_account_name {
            active.dana_account_name = Set(name);
        }
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(db).await?;
        info!(is_open = updated.is_open, "Store settings updated");
        Ok(updated)
    }
}

fn default_settings() -> store_settings::ActiveModel {
    store_settings::ActiveModel {
        id: Set(SETTINGS_ID.to_string()),
        is_open: Set(true),
        sound_notification: Set(true),
        tts_notification: Set(false),
        whatsapp_number: Set("6281234567890".to_string()),
        dana_number: Set("081234567890".to_string()),
        dana_account_name: Set("TEH IMAS".to_string()),
        updated_at: Set(Some(Utc::now())),
    }
}
