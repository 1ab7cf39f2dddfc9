//! Site content store.
//!
//! Reading never fails on bad data: a missing or corrupt document is replaced
//! by the defaults on disk, and a partial one is merged field by field.

use serde_json::Value;
use std::collections::HashSet;
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::models::settings::{SettingsPatch, SiteSettings};
use crate::models::upload::UPLOAD_URL_PREFIX;
use crate::storage::{SharedStore, save_json};

pub const SETTINGS_DOC: &str = "site-settings.json";

pub struct SettingsStore {
    docs: SharedStore,
    lock: Mutex<()>,
}

impl SettingsStore {
    pub fn new(docs: SharedStore) -> Self {
        Self {
            docs,
            lock: Mutex::new(()),
        }
    }

    pub async fn read(&self) -> Result<SiteSettings, AppError> {
        let _guard = self.lock.lock().await;
        self.read_unlocked().await
    }

    async fn read_unlocked(&self) -> Result<SiteSettings, AppError> {
        let raw = self.docs.load(SETTINGS_DOC).await?;

        let parsed = match raw.as_deref().map(str::trim) {
            None => None,
            Some("") => Some(Value::Object(Default::default())),
            Some(text) => match serde_json::from_str::<Value>(text) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(error = %e, "settings document is corrupt; restoring defaults");
                    None
                }
            },
        };

        match parsed {
            Some(value) => Ok(SiteSettings::reconcile(&value)),
            None => {
                let defaults = SiteSettings::default();
                save_json(self.docs.as_ref(), SETTINGS_DOC, &defaults).await?;
                Ok(defaults)
            }
        }
    }

    /// Apply a patch and persist the whole document.
    pub async fn write(&self, patch: SettingsPatch) -> Result<SiteSettings, AppError> {
        let _guard = self.lock.lock().await;
        let mut settings = self.read_unlocked().await?;
        settings.apply(patch);
        save_json(self.docs.as_ref(), SETTINGS_DOC, &settings).await?;
        tracing::info!("site settings updated");
        Ok(settings)
    }

    /// Upload URLs currently referenced by the content.
    pub async fn used_uploads(&self) -> Result<HashSet<String>, AppError> {
        Ok(self
            .read()
            .await?
            .about_photos
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| p.starts_with(UPLOAD_URL_PREFIX))
            .collect())
    }
}
