//! Analytics counter settings (`counters.json`).

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::models::counters::{Counters, MAX_CUSTOM_HTML_CHARS};
use crate::storage::{SharedStore, save_json};

pub const COUNTERS_DOC: &str = "counters.json";

static YANDEX_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4,20}$").expect("valid regex"));
static GOOGLE_TAG_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9\-_]{6,40}$").expect("valid regex"));

pub struct CountersStore {
    docs: SharedStore,
    lock: Mutex<()>,
}

impl CountersStore {
    pub fn new(docs: SharedStore) -> Self {
        Self {
            docs,
            lock: Mutex::new(()),
        }
    }

    /// Current counters; empty strings when the document is missing or unreadable.
    pub async fn read(&self) -> Counters {
        let raw = match self.docs.load(COUNTERS_DOC).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Counters::default(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read counters");
                return Counters::default();
            }
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => Counters::from_value(&value),
            Err(_) => Counters::default(),
        }
    }

    /// Replace all counters. Empty ids are allowed and switch a counter off.
    pub async fn write(&self, counters: Counters) -> Result<(), AppError> {
        validate(&counters)?;

        let _guard = self.lock.lock().await;
        save_json(self.docs.as_ref(), COUNTERS_DOC, &counters).await?;
        tracing::info!("analytics counters updated");
        Ok(())
    }
}

fn validate(counters: &Counters) -> Result<(), AppError> {
    if !counters.yandex_metrika_id.is_empty() && !YANDEX_ID.is_match(&counters.yandex_metrika_id) {
        return Err(AppError::BadYandexId);
    }
    if !counters.google_tag_id.is_empty() && !GOOGLE_TAG_ID.is_match(&counters.google_tag_id) {
        return Err(AppError::BadGoogleTagId);
    }
    if counters.custom_html.chars().count() > MAX_CUSTOM_HTML_CHARS {
        return Err(AppError::CustomHtmlTooLarge);
    }
    Ok(())
}
