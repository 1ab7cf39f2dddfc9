//! Site content document (`site-settings.json`).
//!
//! This module defines:
//! - `SiteSettings`: the singleton content record and its defaults
//! - `SettingsPatch`: a sanitized partial update from the admin form

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::extract::{coerce_text, string_field};

/// Upper bound on the number of benefit lines kept.
pub const MAX_BENEFITS: usize = 10;

/// Upper bound on the number of photo references kept.
pub const MAX_PHOTOS: usize = 50;

/// Editable site content.
///
/// List order is display order and is preserved through every edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    pub phone: String,
    pub city: String,
    pub hours: String,
    pub hero_title: String,
    pub hero_subtitle: String,
    pub lead_text: String,
    pub benefits: Vec<String>,
    pub about_title: String,
    pub about_text: String,
    /// URLs into the upload store (`/uploads/<name>`)
    pub about_photos: Vec<String>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            phone: String::new(),
            city: "Saratov".to_string(),
            hours: "9:00-21:00 daily".to_string(),
            hero_title: "Refrigerator repair at your home".to_string(),
            hero_subtitle: "Technician visit • Diagnostics • Same-day repair".to_string(),
            lead_text: "Fill in the form and your request goes straight to the technician."
                .to_string(),
            benefits: vec![
                "Serving the city and nearby districts".to_string(),
                "Honest diagnostics, price agreed before the repair".to_string(),
                "Experience, care, and a warranty on completed work".to_string(),
            ],
            about_title: "About me".to_string(),
            about_text: "I repair refrigerators and explain every fault before agreeing on a price."
                .to_string(),
            about_photos: Vec::new(),
        }
    }
}

impl SiteSettings {
    /// Merge a stored document over the defaults.
    ///
    /// Each scalar field falls back on its own when missing or not a string.
    /// Array fields fall back as a whole when not an array; inside an array,
    /// non-string elements are dropped. Unknown keys are ignored.
    pub fn reconcile(value: &Value) -> Self {
        let defaults = Self::default();
        let text = |key: &str, fallback: String| string_field(value, key).unwrap_or(fallback);
        let list = |key: &str, fallback: Vec<String>| match value.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            _ => fallback,
        };

        Self {
            phone: text("phone", defaults.phone),
            city: text("city", defaults.city),
            hours: text("hours", defaults.hours),
            hero_title: text("heroTitle", defaults.hero_title),
            hero_subtitle: text("heroSubtitle", defaults.hero_subtitle),
            lead_text: text("leadText", defaults.lead_text),
            benefits: list("benefits", defaults.benefits),
            about_title: text("aboutTitle", defaults.about_title),
            about_text: text("aboutText", defaults.about_text),
            about_photos: list("aboutPhotos", defaults.about_photos),
        }
    }

    /// Apply a patch; absent fields are left untouched.
    pub fn apply(&mut self, patch: SettingsPatch) {
        let defaults = Self::default();

        macro_rules! set {
            ($field:ident) => {
                if let Some(v) = patch.$field {
                    self.$field = v;
                }
            };
        }

        set!(phone);
        set!(city);
        set!(hours);
        set!(hero_title);
        set!(hero_subtitle);
        set!(lead_text);
        set!(about_title);
        set!(about_text);

        if let Some(benefits) = patch.benefits {
            self.benefits = if benefits.is_empty() {
                defaults.benefits
            } else {
                benefits
            };
        }
        if let Some(photos) = patch.about_photos {
            self.about_photos = if photos.is_empty() {
                defaults.about_photos
            } else {
                photos
            };
        }
    }
}

/// Partial update of [`SiteSettings`], already sanitized.
///
/// Strings are trimmed. Lists keep only non-empty trimmed entries, in order,
/// capped at [`MAX_BENEFITS`] / [`MAX_PHOTOS`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub phone: Option<String>,
    pub city: Option<String>,
    pub hours: Option<String>,
    pub hero_title: Option<String>,
    pub hero_subtitle: Option<String>,
    pub lead_text: Option<String>,
    pub benefits: Option<Vec<String>>,
    pub about_title: Option<String>,
    pub about_text: Option<String>,
    pub about_photos: Option<Vec<String>>,
}

impl SettingsPatch {
    /// Extract a patch from a loosely-typed request body.
    ///
    /// A field is part of the patch only when it has the right JSON type
    /// (string for text, array for lists).
    pub fn from_value(body: &Value) -> Self {
        let text = |key: &str| string_field(body, key).map(|s| s.trim().to_string());
        let list = |key: &str, cap: usize| match body.get(key) {
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .map(|item| coerce_text(item).trim().to_string())
                    .filter(|s| !s.is_empty())
                    .take(cap)
                    .collect(),
            ),
            _ => None,
        };

        Self {
            phone: text("phone"),
            city: text("city"),
            hours: text("hours"),
            hero_title: text("heroTitle"),
            hero_subtitle: text("heroSubtitle"),
            lead_text: text("leadText"),
            benefits: list("benefits", MAX_BENEFITS),
            about_title: text("aboutTitle"),
            about_text: text("aboutText"),
            about_photos: list("aboutPhotos", MAX_PHOTOS),
        }
    }
}
