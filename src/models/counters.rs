//! Analytics counter settings (`counters.json`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::extract::text_field;

/// Maximum size of the free-form HTML snippet, in characters.
pub const MAX_CUSTOM_HTML_CHARS: usize = 200_000;

/// Third-party analytics identifiers injected into public pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counters {
    pub yandex_metrika_id: String,
    pub google_tag_id: String,
    pub custom_html: String,
}

impl Counters {
    /// Read from stored or submitted JSON.
    ///
    /// Ids are trimmed; the HTML snippet is kept verbatim.
    pub fn from_value(value: &Value) -> Self {
        Self {
            yandex_metrika_id: text_field(value, "yandexMetrikaId").trim().to_string(),
            google_tag_id: text_field(value, "googleTagId").trim().to_string(),
            custom_html: text_field(value, "customHtml"),
        }
    }
}
