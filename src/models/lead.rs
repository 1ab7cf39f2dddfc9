//! Call-back request submitted from the public form.

use serde_json::Value;

use crate::extract::text_field;

/// Minimum phone length, in characters, after trimming.
pub const MIN_PHONE_CHARS: usize = 6;

/// A customer asking to be called back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadRequest {
    pub name: String,
    pub phone: String,
    /// Appliance model
    pub model: String,
    pub problem: String,
}

impl LeadRequest {
    pub fn from_value(body: &Value) -> Self {
        let clean = |key: &str| text_field(body, key).trim().to_string();
        Self {
            name: clean("name"),
            phone: clean("phone"),
            model: clean("model"),
            problem: clean("problem"),
        }
    }

    pub fn has_valid_phone(&self) -> bool {
        self.phone.chars().count() >= MIN_PHONE_CHARS
    }
}
