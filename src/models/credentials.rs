//! Admin credential record (`admin.json`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Single admin's credentials.
///
/// Only `totp_secret` (a confirmed secret) gates login. `totp_pending_secret`
/// exists between generating a QR code and confirming it with a valid code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    /// bcrypt hash; empty until the first password change
    #[serde(default)]
    pub password_hash: String,

    /// Confirmed TOTP secret (base32)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub totp_secret: Option<String>,

    /// Generated but not yet confirmed TOTP secret (base32)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub totp_pending_secret: Option<String>,
}

impl CredentialRecord {
    /// Build a record from whatever JSON is on disk.
    ///
    /// Non-string fields and blank strings are treated as absent.
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Self {
            password_hash: text("passwordHash").unwrap_or_default(),
            totp_secret: text("totpSecret"),
            totp_pending_secret: text("totpPendingSecret"),
        }
    }

    pub fn has_hash(&self) -> bool {
        !self.password_hash.is_empty()
    }

    pub fn two_factor_enabled(&self) -> bool {
        self.totp_secret.is_some()
    }
}
