//! Login audit entries (`admin-devices.json`).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// A browser/IP pair that has logged into the admin panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceEntry {
    pub id: String,
    pub ip: String,
    pub user_agent: String,
    /// Milliseconds since the Unix epoch
    pub last_login_at: i64,
    pub first_seen_at: i64,
    pub logins: u64,
}

impl DeviceEntry {
    /// Stable id for an IP + user-agent pair.
    pub fn fingerprint(ip: &str, user_agent: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(ip.as_bytes());
        hasher.update(b"\n");
        hasher.update(user_agent.as_bytes());
        hex::encode(hasher.finalize())[..16].to_string()
    }

    /// Lenient read of one stored entry; missing fields become empty/zero.
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let number = |key: &str| value.get(key).and_then(Value::as_i64).unwrap_or(0);

        Self {
            id: text("id"),
            ip: text("ip"),
            user_agent: text("userAgent"),
            last_login_at: number("lastLoginAt"),
            first_seen_at: number("firstSeenAt"),
            logins: value.get("logins").and_then(Value::as_u64).unwrap_or(0),
        }
    }
}
