//! Admin login audit log (`admin-devices.json`).

use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::models::device::DeviceEntry;
use crate::storage::{SharedStore, save_json};

pub const DEVICES_DOC: &str = "admin-devices.json";

pub struct DeviceLog {
    docs: SharedStore,
    lock: Mutex<()>,
}

impl DeviceLog {
    pub fn new(docs: SharedStore) -> Self {
        Self {
            docs,
            lock: Mutex::new(()),
        }
    }

    /// Stored entries in file order. Any read or parse failure is an empty log.
    async fn read_all(&self) -> Vec<DeviceEntry> {
        let raw = match self.docs.load(DEVICES_DOC).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read device log");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(items)) => items.iter().map(DeviceEntry::from_value).collect(),
            Ok(_) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "device log is corrupt; starting over");
                Vec::new()
            }
        }
    }

    /// Count a login from this IP and user agent.
    pub async fn record_login(
        &self,
        ip: &str,
        user_agent: &str,
        now_millis: i64,
    ) -> Result<DeviceEntry, AppError> {
        let id = DeviceEntry::fingerprint(ip, user_agent);

        let _guard = self.lock.lock().await;
        let mut entries = self.read_all().await;

        let entry = match entries.iter_mut().find(|e| e.id == id) {
            Some(existing) => {
                existing.ip = ip.to_string();
                existing.user_agent = user_agent.to_string();
                existing.last_login_at = now_millis;
                existing.logins += 1;
                existing.clone()
            }
            None => {
                let entry = DeviceEntry {
                    id,
                    ip: ip.to_string(),
                    user_agent: user_agent.to_string(),
                    last_login_at: now_millis,
                    first_seen_at: now_millis,
                    logins: 1,
                };
                entries.push(entry.clone());
                entry
            }
        };

        save_json(self.docs.as_ref(), DEVICES_DOC, &entries).await?;
        Ok(entry)
    }

    /// Entries, most recent login first.
    pub async fn list(&self) -> Vec<DeviceEntry> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_all().await;
        entries.sort_by(|a, b| b.last_login_at.cmp(&a.last_login_at));
        entries
    }
}
