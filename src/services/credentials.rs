//! Admin credential store.
//!
//! Owns `admin.json`: the bcrypt password hash and the TOTP secrets. Until a
//! hash has been written, the plaintext `ADMIN_PASSWORD` from the environment
//! is accepted as a bootstrap password; once a hash exists it is ignored.

use serde_json::Value;
use subtle::ConstantTimeEq;
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::models::credentials::CredentialRecord;
use crate::storage::{SharedStore, save_json};

pub const CREDENTIALS_DOC: &str = "admin.json";

/// Minimum length of a new admin password, in characters.
pub const MIN_PASSWORD_CHARS: usize = 6;

pub struct CredentialStore {
    docs: SharedStore,
    bootstrap_password: Option<String>,
    bcrypt_cost: u32,
    lock: Mutex<()>,
}

impl CredentialStore {
    pub fn new(docs: SharedStore, bootstrap_password: Option<String>) -> Self {
        Self {
            docs,
            bootstrap_password: bootstrap_password.filter(|p| !p.is_empty()),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            lock: Mutex::new(()),
        }
    }

    /// Use a cheaper bcrypt cost (tests only need the shape, not the work factor).
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Current record. A missing or unreadable document is an empty record.
    pub async fn read(&self) -> Result<CredentialRecord, AppError> {
        let Some(raw) = self.docs.load(CREDENTIALS_DOC).await? else {
            return Ok(CredentialRecord::default());
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => Ok(CredentialRecord::from_value(&value)),
            Err(e) => {
                tracing::warn!(error = %e, "credential document is not valid JSON; treating as empty");
                Ok(CredentialRecord::default())
            }
        }
    }

    /// Read-modify-write the record under the store lock.
    pub async fn update<T>(
        &self,
        apply: impl FnOnce(&mut CredentialRecord) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let _guard = self.lock.lock().await;
        let mut record = self.read().await?;
        let out = apply(&mut record)?;
        save_json(self.docs.as_ref(), CREDENTIALS_DOC, &record).await?;
        Ok(out)
    }

    /// Stored password hash, empty when none has been set.
    pub async fn read_hash(&self) -> Result<String, AppError> {
        Ok(self.read().await?.password_hash)
    }

    pub async fn write_hash(&self, hash: String) -> Result<(), AppError> {
        self.update(|record| {
            record.password_hash = hash;
            Ok(())
        })
        .await
    }

    /// Whether anyone could log in at all.
    pub async fn is_configured(&self) -> Result<bool, AppError> {
        Ok(self.read().await?.has_hash() || self.bootstrap_password.is_some())
    }

    /// Check a candidate password.
    ///
    /// With a stored hash, bcrypt decides. Without one, the bootstrap
    /// password is compared in constant time. With neither, nothing matches.
    pub async fn verify_password(&self, candidate: &str) -> Result<bool, AppError> {
        let hash = self.read_hash().await?;

        if !hash.is_empty() {
            let candidate = candidate.to_string();
            return tokio::task::spawn_blocking(move || {
                bcrypt::verify(candidate, &hash).unwrap_or(false)
            })
            .await
            .map_err(|e| AppError::Internal(format!("bcrypt task failed: {e}")));
        }

        Ok(match &self.bootstrap_password {
            Some(expected) => {
                expected.len() == candidate.len()
                    && bool::from(expected.as_bytes().ct_eq(candidate.as_bytes()))
            }
            None => false,
        })
    }

    /// Rotate the password.
    ///
    /// # Errors
    ///
    /// - `TooShort`: new password under [`MIN_PASSWORD_CHARS`] (checked first)
    /// - `BadOldPassword`: old password does not verify
    ///
    /// The caller must drop the current session afterwards.
    pub async fn change_password(&self, old: &str, new: &str) -> Result<(), AppError> {
        if new.chars().count() < MIN_PASSWORD_CHARS {
            return Err(AppError::TooShort);
        }
        if !self.verify_password(old).await? {
            return Err(AppError::BadOldPassword);
        }

        let new = new.to_string();
        let cost = self.bcrypt_cost;
        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(new, cost))
            .await
            .map_err(|e| AppError::Internal(format!("bcrypt task failed: {e}")))?
            .map_err(|e| AppError::Internal(format!("bcrypt hash failed: {e}")))?;

        self.write_hash(hash).await?;
        tracing::info!("admin password changed");
        Ok(())
    }
}
