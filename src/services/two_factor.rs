//! Two-factor enrollment.
//!
//! States: `Disabled -> Pending -> Enabled -> Disabled`.
//! - `status_or_enroll` moves Disabled/Pending to a fresh Pending (no-op when Enabled)
//! - `confirm` promotes Pending to Enabled given a valid code
//! - `disable` returns Enabled to Disabled given the password and a valid code

use serde::Serialize;

use crate::error::AppError;
use crate::models::credentials::CredentialRecord;
use crate::services::credentials::CredentialStore;
use crate::services::totp;

/// Result of asking for the 2FA state.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TwoFactorStatus {
    Enabled {
        enabled: bool,
    },
    /// A new pending secret was stored and must be confirmed.
    Pending {
        enabled: bool,
        secret: String,
        otpauth: String,
        #[serde(rename = "qrDataUrl")]
        qr_data_url: String,
    },
}

/// Report the state, generating a pending secret unless already enabled.
///
/// Each call while not enabled replaces the pending secret.
pub async fn status_or_enroll(
    store: &CredentialStore,
    issuer: &str,
    label: &str,
) -> Result<TwoFactorStatus, AppError> {
    if store.read().await?.two_factor_enabled() {
        return Ok(TwoFactorStatus::Enabled { enabled: true });
    }

    let secret = totp::generate_secret();
    let pending = secret.clone();
    let already_enabled = store
        .update(move |record| {
            // Enabled concurrently between the read above and this write.
            if record.two_factor_enabled() {
                return Ok(true);
            }
            record.totp_pending_secret = Some(pending);
            Ok(false)
        })
        .await?;
    if already_enabled {
        return Ok(TwoFactorStatus::Enabled { enabled: true });
    }

    let otpauth = totp::provisioning_uri(&secret, issuer, label);
    let qr_data_url = totp::qr_data_url(&otpauth)?;
    tracing::info!("2FA enrollment started");

    Ok(TwoFactorStatus::Pending {
        enabled: false,
        secret,
        otpauth,
        qr_data_url,
    })
}

/// Confirm the pending secret with a code, enabling 2FA.
///
/// # Errors
///
/// - `NoPending`: no secret has been generated
/// - `BadCode`: code does not match; the pending secret is kept
pub async fn confirm(store: &CredentialStore, code: &str) -> Result<(), AppError> {
    let code = code.to_string();
    store
        .update(move |record| {
            let pending = record
                .totp_pending_secret
                .clone()
                .ok_or(AppError::NoPending)?;
            if !totp::verify(&pending, &code) {
                return Err(AppError::BadCode);
            }
            record.totp_secret = Some(pending);
            record.totp_pending_secret = None;
            Ok(())
        })
        .await?;

    tracing::info!("2FA enabled");
    Ok(())
}

/// Turn 2FA off.
///
/// # Errors
///
/// Checked in this order, each leaving the record untouched:
/// - `NotEnabled`
/// - `BadPassword`
/// - `BadCode`
pub async fn disable(store: &CredentialStore, password: &str, code: &str) -> Result<(), AppError> {
    let secret = store.read().await?.totp_secret.ok_or(AppError::NotEnabled)?;

    if !store.verify_password(password).await? {
        return Err(AppError::BadPassword);
    }
    if !totp::verify(&secret, code) {
        return Err(AppError::BadCode);
    }

    store
        .update(|record| {
            record.totp_secret = None;
            record.totp_pending_secret = None;
            Ok(())
        })
        .await?;

    tracing::info!("2FA disabled");
    Ok(())
}

/// Second-factor gate applied at login after the password matched.
pub fn check_login_code(record: &CredentialRecord, code: &str) -> Result<(), AppError> {
    let Some(secret) = &record.totp_secret else {
        return Ok(());
    };
    if code.is_empty() {
        return Err(AppError::NeedSecondFactor);
    }
    if !totp::verify(secret, code) {
        return Err(AppError::LoginBadCode);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    fn store() -> CredentialStore {
        CredentialStore::new(Arc::new(MemoryStore::new()), Some("letmein".to_string()))
            .with_bcrypt_cost(4)
    }

    fn wrong_code(secret: &str) -> String {
        let now = chrono::Utc::now().timestamp();
        let valid: Vec<String> = (-2..=2)
            .filter_map(|d| totp::code_at(secret, now + d * totp::STEP_SECS))
            .collect();
        (0..1_000_000)
            .map(|n| format!("{n:06}"))
            .find(|c| !valid.contains(c))
            .unwrap()
    }

    async fn enroll(store: &CredentialStore) -> String {
        match status_or_enroll(store, "Site", "example.org").await.unwrap() {
            TwoFactorStatus::Pending { secret, otpauth, .. } => {
                assert!(otpauth.contains(&secret));
                secret
            }
            other => panic!("expected pending, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn full_enrollment_lifecycle() {
        let store = store();
        let secret = enroll(&store).await;

        let record = store.read().await.unwrap();
        assert_eq!(record.totp_pending_secret.as_deref(), Some(secret.as_str()));
        assert!(!record.two_factor_enabled());

        confirm(&store, &totp::current_code(&secret).unwrap()).await.unwrap();

        let record = store.read().await.unwrap();
        assert_eq!(record.totp_secret.as_deref(), Some(secret.as_str()));
        assert_eq!(record.totp_pending_secret, None);

        // Generating again while enabled does not rotate the secret.
        let status = status_or_enroll(&store, "Site", "example.org").await.unwrap();
        assert!(matches!(status, TwoFactorStatus::Enabled { enabled: true }));
        assert_eq!(store.read().await.unwrap().totp_secret.as_deref(), Some(secret.as_str()));

        disable(&store, "letmein", &totp::current_code(&secret).unwrap())
            .await
            .unwrap();
        assert_eq!(store.read().await.unwrap(), CredentialRecord::default());
    }

    #[tokio::test]
    async fn confirm_without_pending_secret() {
        let err = confirm(&store(), "123456").await.unwrap_err();
        assert!(matches!(err, AppError::NoPending));
    }

    #[tokio::test]
    async fn bad_code_keeps_pending_state() {
        let store = store();
        let secret = enroll(&store).await;

        let err = confirm(&store, &wrong_code(&secret)).await.unwrap_err();
        assert!(matches!(err, AppError::BadCode));

        let record = store.read().await.unwrap();
        assert_eq!(record.totp_pending_secret.as_deref(), Some(secret.as_str()));
        assert!(!record.two_factor_enabled());
    }

    #[tokio::test]
    async fn disable_checks_password_before_code() {
        let store = store();
        let secret = enroll(&store).await;
        confirm(&store, &totp::current_code(&secret).unwrap()).await.unwrap();

        let err = disable(&store, "wrong", &wrong_code(&secret)).await.unwrap_err();
        assert!(matches!(err, AppError::BadPassword));

        let err = disable(&store, "letmein", &wrong_code(&secret)).await.unwrap_err();
        assert!(matches!(err, AppError::BadCode));

        assert!(store.read().await.unwrap().two_factor_enabled());
    }

    #[tokio::test]
    async fn disable_when_not_enabled() {
        let err = disable(&store(), "letmein", "123456").await.unwrap_err();
        assert!(matches!(err, AppError::NotEnabled));
    }

    #[test]
    fn login_gate_distinguishes_missing_and_wrong_codes() {
        let secret = totp::generate_secret();
        let record = CredentialRecord {
            password_hash: String::new(),
            totp_secret: Some(secret.clone()),
            totp_pending_secret: None,
        };

        assert!(matches!(check_login_code(&record, ""), Err(AppError::NeedSecondFactor)));
        assert!(matches!(
            check_login_code(&record, &wrong_code(&secret)),
            Err(AppError::LoginBadCode)
        ));
        assert!(check_login_code(&record, &totp::current_code(&secret).unwrap()).is_ok());

        // A pending secret alone never gates login.
        let pending_only = CredentialRecord {
            totp_secret: None,
            totp_pending_secret: Some(secret),
            ..record
        };
        assert!(check_login_code(&pending_only, "").is_ok());
    }
}
