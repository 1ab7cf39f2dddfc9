//! Time-based one-time codes (RFC 6238).
//!
//! HMAC-SHA1, 30 second steps, 6 digits: the parameters every authenticator
//! app assumes when scanning an `otpauth://` URI without extra options.

use base64::Engine;
use data_encoding::BASE32_NOPAD;
use hmac::{Hmac, Mac};
use qrcode::QrCode;
use qrcode::render::svg;
use sha1::Sha1;
use subtle::ConstantTimeEq;

use crate::error::AppError;

type HmacSha1 = Hmac<Sha1>;

pub const STEP_SECS: i64 = 30;
pub const DIGITS: usize = 6;
/// Accepted drift, in steps, on either side of the current one.
pub const WINDOW: i64 = 1;
/// 160-bit secrets, as RFC 4226 recommends for SHA-1.
pub const SECRET_BYTES: usize = 20;

/// New random secret, base32 without padding.
pub fn generate_secret() -> String {
    let bytes: [u8; SECRET_BYTES] = rand::random();
    BASE32_NOPAD.encode(&bytes)
}

fn decode_secret(secret: &str) -> Option<Vec<u8>> {
    let normalized: String = secret
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '=')
        .map(|c| c.to_ascii_uppercase())
        .collect();
    BASE32_NOPAD
        .decode(normalized.as_bytes())
        .ok()
        .filter(|key| !key.is_empty())
}

fn hotp(key: &[u8], counter: u64) -> String {
    let mut mac = HmacSha1::new_from_slice(key).expect("HMAC key length is valid");
    mac.update(&counter.to_be_bytes());
    let digest = mac.finalize().into_bytes();

    let offset = (digest[digest.len() - 1] & 0x0f) as usize;
    let binary = (u32::from(digest[offset] & 0x7f) << 24)
        | (u32::from(digest[offset + 1]) << 16)
        | (u32::from(digest[offset + 2]) << 8)
        | u32::from(digest[offset + 3]);

    format!("{:0width$}", binary % 10u32.pow(DIGITS as u32), width = DIGITS)
}

/// The code for `unix_secs`, or `None` if the secret is not valid base32.
pub fn code_at(secret: &str, unix_secs: i64) -> Option<String> {
    let key = decode_secret(secret)?;
    let counter = u64::try_from(unix_secs.div_euclid(STEP_SECS)).ok()?;
    Some(hotp(&key, counter))
}

pub fn current_code(secret: &str) -> Option<String> {
    code_at(secret, chrono::Utc::now().timestamp())
}

/// Check `code` against the steps within [`WINDOW`] of `unix_secs`.
pub fn verify_at(secret: &str, code: &str, unix_secs: i64) -> bool {
    if code.len() != DIGITS || !code.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let Some(key) = decode_secret(secret) else {
        return false;
    };

    let step = unix_secs.div_euclid(STEP_SECS);
    (-WINDOW..=WINDOW).any(|drift| {
        u64::try_from(step + drift)
            .map(|counter| bool::from(hotp(&key, counter).as_bytes().ct_eq(code.as_bytes())))
            .unwrap_or(false)
    })
}

pub fn verify(secret: &str, code: &str) -> bool {
    verify_at(secret, code, chrono::Utc::now().timestamp())
}

/// `otpauth://` URI for authenticator apps.
///
/// The account name shown in the app is `"<issuer> (<label>)"`.
pub fn provisioning_uri(secret: &str, issuer: &str, label: &str) -> String {
    let account = format!("{issuer} ({label})");
    format!(
        "otpauth://totp/{}?secret={}&issuer={}",
        urlencoding::encode(&account),
        secret,
        urlencoding::encode(issuer)
    )
}

/// Render `uri` as a QR code, returned as an SVG data URL.
pub fn qr_data_url(uri: &str) -> Result<String, AppError> {
    let code = QrCode::new(uri.as_bytes())
        .map_err(|e| AppError::Internal(format!("QR encoding failed: {e}")))?;
    let image = code
        .render()
        .min_dimensions(200, 200)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build();

    let encoded = base64::engine::general_purpose::STANDARD.encode(image.as_bytes());
    Ok(format!("data:image/svg+xml;base64,{encoded}"))
}
