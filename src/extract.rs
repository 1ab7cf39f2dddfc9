//! Request extractors and loose JSON field access.
//!
//! Admin and public forms post loosely-shaped JSON. A missing or unparsable
//! body must reach the handler as "no fields" rather than being rejected by
//! axum before our error codes can be applied.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde_json::Value;

/// JSON body that never rejects.
///
/// Holds `Value::Null` when the body is empty or not valid JSON.
#[derive(Debug, Clone)]
pub struct LenientJson(pub Value);

impl<S> FromRequest<S> for LenientJson
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let value = match Bytes::from_request(req, state).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or(Value::Null),
            Err(_) => Value::Null,
        };
        Ok(LenientJson(value))
    }
}

/// The field as a string, only when it is a JSON string.
pub fn string_field(body: &Value, key: &str) -> Option<String> {
    body.get(key).and_then(Value::as_str).map(str::to_string)
}

/// The field coerced to text: strings as-is, numbers and booleans printed,
/// anything else (including absence) empty.
pub fn text_field(body: &Value, key: &str) -> String {
    body.get(key).map(coerce_text).unwrap_or_default()
}

pub fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// One-time codes are typed with spaces ("123 456"); strip all whitespace.
pub fn code_field(body: &Value, key: &str) -> String {
    text_field(body, key)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}
