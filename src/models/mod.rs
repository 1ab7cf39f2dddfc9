//! Data models for the JSON documents and request bodies.
//!
//! Each stored document has a `from_value`/`reconcile` constructor that reads
//! field by field, so a hand-edited or truncated file degrades to defaults
//! instead of failing the request.

/// Admin password hash and TOTP secrets
pub mod credentials;
/// Analytics counter ids
pub mod counters;
/// Login audit trail
pub mod device;
/// Call-back requests
pub mod lead;
/// Customer reviews
pub mod review;
/// Site content
pub mod settings;
/// Upload limits and sweep reports
pub mod upload;
