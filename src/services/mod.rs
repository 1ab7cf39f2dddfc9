//! Business logic services.
//!
//! Services own the JSON documents and the rules around them. Handlers only
//! parse requests, call into a service and shape the response.

pub mod counters_service;
pub mod credentials;
pub mod device_service;
pub mod notify_service;
pub mod review_service;
pub mod session;
pub mod settings_service;
pub mod totp;
pub mod two_factor;
pub mod upload_service;
