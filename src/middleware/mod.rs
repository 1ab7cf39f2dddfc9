//! HTTP middleware components.
//!
//! Middleware run before route handlers and can short-circuit a request
//! (for example, rejecting one without a valid admin session).

/// Admin session middleware
pub mod auth;
