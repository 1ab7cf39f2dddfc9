//! Login audit handler.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::{models::device::DeviceEntry, state::AppState};

#[derive(Debug, Serialize)]
pub struct DevicesResponse {
    pub ok: bool,
    pub items: Vec<DeviceEntry>,
}

/// Devices that have logged into the admin panel, most recent first.
///
/// # Endpoint
///
/// `GET /api/admin/devices`
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "ok": true,
///   "items": [{
///     "id": "3f2a9c0d1e4b5a6c",
///     "ip": "203.0.113.7",
///     "userAgent": "Mozilla/5.0 ...",
///     "lastLoginAt": 1700000000000,
///     "firstSeenAt": 1690000000000,
///     "logins": 4
///   }]
/// }
/// ```
pub async fn list_devices(State(state): State<AppState>) -> Json<DevicesResponse> {
    Json(DevicesResponse {
        ok: true,
        items: state.devices.list().await,
    })
}
