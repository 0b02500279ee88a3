//! Liveness endpoint for the webring server.
//!
//! Member sites sometimes point uptime monitors at the ring host before
//! embedding the widget, so this answers without touching the store.

use axum::http::StatusCode;

/// `GET /health` — 200 with a plain-text body whenever the process is up.
///
/// Deliberately store-free: a wedged SQLite file should show up as failing
/// ring endpoints, not as a dead process.
pub async fn health_handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, "webring is up")
}
