use axum::http::header;
use axum::{Json, response::IntoResponse};
use osb_domain::constants::SYSTEM_TAG;
use serde::Serialize;
use std::sync::LazyLock;
use std::time::Instant;
use utoipa::ToSchema;

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Status
    pub status: &'static str,
    /// Version
    pub version: &'static str,
    /// Uptime in seconds
    pub uptime: u64,
}

static START_TIME: LazyLock<Instant> = LazyLock::new(Instant::now);

/// Pins the uptime origin to router construction instead of the first probe.
pub(super) fn mark_started() {
    LazyLock::force(&START_TIME);
}

#[allow(clippy::unused_async)]
#[utoipa::path(
    get,
    path = "/health",
    responses((status = OK, description = "Liveness probe, never authenticated", body = HealthResponse)),
    tag = SYSTEM_TAG,
)]
pub(super) async fn health_handler() -> impl IntoResponse {
    let body = HealthResponse {
        status: "up",
        version: env!("CARGO_PKG_VERSION"),
        uptime: START_TIME.elapsed().as_secs(),
    };

    (
        [
            (header::CACHE_CONTROL, "no-store, no-cache, must-revalidate"),
            (header::PRAGMA, "no-cache"),
        ],
        Json(body),
    )
}
