//! Liveness and readiness checks for load balancers

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;

const SERVICE_NAME: &str = "fieldreserve";

/// Check result
#[derive(Serialize, ToSchema)]
pub struct StatusReport {
    /// `healthy` for liveness, `ready` once the database answers
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    /// Set by the readiness check only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<&'static str>,
    pub checked_at: DateTime<Utc>,
}

impl StatusReport {
    fn new(status: &'static str, database: Option<&'static str>) -> Self {
        Self {
            status,
            service: SERVICE_NAME,
            version: env!("CARGO_PKG_VERSION"),
            database,
            checked_at: Utc::now(),
        }
    }
}

/// Process is up; does not touch the database
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Process alive", body = StatusReport)
    )
)]
pub async fn health_check() -> Json<StatusReport> {
    Json(StatusReport::new("healthy", None))
}

/// Bookings can be served: the database pool answers `SELECT 1`
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Database reachable", body = StatusReport),
        (status = 500, description = "Database unreachable", body = crate::error::ErrorResponse)
    )
)]
pub async fn readiness_check(State(state): State<crate::AppState>) -> AppResult<Json<StatusReport>> {
    state.services.ping().await?;
    Ok(Json(StatusReport::new("ready", Some("reachable"))))
}
