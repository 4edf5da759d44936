//! Schedule endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::schedule::{CreateSchedule, ScheduleResponse, UpdateSchedule},
};

use super::AuthenticatedUser;

/// List every schedule (admin)
#[utoipa::path(
    get,
    path = "/schedules",
    tag = "schedules",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All schedules", body = Vec<ScheduleResponse>),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn list_schedules(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<ScheduleResponse>>> {
    claims.require_admin()?;

    let schedules = state.services.schedules.list_all().await?;
    Ok(Json(schedules.into_iter().map(ScheduleResponse::from).collect()))
}

/// List the weekly schedule of one field
#[utoipa::path(
    get,
    path = "/fields/{id}/schedules",
    tag = "schedules",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Field ID")),
    responses(
        (status = 200, description = "Field schedules", body = Vec<ScheduleResponse>),
        (status = 404, description = "Field not found")
    )
)]
pub async fn list_field_schedules(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(field_id): Path<Uuid>,
) -> AppResult<Json<Vec<ScheduleResponse>>> {
    let schedules = state.services.schedules.list_by_field(field_id).await?;
    Ok(Json(schedules.into_iter().map(ScheduleResponse::from).collect()))
}

/// Get a schedule
#[utoipa::path(
    get,
    path = "/schedules/{id}",
    tag = "schedules",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Schedule ID")),
    responses(
        (status = 200, description = "Schedule", body = ScheduleResponse),
        (status = 404, description = "Schedule not found")
    )
)]
pub async fn get_schedule(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ScheduleResponse>> {
    let schedule = state.services.schedules.get(id).await?;
    Ok(Json(schedule.into()))
}

/// Create a schedule (admin)
#[utoipa::path(
    post,
    path = "/schedules",
    tag = "schedules",
    security(("bearer_auth" = [])),
    request_body = CreateSchedule,
    responses(
        (status = 201, description = "Schedule created", body = ScheduleResponse),
        (status = 400, description = "Invalid day or time window"),
        (status = 404, description = "Field not found"),
        (status = 409, description = "Field already has a schedule for this day")
    )
)]
pub async fn create_schedule(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateSchedule>,
) -> AppResult<(StatusCode, Json<ScheduleResponse>)> {
    claims.require_admin()?;

    let schedule = state.services.schedules.create(data).await?;
    Ok((StatusCode::CREATED, Json(schedule.into())))
}

/// Update a schedule (admin)
#[utoipa::path(
    put,
    path = "/schedules/{id}",
    tag = "schedules",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Schedule ID")),
    request_body = UpdateSchedule,
    responses(
        (status = 200, description = "Schedule updated", body = ScheduleResponse),
        (status = 400, description = "Invalid day or time window"),
        (status = 404, description = "Schedule not found")
    )
)]
pub async fn update_schedule(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateSchedule>,
) -> AppResult<Json<ScheduleResponse>> {
    claims.require_admin()?;

    let schedule = state.services.schedules.update(id, data).await?;
    Ok(Json(schedule.into()))
}

/// Delete a schedule (admin)
#[utoipa::path(
    delete,
    path = "/schedules/{id}",
    tag = "schedules",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Schedule ID")),
    responses(
        (status = 204, description = "Schedule deleted"),
        (status = 404, description = "Schedule not found")
    )
)]
pub async fn delete_schedule(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.schedules.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
