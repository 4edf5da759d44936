//! Field endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        field::{CreateField, Field, FieldQuery, FieldWithCategory, UpdateField},
        pagination::PaginatedResponse,
    },
};

use super::AuthenticatedUser;

/// List fields with optional category filter and search
#[utoipa::path(
    get,
    path = "/fields",
    tag = "fields",
    security(("bearer_auth" = [])),
    params(FieldQuery),
    responses(
        (status = 200, description = "List of fields", body = PaginatedResponse<FieldWithCategory>)
    )
)]
pub async fn list_fields(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<FieldQuery>,
) -> AppResult<Json<PaginatedResponse<FieldWithCategory>>> {
    let (fields, total, page) = state.services.fields.list(&query).await?;
    Ok(Json(PaginatedResponse::new(fields, total, page)))
}

/// Get a field with its category
#[utoipa::path(
    get,
    path = "/fields/{id}",
    tag = "fields",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Field ID")),
    responses(
        (status = 200, description = "Field", body = FieldWithCategory),
        (status = 404, description = "Field not found")
    )
)]
pub async fn get_field(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<FieldWithCategory>> {
    Ok(Json(state.services.fields.get(id).await?))
}

/// Create a field (admin)
#[utoipa::path(
    post,
    path = "/fields",
    tag = "fields",
    security(("bearer_auth" = [])),
    request_body = CreateField,
    responses(
        (status = 201, description = "Field created", body = Field),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn create_field(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateField>,
) -> AppResult<(StatusCode, Json<Field>)> {
    claims.require_admin()?;

    let field = state.services.fields.create(data).await?;
    Ok((StatusCode::CREATED, Json(field)))
}

/// Update a field (admin)
#[utoipa::path(
    put,
    path = "/fields/{id}",
    tag = "fields",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Field ID")),
    request_body = UpdateField,
    responses(
        (status = 200, description = "Field updated", body = Field),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Field not found")
    )
)]
pub async fn update_field(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateField>,
) -> AppResult<Json<Field>> {
    claims.require_admin()?;

    Ok(Json(state.services.fields.update(id, data).await?))
}

/// Delete a field (admin)
#[utoipa::path(
    delete,
    path = "/fields/{id}",
    tag = "fields",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Field ID")),
    responses(
        (status = 204, description = "Field deleted"),
        (status = 404, description = "Field not found"),
        (status = 409, description = "Field still has bookings")
    )
)]
pub async fn delete_field(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.fields.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
