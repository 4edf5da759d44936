//! Booking endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::Multipart;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{Booking, BookingDetails, BookingQuery, CreateBooking, PaymentProof, UpdateBookingStatus},
        pagination::PaginatedResponse,
    },
};

use super::AuthenticatedUser;

/// Largest accepted request body for booking creation (payment proof included)
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Multipart form accepted by booking creation
#[derive(Deserialize, ToSchema)]
pub struct CreateBookingForm {
    pub field_id: String,
    /// YYYY-MM-DD
    pub booking_date: String,
    /// HH:MM
    pub start_time: String,
    /// HH:MM
    pub end_time: String,
    pub payment_method: String,
    pub total_payment: f64,
    /// Optional proof of payment
    #[schema(value_type = Option<String>, format = Binary)]
    pub proof_payment: Option<Vec<u8>>,
}

/// Booking-history filters (own bookings)
#[derive(Debug, Default, Deserialize, utoipa::IntoParams, ToSchema)]
pub struct HistoryQuery {
    pub field_id: Option<uuid::Uuid>,
    pub status: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

fn required(value: Option<String>, name: &str) -> AppResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Validation(format!("Missing form field: {}", name)))
}

async fn read_form(mut multipart: Multipart) -> AppResult<CreateBooking> {
    let mut field_id = None;
    let mut booking_date = None;
    let mut start_time = None;
    let mut end_time = None;
    let mut payment_method = None;
    let mut total_payment = None;
    let mut proof = None;

    while let Some(part) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let name = part.name().unwrap_or_default().to_string();
        if name == "proof_payment" {
            let file_name = part.file_name().unwrap_or("proof").to_string();
            let bytes = part
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Invalid proof upload: {}", e)))?;
            if !bytes.is_empty() {
                proof = Some(PaymentProof {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            continue;
        }

        let value = part
            .text()
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid form field {}: {}", name, e)))?;
        match name.as_str() {
            "field_id" => field_id = Some(value),
            "booking_date" => booking_date = Some(value),
            "start_time" => start_time = Some(value),
            "end_time" => end_time = Some(value),
            "payment_method" => payment_method = Some(value),
            "total_payment" => total_payment = Some(value),
            _ => {}
        }
    }

    let total_payment = required(total_payment, "total_payment")?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::Validation("total_payment must be a number".to_string()))?;

    Ok(CreateBooking {
        field_id: required(field_id, "field_id")?,
        booking_date: required(booking_date, "booking_date")?,
        start_time: required(start_time, "start_time")?,
        end_time: required(end_time, "end_time")?,
        payment_method: required(payment_method, "payment_method")?,
        total_payment,
        proof,
    })
}

/// Create a booking for the authenticated user
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    security(("bearer_auth" = [])),
    request_body(content = CreateBookingForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Booking created", body = Booking),
        (status = 400, description = "Malformed identifier, date or time"),
        (status = 404, description = "Field not found"),
        (status = 409, description = "Overlaps an existing booking"),
        (status = 422, description = "Booking rule violated")
    )
)]
pub async fn create_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Booking>)> {
    let request = read_form(multipart).await?;
    let booking = state.services.bookings.create(claims.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// List all bookings (admin)
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(BookingQuery),
    responses(
        (status = 200, description = "Bookings", body = PaginatedResponse<Booking>),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn list_bookings(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<BookingQuery>,
) -> AppResult<Json<PaginatedResponse<Booking>>> {
    claims.require_admin()?;

    let (bookings, total, page) = state.services.bookings.list(&query).await?;
    Ok(Json(PaginatedResponse::new(bookings, total, page)))
}

/// Booking history of the authenticated user
#[utoipa::path(
    get,
    path = "/bookings/history",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(HistoryQuery),
    responses(
        (status = 200, description = "Own bookings", body = PaginatedResponse<Booking>)
    )
)]
pub async fn booking_history(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<PaginatedResponse<Booking>>> {
    let query = BookingQuery {
        field_id: query.field_id,
        user_id: None,
        status: query.status,
        page: query.page,
        per_page: query.per_page,
    };
    let (bookings, total, page) = state.services.bookings.history(claims.user_id, query).await?;
    Ok(Json(PaginatedResponse::new(bookings, total, page)))
}

/// Get a booking with its field and owner
#[utoipa::path(
    get,
    path = "/bookings/{id}",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking details", body = BookingDetails),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn get_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<BookingDetails>> {
    Ok(Json(state.services.bookings.get(&claims, &id).await?))
}

/// Verify or reject a payment (admin)
#[utoipa::path(
    put,
    path = "/bookings/{id}/status",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Booking ID")),
    request_body = UpdateBookingStatus,
    responses(
        (status = 200, description = "Status updated", body = Booking),
        (status = 400, description = "Unsupported target status"),
        (status = 404, description = "Booking not found"),
        (status = 422, description = "Booking already final")
    )
)]
pub async fn update_booking_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    Json(data): Json<UpdateBookingStatus>,
) -> AppResult<Json<Booking>> {
    claims.require_admin()?;

    Ok(Json(state.services.bookings.update_status(&id, &data.status).await?))
}

/// Cancel a booking (owner or admin)
#[utoipa::path(
    post,
    path = "/bookings/{id}/cancel",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking cancelled", body = Booking),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Booking not found"),
        (status = 422, description = "Too late to cancel or already final")
    )
)]
pub async fn cancel_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Booking>> {
    Ok(Json(state.services.bookings.cancel(&claims, &id).await?))
}
