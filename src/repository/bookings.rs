//! Bookings repository, implementing the booking engine's store

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::{has_sqlstate, EXCLUSION_VIOLATION};
use crate::{
    booking::{BookingStore, StoreError},
    error::{AppError, AppResult},
    models::{
        booking::{Booking, BookingQuery, BookingStatus},
        pagination::PageRequest,
    },
};

#[derive(Clone)]
pub struct BookingsRepository {
    pool: Pool<Postgres>,
}

impl BookingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE booking_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))
    }

    /// List bookings with optional field, user and status filters
    pub async fn search(&self, query: &BookingQuery) -> AppResult<(Vec<Booking>, i64, PageRequest)> {
        let page = PageRequest::new(query.page, query.per_page);
        let status = match query.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => Some(
                s.parse::<BookingStatus>()
                    .map_err(AppError::Validation)?,
            ),
            None => None,
        };
        let filter = r#"
            WHERE ($1::uuid IS NULL OR field_id = $1)
              AND ($2::uuid IS NULL OR user_id = $2)
              AND ($3::text IS NULL OR status = $3)
        "#;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM bookings {}", filter))
            .bind(query.field_id)
            .bind(query.user_id)
            .bind(status)
            .fetch_one(&self.pool)
            .await?;

        let list_query = format!(
            "SELECT * FROM bookings {} ORDER BY created_at DESC LIMIT $4 OFFSET $5",
            filter
        );
        let bookings = sqlx::query_as::<_, Booking>(&list_query)
            .bind(query.field_id)
            .bind(query.user_id)
            .bind(status)
            .bind(page.per_page)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((bookings, total, page))
    }
}

#[async_trait]
impl BookingStore for BookingsRepository {
    async fn has_overlap(
        &self,
        field_id: Uuid,
        date: NaiveDate,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let overlapping: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM bookings
                WHERE field_id = $1
                  AND booking_date = $2
                  AND status <> 'cancelled'
                  AND start_time < $4
                  AND end_time > $3
            )
            "#,
        )
        .bind(field_id)
        .bind(date)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;
        Ok(overlapping)
    }

    async fn insert(&self, booking: &Booking) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO bookings (
                booking_id, user_id, field_id, payment_method, booking_date,
                start_time, end_time, total_payment, status, proof_payment,
                payment_uploaded_at, payment_verified_at, cancelled_at, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(booking.booking_id)
        .bind(booking.user_id)
        .bind(booking.field_id)
        .bind(&booking.payment_method)
        .bind(booking.booking_date)
        .bind(booking.start_time)
        .bind(booking.end_time)
        .bind(booking.total_payment)
        .bind(booking.status)
        .bind(&booking.proof_payment)
        .bind(booking.payment_uploaded_at)
        .bind(booking.payment_verified_at)
        .bind(booking.cancelled_at)
        .bind(booking.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if has_sqlstate(&e, EXCLUSION_VIOLATION) {
                StoreError::Overlap
            } else {
                StoreError::from(e)
            }
        })?;
        Ok(())
    }

    async fn get(&self, booking_id: Uuid) -> Result<Option<Booking>, StoreError> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE booking_id = $1")
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(booking)
    }

    async fn update(&self, booking: &Booking) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE bookings
            SET status = $2, proof_payment = $3, payment_uploaded_at = $4,
                payment_verified_at = $5, cancelled_at = $6, updated_at = $7
            WHERE booking_id = $1 AND status IN ('pending', 'waiting_verification')
            "#,
        )
        .bind(booking.booking_id)
        .bind(booking.status)
        .bind(&booking.proof_payment)
        .bind(booking.payment_uploaded_at)
        .bind(booking.payment_verified_at)
        .bind(booking.cancelled_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if has_sqlstate(&e, EXCLUSION_VIOLATION) {
                StoreError::Overlap
            } else {
                StoreError::from(e)
            }
        })?;

        // Terminal rows are never rewritten; a concurrent writer got there first
        if result.rows_affected() == 0 {
            return Err(StoreError::Stale);
        }
        Ok(())
    }
}
