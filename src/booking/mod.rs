//! Booking admission and lifecycle engine
//!
//! The engine decides whether a reservation request may be persisted and
//! drives existing bookings through their status lifecycle. It talks to the
//! outside world only through the ports declared here, so it can run against
//! PostgreSQL in production and against in-memory fakes in tests.

pub mod admission;
pub mod clock;
pub mod lifecycle;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::booking::Booking;

pub use clock::{parse_timezone, Clock, SystemClock};

/// Minimum notice between submission and start, in hours
pub const LEAD_TIME_HOURS: i64 = 2;
/// Minimum notice between cancellation and start, in hours
pub const CANCEL_WINDOW_HOURS: i64 = 3;
/// Accepted absolute difference between declared and expected payment
pub const PAYMENT_TOLERANCE: f64 = 1.0;

/// Pricing data the engine needs about a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPricing {
    pub hourly_price: i32,
    pub is_active: bool,
}

/// Operating window of a field on one weekday
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpeningHours {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

/// Failure reported by a persistence port
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// The write would create an overlapping live booking
    #[error("conflicting booking exists")]
    Overlap,

    /// The row was finalized by another writer since it was read
    #[error("booking already finalized")]
    Stale,

    #[error("{0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FieldCatalog: Send + Sync {
    async fn field_pricing(&self, field_id: Uuid) -> Result<Option<FieldPricing>, StoreError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScheduleLookup: Send + Sync {
    /// `weekday` uses 0=Sunday .. 6=Saturday
    async fn schedule_for(
        &self,
        field_id: Uuid,
        weekday: i16,
    ) -> Result<Option<OpeningHours>, StoreError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// True when a non-cancelled booking of `field_id` on `date` intersects
    /// the half-open range `[start, end)`
    async fn has_overlap(
        &self,
        field_id: Uuid,
        date: NaiveDate,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<bool, StoreError>;

    async fn insert(&self, booking: &Booking) -> Result<(), StoreError>;

    async fn get(&self, booking_id: Uuid) -> Result<Option<Booking>, StoreError>;

    /// Overwrite a live booking; `Stale` when the stored row is already terminal
    async fn update(&self, booking: &Booking) -> Result<(), StoreError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Persist an uploaded file and return its reference
    async fn store(&self, file_name: &str, bytes: &[u8]) -> Result<String, StoreError>;

    async fn remove(&self, reference: &str) -> Result<(), StoreError>;
}

/// Broad classification of a [`BookingError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Input,
    BusinessRule,
    NotFound,
    Dependency,
}

/// Everything admission and lifecycle operations can fail with
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BookingError {
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("invalid date format, expected YYYY-MM-DD")]
    InvalidDateFormat,

    #[error("invalid time format, expected HH:MM")]
    InvalidTimeFormat,

    #[error("booking must start at least 2 hours from now")]
    TooSoon,

    #[error("end time must be after start time")]
    InvalidTimeRange,

    #[error("field not found")]
    FieldNotFound,

    #[error("invalid total payment: declared {declared}, expected {expected}")]
    InvalidTotalPayment { declared: f64, expected: f64 },

    #[error("no schedule for this field on the requested day")]
    ScheduleNotFound,

    #[error("booking is outside the field's operating hours")]
    OutsideOperatingHours,

    #[error("the requested time overlaps an existing booking")]
    BookingOverlap,

    #[error("failed to check booking availability: {0}")]
    OverlapCheckFailed(String),

    #[error("failed to store payment proof: {0}")]
    ProofStorageFailed(String),

    #[error("failed to create booking: {0}")]
    CreateFailed(String),

    #[error("failed to load data: {0}")]
    LookupFailed(String),

    #[error("booking not found")]
    NotFound,

    #[error("booking is already in a final state")]
    AlreadyFinal,

    #[error("invalid status update: {0}")]
    InvalidStatusUpdate(String),

    #[error("bookings can only be cancelled at least 3 hours before start")]
    CancelTooLate,

    #[error("failed to update booking: {0}")]
    UpdateFailed(String),
}

impl BookingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BookingError::InvalidIdentifier(_)
            | BookingError::InvalidDateFormat
            | BookingError::InvalidTimeFormat
            | BookingError::InvalidStatusUpdate(_) => ErrorKind::Input,
            BookingError::TooSoon
            | BookingError::InvalidTimeRange
            | BookingError::InvalidTotalPayment { .. }
            | BookingError::ScheduleNotFound
            | BookingError::OutsideOperatingHours
            | BookingError::BookingOverlap
            | BookingError::AlreadyFinal
            | BookingError::CancelTooLate => ErrorKind::BusinessRule,
            BookingError::FieldNotFound | BookingError::NotFound => ErrorKind::NotFound,
            BookingError::OverlapCheckFailed(_)
            | BookingError::ProofStorageFailed(_)
            | BookingError::CreateFailed(_)
            | BookingError::LookupFailed(_)
            | BookingError::UpdateFailed(_) => ErrorKind::Dependency,
        }
    }
}

/// Admission and lifecycle engine over abstract ports
#[derive(Clone)]
pub struct BookingEngine {
    fields: Arc<dyn FieldCatalog>,
    schedules: Arc<dyn ScheduleLookup>,
    bookings: Arc<dyn BookingStore>,
    assets: Arc<dyn AssetStore>,
    clock: Arc<dyn Clock>,
}

impl BookingEngine {
    pub fn new(
        fields: Arc<dyn FieldCatalog>,
        schedules: Arc<dyn ScheduleLookup>,
        bookings: Arc<dyn BookingStore>,
        assets: Arc<dyn AssetStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            fields,
            schedules,
            bookings,
            assets,
            clock,
        }
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(BookingError::InvalidDateFormat.kind(), ErrorKind::Input);
        assert_eq!(BookingError::BookingOverlap.kind(), ErrorKind::BusinessRule);
        assert_eq!(BookingError::ScheduleNotFound.kind(), ErrorKind::BusinessRule);
        assert_eq!(BookingError::FieldNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(
            BookingError::CreateFailed("io".to_string()).kind(),
            ErrorKind::Dependency
        );
    }

    #[test]
    fn test_store_error_from_sqlx() {
        let err: StoreError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, StoreError::Backend(_)));
    }
}
