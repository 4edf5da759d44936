//! Booking model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::field::FieldWithCategory;
use super::user::UserShort;

/// Booking lifecycle status
///
/// `Pending` and `WaitingVerification` are initial states; `Booked` and
/// `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    WaitingVerification,
    Booked,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::WaitingVerification => "waiting_verification",
            BookingStatus::Booked => "booked",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Terminal bookings accept no further mutation
    pub fn is_final(&self) -> bool {
        matches!(self, BookingStatus::Booked | BookingStatus::Cancelled)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "waiting_verification" => Ok(BookingStatus::WaitingVerification),
            "booked" => Ok(BookingStatus::Booked),
            "cancelled" => Ok(BookingStatus::Cancelled),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }
}

// SQLx conversion for BookingStatus (stored as TEXT)
impl sqlx::Type<Postgres> for BookingStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for BookingStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for BookingStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Booking record from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Booking {
    pub booking_id: Uuid,
    pub user_id: Uuid,
    pub field_id: Uuid,
    pub payment_method: String,
    /// Calendar date in the configured timezone
    pub booking_date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub total_payment: f64,
    pub status: BookingStatus,
    /// Reference returned by the asset store for the payment proof
    pub proof_payment: Option<String>,
    pub payment_uploaded_at: Option<DateTime<Utc>>,
    pub payment_verified_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Booking with its field and owner, for detail views
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookingDetails {
    #[serde(flatten)]
    pub booking: Booking,
    pub field: FieldWithCategory,
    pub user: UserShort,
}

/// Uploaded proof of payment
#[derive(Debug, Clone)]
pub struct PaymentProof {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Booking creation request, as received from the client
///
/// Date and time values are kept as raw strings; parsing them is part of
/// admission.
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub field_id: String,
    /// YYYY-MM-DD
    pub booking_date: String,
    /// HH:MM
    pub start_time: String,
    /// HH:MM
    pub end_time: String,
    pub payment_method: String,
    pub total_payment: f64,
    pub proof: Option<PaymentProof>,
}

/// Booking list filters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookingQuery {
    pub field_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    /// pending, waiting_verification, booked or cancelled
    pub status: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Status update request (admin)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBookingStatus {
    /// "booked" or "cancelled"
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!("BOOKED".parse::<BookingStatus>(), Ok(BookingStatus::Booked));
        assert_eq!(" Cancelled ".parse::<BookingStatus>(), Ok(BookingStatus::Cancelled));
        assert!("refunded".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn test_final_states() {
        assert!(!BookingStatus::Pending.is_final());
        assert!(!BookingStatus::WaitingVerification.is_final());
        assert!(BookingStatus::Booked.is_final());
        assert!(BookingStatus::Cancelled.is_final());
    }

    #[test]
    fn test_status_serializes_as_literal() {
        let json = serde_json::to_string(&BookingStatus::WaitingVerification).unwrap();
        assert_eq!(json, "\"waiting_verification\"");
    }
}
