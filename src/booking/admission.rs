//! Booking admission pipeline

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use uuid::Uuid;

use super::{BookingEngine, BookingError, StoreError, LEAD_TIME_HOURS, PAYMENT_TOLERANCE};
use crate::models::booking::{Booking, BookingStatus, CreateBooking};
use crate::models::schedule::{parse_clock_time, weekday_index};

/// Combine a local date and wall-clock time in `tz`.
///
/// Times skipped by a DST jump do not exist; repeated ones resolve to the
/// earlier instant.
fn localize(tz: Tz, date: NaiveDate, time: NaiveTime) -> Result<DateTime<Tz>, BookingError> {
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .ok_or(BookingError::InvalidTimeFormat)
}

impl BookingEngine {
    /// Validate a booking request and persist it on success.
    ///
    /// The new booking is `waiting_verification` when a proof is attached,
    /// `pending` otherwise.
    pub async fn admit(&self, user_id: Uuid, request: CreateBooking) -> Result<Booking, BookingError> {
        let field_id = Uuid::parse_str(request.field_id.trim())
            .map_err(|_| BookingError::InvalidIdentifier(request.field_id.clone()))?;

        let tz = self.clock.timezone();
        let booking_date = NaiveDate::parse_from_str(request.booking_date.trim(), "%Y-%m-%d")
            .map_err(|_| BookingError::InvalidDateFormat)?;
        let start_clock = parse_clock_time(&request.start_time).ok_or(BookingError::InvalidTimeFormat)?;
        let end_clock = parse_clock_time(&request.end_time).ok_or(BookingError::InvalidTimeFormat)?;
        let start = localize(tz, booking_date, start_clock)?;
        let end = localize(tz, booking_date, end_clock)?;

        let now = self.clock.now();
        if start < now + Duration::hours(LEAD_TIME_HOURS) {
            tracing::debug!(%field_id, start = %start, now = %now, "Booking rejected: too soon");
            return Err(BookingError::TooSoon);
        }

        if end <= start {
            return Err(BookingError::InvalidTimeRange);
        }

        let pricing = self
            .fields
            .field_pricing(field_id)
            .await
            .map_err(|e| BookingError::LookupFailed(e.to_string()))?
            .filter(|p| p.is_active)
            .ok_or(BookingError::FieldNotFound)?;

        let hours = (end - start).num_seconds() as f64 / 3600.0;
        let expected = f64::from(pricing.hourly_price) * hours;
        if (request.total_payment - expected).abs() > PAYMENT_TOLERANCE {
            return Err(BookingError::InvalidTotalPayment {
                declared: request.total_payment,
                expected,
            });
        }

        let weekday = weekday_index(booking_date);
        let hours_window = self
            .schedules
            .schedule_for(field_id, weekday)
            .await
            .map_err(|e| BookingError::LookupFailed(e.to_string()))?
            .ok_or(BookingError::ScheduleNotFound)?;
        if start_clock < hours_window.open || end_clock > hours_window.close {
            return Err(BookingError::OutsideOperatingHours);
        }

        let start_utc = start.with_timezone(&Utc);
        let end_utc = end.with_timezone(&Utc);
        let overlapping = self
            .bookings
            .has_overlap(field_id, booking_date, start_utc, end_utc)
            .await
            .map_err(|e| BookingError::OverlapCheckFailed(e.to_string()))?;
        if overlapping {
            return Err(BookingError::BookingOverlap);
        }

        let now_utc = now.with_timezone(&Utc);
        let (status, proof_payment, payment_uploaded_at) = match request.proof {
            Some(ref proof) => {
                let reference = self
                    .assets
                    .store(&proof.file_name, &proof.bytes)
                    .await
                    .map_err(|e| BookingError::ProofStorageFailed(e.to_string()))?;
                (BookingStatus::WaitingVerification, Some(reference), Some(now_utc))
            }
            None => (BookingStatus::Pending, None, None),
        };

        let booking = Booking {
            booking_id: Uuid::new_v4(),
            user_id,
            field_id,
            payment_method: request.payment_method,
            booking_date,
            start_time: start_utc,
            end_time: end_utc,
            total_payment: request.total_payment,
            status,
            proof_payment,
            payment_uploaded_at,
            payment_verified_at: None,
            cancelled_at: None,
            created_at: now_utc,
            updated_at: None,
        };

        if let Err(err) = self.bookings.insert(&booking).await {
            if let Some(ref reference) = booking.proof_payment {
                if let Err(cleanup) = self.assets.remove(reference).await {
                    tracing::warn!(reference = %reference, error = %cleanup, "Failed to remove orphaned payment proof");
                }
            }
            return Err(match err {
                StoreError::Overlap => BookingError::BookingOverlap,
                other => BookingError::CreateFailed(other.to_string()),
            });
        }

        tracing::info!(
            booking_id = %booking.booking_id,
            %user_id,
            %field_id,
            status = %booking.status,
            "Booking admitted"
        );

        Ok(booking)
    }
}
