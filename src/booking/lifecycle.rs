//! Booking status lifecycle

use chrono::{Duration, Utc};
use uuid::Uuid;

use super::{BookingEngine, BookingError, StoreError, CANCEL_WINDOW_HOURS};
use crate::models::booking::{Booking, BookingStatus};

impl BookingEngine {
    async fn load(&self, booking_id: &str) -> Result<Booking, BookingError> {
        let id = Uuid::parse_str(booking_id.trim())
            .map_err(|_| BookingError::InvalidIdentifier(booking_id.to_string()))?;
        self.bookings
            .get(id)
            .await
            .map_err(|e| BookingError::LookupFailed(e.to_string()))?
            .ok_or(BookingError::NotFound)
    }

    async fn save(&self, booking: &Booking) -> Result<(), BookingError> {
        self.bookings
            .update(booking)
            .await
            .map_err(|e| match e {
                StoreError::Stale => BookingError::AlreadyFinal,
                other => BookingError::UpdateFailed(other.to_string()),
            })
    }

    /// Move a booking into `booked` or `cancelled` (administrative decision).
    ///
    /// Only `booked` and `cancelled` are accepted as targets, case-insensitively.
    pub async fn transition(&self, booking_id: &str, new_status: &str) -> Result<Booking, BookingError> {
        let mut booking = self.load(booking_id).await?;

        let target = match new_status.parse::<BookingStatus>() {
            Ok(status) if status.is_final() => status,
            _ => return Err(BookingError::InvalidStatusUpdate(new_status.to_string())),
        };

        if booking.status.is_final() {
            return Err(BookingError::AlreadyFinal);
        }

        let now = self.clock.now().with_timezone(&Utc);
        match target {
            BookingStatus::Booked => booking.payment_verified_at = Some(now),
            _ => booking.cancelled_at = Some(now),
        }
        booking.status = target;
        booking.updated_at = Some(now);

        self.save(&booking).await?;

        tracing::info!(
            booking_id = %booking.booking_id,
            status = %booking.status,
            "Booking status updated"
        );

        Ok(booking)
    }

    /// Cancel a booking on behalf of its owner.
    ///
    /// Allowed only while at least three hours remain before the start.
    pub async fn cancel(&self, booking_id: &str) -> Result<Booking, BookingError> {
        let mut booking = self.load(booking_id).await?;

        if booking.status.is_final() {
            return Err(BookingError::AlreadyFinal);
        }

        let now = self.clock.now().with_timezone(&Utc);
        if booking.start_time - now < Duration::hours(CANCEL_WINDOW_HOURS) {
            tracing::debug!(booking_id = %booking.booking_id, "Cancellation rejected: too late");
            return Err(BookingError::CancelTooLate);
        }

        booking.status = BookingStatus::Cancelled;
        booking.cancelled_at = Some(now);
        booking.updated_at = Some(now);

        self.save(&booking).await?;

        tracing::info!(booking_id = %booking.booking_id, "Booking cancelled by user");

        Ok(booking)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{NaiveTime, TimeZone};
    use chrono_tz::Tz;
    use tokio_test::assert_ok;

    use super::*;
    use crate::booking::testing::{FixedClock, Fixture, MemoryAssets, StaticCatalog, StaticSchedules};
    use crate::booking::{BookingStore, MockBookingStore};

    const MONDAY: &str = "2025-06-09";

    async fn booked_fixture(now: &str, start: &str) -> (Fixture, Booking) {
        // Admit a day early, then move the clock for the operation under test
        let seed = Fixture::new(FixedClock::at(Tz::UTC, "2025-06-08 08:00:00"));
        let end = NaiveTime::parse_from_str(start, "%H:%M").unwrap() + Duration::hours(1);
        let booking = seed
            .engine
            .admit(seed.user_id, seed.request(MONDAY, start, &end.format("%H:%M").to_string(), 100_000.0))
            .await
            .unwrap();

        let engine = crate::booking::BookingEngine::new(
            Arc::new(StaticCatalog::default()),
            Arc::new(StaticSchedules::default()),
            seed.bookings.clone(),
            Arc::new(MemoryAssets::default()),
            Arc::new(FixedClock::at(Tz::UTC, now)),
        );
        let fx = Fixture { engine, ..seed };
        (fx, booking)
    }

    #[tokio::test]
    async fn test_verify_payment_books() {
        let (fx, booking) = booked_fixture("2025-06-09 08:00:00", "12:00").await;
        let updated = assert_ok!(
            fx.engine
                .transition(&booking.booking_id.to_string(), "BOOKED")
                .await
        );
        assert_eq!(updated.status, BookingStatus::Booked);
        assert_eq!(
            updated.payment_verified_at,
            Some(Utc.with_ymd_and_hms(2025, 6, 9, 8, 0, 0).unwrap())
        );
        assert!(updated.cancelled_at.is_none());
        assert_eq!(fx.bookings.all()[0].status, BookingStatus::Booked);
    }

    #[tokio::test]
    async fn test_reject_payment_cancels() {
        let (fx, booking) = booked_fixture("2025-06-09 08:00:00", "12:00").await;
        let updated = assert_ok!(
            fx.engine
                .transition(&booking.booking_id.to_string(), "cancelled")
                .await
        );
        assert_eq!(updated.status, BookingStatus::Cancelled);
        assert!(updated.cancelled_at.is_some());
        assert!(updated.payment_verified_at.is_none());
    }

    #[tokio::test]
    async fn test_terminal_bookings_are_immutable() {
        let (fx, booking) = booked_fixture("2025-06-09 08:00:00", "12:00").await;
        let id = booking.booking_id.to_string();
        assert_ok!(fx.engine.transition(&id, "cancelled").await);

        assert_eq!(
            fx.engine.transition(&id, "booked").await,
            Err(BookingError::AlreadyFinal)
        );
        assert_eq!(fx.engine.cancel(&id).await, Err(BookingError::AlreadyFinal));
    }

    #[tokio::test]
    async fn test_unknown_target_status() {
        let (fx, booking) = booked_fixture("2025-06-09 08:00:00", "12:00").await;
        let id = booking.booking_id.to_string();

        assert_eq!(
            fx.engine.transition(&id, "refunded").await,
            Err(BookingError::InvalidStatusUpdate("refunded".to_string()))
        );
        assert_eq!(
            fx.engine.transition(&id, "pending").await,
            Err(BookingError::InvalidStatusUpdate("pending".to_string()))
        );
        assert_eq!(fx.bookings.all()[0].status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn test_missing_booking() {
        let (fx, _) = booked_fixture("2025-06-09 08:00:00", "12:00").await;
        let unknown = Uuid::new_v4().to_string();
        assert_eq!(
            fx.engine.transition(&unknown, "booked").await,
            Err(BookingError::NotFound)
        );
        assert_eq!(fx.engine.cancel(&unknown).await, Err(BookingError::NotFound));
        assert!(matches!(
            fx.engine.cancel("42").await,
            Err(BookingError::InvalidIdentifier(_))
        ));
    }

    #[tokio::test]
    async fn test_cancel_window() {
        // Starts at 12:00; 09:01 leaves 2h59m
        let (fx, booking) = booked_fixture("2025-06-09 09:01:00", "12:00").await;
        assert_eq!(
            fx.engine.cancel(&booking.booking_id.to_string()).await,
            Err(BookingError::CancelTooLate)
        );

        // 08:59 leaves 3h01m
        let (fx, booking) = booked_fixture("2025-06-09 08:59:00", "12:00").await;
        let cancelled = assert_ok!(fx.engine.cancel(&booking.booking_id.to_string()).await);
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        assert_eq!(
            cancelled.cancelled_at,
            Some(Utc.with_ymd_and_hms(2025, 6, 9, 8, 59, 0).unwrap())
        );
    }

    #[tokio::test]
    async fn test_cancel_exactly_three_hours_before() {
        let (fx, booking) = booked_fixture("2025-06-09 09:00:00", "12:00").await;
        assert_ok!(fx.engine.cancel(&booking.booking_id.to_string()).await);
    }

    #[tokio::test]
    async fn test_update_failure_is_surfaced() {
        let (seed, booking) = booked_fixture("2025-06-09 08:00:00", "12:00").await;
        let stored = booking.clone();

        let mut bookings = MockBookingStore::new();
        bookings
            .expect_get()
            .returning(move |_| Ok(Some(stored.clone())));
        bookings
            .expect_update()
            .returning(|_| Err(StoreError::Backend("deadlock".to_string())));
        let engine = crate::booking::BookingEngine::new(
            Arc::new(StaticCatalog::default()),
            Arc::new(StaticSchedules::default()),
            Arc::new(bookings),
            seed.assets.clone(),
            Arc::new(FixedClock::at(Tz::UTC, "2025-06-09 08:00:00")),
        );

        assert_eq!(
            engine
                .transition(&booking.booking_id.to_string(), "booked")
                .await,
            Err(BookingError::UpdateFailed("deadlock".to_string()))
        );
    }

    #[tokio::test]
    async fn test_concurrent_finalization_is_already_final() {
        // Both writers read the row while it was still pending
        let (seed, booking) = booked_fixture("2025-06-09 08:00:00", "12:00").await;
        let id = booking.booking_id.to_string();
        let snapshot = booking.clone();

        let mut bookings = MockBookingStore::new();
        bookings
            .expect_get()
            .returning(move |_| Ok(Some(snapshot.clone())));
        bookings
            .expect_update()
            .times(1)
            .returning(|_| Err(StoreError::Stale));
        let engine = crate::booking::BookingEngine::new(
            Arc::new(StaticCatalog::default()),
            Arc::new(StaticSchedules::default()),
            Arc::new(bookings),
            seed.assets.clone(),
            Arc::new(FixedClock::at(Tz::UTC, "2025-06-09 08:00:00")),
        );
        assert_eq!(engine.transition(&id, "booked").await, Err(BookingError::AlreadyFinal));

        // The in-memory table refuses to overwrite a terminal row the same way
        assert_ok!(seed.engine.cancel(&id).await);
        let mut stale = booking.clone();
        stale.status = BookingStatus::Booked;
        assert_eq!(seed.bookings.update(&stale).await, Err(StoreError::Stale));
        assert_eq!(seed.bookings.all()[0].status, BookingStatus::Cancelled);
    }
}
