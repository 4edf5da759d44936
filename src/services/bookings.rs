//! Booking service: admission, lifecycle and booking queries

use uuid::Uuid;

use crate::{
    booking::{BookingEngine, BookingError, BookingStore},
    error::AppResult,
    models::{
        booking::{Booking, BookingDetails, BookingQuery, CreateBooking},
        pagination::PageRequest,
        user::{UserClaims, UserShort},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BookingsService {
    repository: Repository,
    engine: BookingEngine,
}

impl BookingsService {
    pub fn new(repository: Repository, engine: BookingEngine) -> Self {
        Self { repository, engine }
    }

    /// Admit a new booking for `user_id`
    pub async fn create(&self, user_id: Uuid, request: CreateBooking) -> AppResult<Booking> {
        Ok(self.engine.admit(user_id, request).await?)
    }

    /// List every booking (admin)
    pub async fn list(&self, query: &BookingQuery) -> AppResult<(Vec<Booking>, i64, PageRequest)> {
        self.repository.bookings.search(query).await
    }

    /// Booking history of one user
    pub async fn history(&self, user_id: Uuid, query: BookingQuery) -> AppResult<(Vec<Booking>, i64, PageRequest)> {
        let query = BookingQuery {
            user_id: Some(user_id),
            ..query
        };
        self.repository.bookings.search(&query).await
    }

    async fn load_visible(&self, claims: &UserClaims, booking_id: &str) -> AppResult<Booking> {
        let id = Uuid::parse_str(booking_id.trim())
            .map_err(|_| BookingError::InvalidIdentifier(booking_id.to_string()))?;
        let booking = self
            .repository
            .bookings
            .get(id)
            .await
            .map_err(|e| BookingError::LookupFailed(e.to_string()))?
            .ok_or(BookingError::NotFound)?;
        claims.require_self_or_admin(booking.user_id)?;
        Ok(booking)
    }

    /// Booking with field and owner, visible to its owner and admins
    pub async fn get(&self, claims: &UserClaims, booking_id: &str) -> AppResult<BookingDetails> {
        let booking = self.load_visible(claims, booking_id).await?;
        let field = self.repository.fields.get_with_category(booking.field_id).await?;
        let user = UserShort::from(self.repository.users.get_by_id(booking.user_id).await?);
        Ok(BookingDetails { booking, field, user })
    }

    /// Administrative status change (payment verification or rejection)
    pub async fn update_status(&self, booking_id: &str, status: &str) -> AppResult<Booking> {
        Ok(self.engine.transition(booking_id, status).await?)
    }

    /// Cancellation requested by the owner or an admin
    pub async fn cancel(&self, claims: &UserClaims, booking_id: &str) -> AppResult<Booking> {
        self.load_visible(claims, booking_id).await?;
        Ok(self.engine.cancel(booking_id).await?)
    }
}
