//! In-memory port implementations for engine tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use uuid::Uuid;

use super::{
    AssetStore, BookingEngine, BookingStore, Clock, FieldCatalog, FieldPricing, OpeningHours,
    ScheduleLookup, StoreError,
};
use crate::models::booking::{Booking, BookingStatus, CreateBooking, PaymentProof};

pub const HOURLY_PRICE: i32 = 100_000;

/// Clock frozen at a given instant
pub struct FixedClock {
    pub tz: Tz,
    pub now: DateTime<Tz>,
}

impl FixedClock {
    /// `at` is a local "YYYY-MM-DD HH:MM:SS" in `tz`
    pub fn at(tz: Tz, at: &str) -> Self {
        let naive = chrono::NaiveDateTime::parse_from_str(at, "%Y-%m-%d %H:%M:%S").unwrap();
        let now = tz.from_local_datetime(&naive).single().unwrap();
        Self { tz, now }
    }
}

impl Clock for FixedClock {
    fn timezone(&self) -> Tz {
        self.tz
    }

    fn now(&self) -> DateTime<Tz> {
        self.now
    }
}

#[derive(Default)]
pub struct StaticCatalog {
    pub fields: HashMap<Uuid, FieldPricing>,
}

#[async_trait]
impl FieldCatalog for StaticCatalog {
    async fn field_pricing(&self, field_id: Uuid) -> Result<Option<FieldPricing>, StoreError> {
        Ok(self.fields.get(&field_id).copied())
    }
}

#[derive(Default)]
pub struct StaticSchedules {
    pub hours: HashMap<(Uuid, i16), OpeningHours>,
}

#[async_trait]
impl ScheduleLookup for StaticSchedules {
    async fn schedule_for(
        &self,
        field_id: Uuid,
        weekday: i16,
    ) -> Result<Option<OpeningHours>, StoreError> {
        Ok(self.hours.get(&(field_id, weekday)).copied())
    }
}

/// Booking table with the same overlap semantics as the database
#[derive(Default)]
pub struct MemoryBookings {
    pub rows: Mutex<Vec<Booking>>,
}

impl MemoryBookings {
    fn conflicts(rows: &[Booking], candidate: &Booking) -> bool {
        rows.iter().any(|b| {
            b.booking_id != candidate.booking_id
                && b.field_id == candidate.field_id
                && b.status != BookingStatus::Cancelled
                && b.start_time < candidate.end_time
                && b.end_time > candidate.start_time
        })
    }

    pub fn all(&self) -> Vec<Booking> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl BookingStore for MemoryBookings {
    async fn has_overlap(
        &self,
        field_id: Uuid,
        date: NaiveDate,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().any(|b| {
            b.field_id == field_id
                && b.booking_date == date
                && b.status != BookingStatus::Cancelled
                && start < b.end_time
                && end > b.start_time
        }))
    }

    async fn insert(&self, booking: &Booking) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if Self::conflicts(&rows, booking) {
            return Err(StoreError::Overlap);
        }
        rows.push(booking.clone());
        Ok(())
    }

    async fn get(&self, booking_id: Uuid) -> Result<Option<Booking>, StoreError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|b| b.booking_id == booking_id).cloned())
    }

    async fn update(&self, booking: &Booking) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|b| b.booking_id == booking.booking_id) {
            Some(row) if row.status.is_final() => Err(StoreError::Stale),
            Some(row) => {
                *row = booking.clone();
                Ok(())
            }
            None => Err(StoreError::Backend("row vanished".to_string())),
        }
    }
}

#[derive(Default)]
pub struct MemoryAssets {
    pub files: Mutex<HashMap<String, Vec<u8>>>,
}

#[async_trait]
impl AssetStore for MemoryAssets {
    async fn store(&self, file_name: &str, bytes: &[u8]) -> Result<String, StoreError> {
        let reference = format!("proof_{}_{}", Uuid::new_v4(), file_name);
        self.files
            .lock()
            .unwrap()
            .insert(reference.clone(), bytes.to_vec());
        Ok(reference)
    }

    async fn remove(&self, reference: &str) -> Result<(), StoreError> {
        self.files.lock().unwrap().remove(reference);
        Ok(())
    }
}

/// One field priced at 100,000/h, open 08:00-22:00 every day
pub struct Fixture {
    pub field_id: Uuid,
    pub user_id: Uuid,
    pub bookings: Arc<MemoryBookings>,
    pub assets: Arc<MemoryAssets>,
    pub engine: BookingEngine,
}

impl Fixture {
    pub fn new(clock: FixedClock) -> Self {
        Self::with_schedule_days(clock, &[0, 1, 2, 3, 4, 5, 6])
    }

    pub fn with_schedule_days(clock: FixedClock, days: &[i16]) -> Self {
        let field_id = Uuid::new_v4();

        let mut catalog = StaticCatalog::default();
        catalog.fields.insert(
            field_id,
            FieldPricing {
                hourly_price: HOURLY_PRICE,
                is_active: true,
            },
        );

        let mut schedules = StaticSchedules::default();
        for day in days {
            schedules.hours.insert(
                (field_id, *day),
                OpeningHours {
                    open: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                    close: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
                },
            );
        }

        let bookings = Arc::new(MemoryBookings::default());
        let assets = Arc::new(MemoryAssets::default());
        let engine = BookingEngine::new(
            Arc::new(catalog),
            Arc::new(schedules),
            bookings.clone(),
            assets.clone(),
            Arc::new(clock),
        );

        Self {
            field_id,
            user_id: Uuid::new_v4(),
            bookings,
            assets,
            engine,
        }
    }

    pub fn request(&self, date: &str, start: &str, end: &str, total: f64) -> CreateBooking {
        request_for(self.field_id, date, start, end, total)
    }
}

pub fn request_for(field_id: Uuid, date: &str, start: &str, end: &str, total: f64) -> CreateBooking {
    CreateBooking {
        field_id: field_id.to_string(),
        booking_date: date.to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
        payment_method: "bank_transfer".to_string(),
        total_payment: total,
        proof: None,
    }
}

pub fn proof() -> PaymentProof {
    PaymentProof {
        file_name: "receipt.jpg".to_string(),
        bytes: vec![0xFF, 0xD8, 0xFF],
    }
}
