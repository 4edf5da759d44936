//! Business logic services

pub mod bookings;
pub mod categories;
pub mod fields;
pub mod schedules;
pub mod storage;
pub mod users;

use std::sync::Arc;

use crate::{
    booking::{parse_timezone, BookingEngine, SystemClock},
    config::AppConfig,
    error::AppResult,
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub categories: categories::CategoriesService,
    pub fields: fields::FieldsService,
    pub schedules: schedules::SchedulesService,
    pub bookings: bookings::BookingsService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        let clock = SystemClock::new(parse_timezone(&config.booking.timezone));
        let engine = BookingEngine::new(
            Arc::new(repository.fields.clone()),
            Arc::new(repository.schedules.clone()),
            Arc::new(repository.bookings.clone()),
            Arc::new(storage::LocalAssetStore::new(&config.booking.proof_dir)),
            Arc::new(clock),
        );

        Self {
            users: users::UsersService::new(repository.clone(), config.auth.clone()),
            categories: categories::CategoriesService::new(repository.clone()),
            fields: fields::FieldsService::new(repository.clone()),
            schedules: schedules::SchedulesService::new(repository.clone()),
            bookings: bookings::BookingsService::new(repository.clone(), engine),
            repository,
        }
    }

    /// Check that the database answers
    pub async fn ping(&self) -> AppResult<()> {
        Ok(self.repository.ping().await?)
    }
}
