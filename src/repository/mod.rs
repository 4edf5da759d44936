//! Repository layer for database operations

pub mod bookings;
pub mod categories;
pub mod fields;
pub mod schedules;
pub mod users;

use sqlx::{Pool, Postgres};

/// SQLSTATE raised by an exclusion constraint violation
pub(crate) const EXCLUSION_VIOLATION: &str = "23P01";
/// SQLSTATE raised by a unique constraint violation
pub(crate) const UNIQUE_VIOLATION: &str = "23505";
/// SQLSTATE raised by a foreign key violation
pub(crate) const FOREIGN_KEY_VIOLATION: &str = "23503";

/// True when `err` is a database error carrying the given SQLSTATE
pub(crate) fn has_sqlstate(err: &sqlx::Error, code: &str) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some(code),
        _ => false,
    }
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: users::UsersRepository,
    pub categories: categories::CategoriesRepository,
    pub fields: fields::FieldsRepository,
    pub schedules: schedules::SchedulesRepository,
    pub bookings: bookings::BookingsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            categories: categories::CategoriesRepository::new(pool.clone()),
            fields: fields::FieldsRepository::new(pool.clone()),
            schedules: schedules::SchedulesRepository::new(pool.clone()),
            bookings: bookings::BookingsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Check database connectivity
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
