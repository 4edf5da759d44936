//! Schedules repository, also serving as the booking engine's schedule lookup

use async_trait::async_trait;
use chrono::{NaiveTime, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::{has_sqlstate, UNIQUE_VIOLATION};
use crate::{
    booking::{OpeningHours, ScheduleLookup, StoreError},
    error::{AppError, AppResult},
    models::schedule::Schedule,
};

fn duplicate_day(e: sqlx::Error) -> AppError {
    if has_sqlstate(&e, UNIQUE_VIOLATION) {
        AppError::Conflict("Field already has a schedule for this day".to_string())
    } else {
        e.into()
    }
}

#[derive(Clone)]
pub struct SchedulesRepository {
    pool: Pool<Postgres>,
}

impl SchedulesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List every schedule, ordered by field and weekday
    pub async fn list_all(&self) -> AppResult<Vec<Schedule>> {
        let rows = sqlx::query_as::<_, Schedule>(
            "SELECT * FROM schedules ORDER BY field_id, day_of_week",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_by_field(&self, field_id: Uuid) -> AppResult<Vec<Schedule>> {
        let rows = sqlx::query_as::<_, Schedule>(
            "SELECT * FROM schedules WHERE field_id = $1 ORDER BY day_of_week",
        )
        .bind(field_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Schedule> {
        sqlx::query_as::<_, Schedule>("SELECT * FROM schedules WHERE schedule_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Schedule {} not found", id)))
    }

    pub async fn create(
        &self,
        field_id: Uuid,
        day_of_week: i16,
        open_time: NaiveTime,
        close_time: NaiveTime,
    ) -> AppResult<Schedule> {
        sqlx::query_as::<_, Schedule>(
            r#"
            INSERT INTO schedules (schedule_id, field_id, day_of_week, open_time, close_time, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(field_id)
        .bind(day_of_week)
        .bind(open_time)
        .bind(close_time)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(duplicate_day)
    }

    pub async fn update(&self, schedule: &Schedule) -> AppResult<Schedule> {
        sqlx::query_as::<_, Schedule>(
            r#"
            UPDATE schedules
            SET day_of_week = $2, open_time = $3, close_time = $4, updated_at = $5
            WHERE schedule_id = $1
            RETURNING *
            "#,
        )
        .bind(schedule.schedule_id)
        .bind(schedule.day_of_week)
        .bind(schedule.open_time)
        .bind(schedule.close_time)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(duplicate_day)?
        .ok_or_else(|| AppError::NotFound(format!("Schedule {} not found", schedule.schedule_id)))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM schedules WHERE schedule_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Schedule {} not found", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl ScheduleLookup for SchedulesRepository {
    async fn schedule_for(
        &self,
        field_id: Uuid,
        weekday: i16,
    ) -> Result<Option<OpeningHours>, StoreError> {
        let row: Option<(NaiveTime, NaiveTime)> = sqlx::query_as(
            "SELECT open_time, close_time FROM schedules WHERE field_id = $1 AND day_of_week = $2",
        )
        .bind(field_id)
        .bind(weekday)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(open, close)| OpeningHours { open, close }))
    }
}
