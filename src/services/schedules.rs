//! Field schedule management service

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::schedule::{CreateSchedule, Schedule, UpdateSchedule},
    repository::Repository,
};

#[derive(Clone)]
pub struct SchedulesService {
    repository: Repository,
}

impl SchedulesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_all(&self) -> AppResult<Vec<Schedule>> {
        self.repository.schedules.list_all().await
    }

    pub async fn list_by_field(&self, field_id: Uuid) -> AppResult<Vec<Schedule>> {
        if !self.repository.fields.exists(field_id).await? {
            return Err(AppError::NotFound(format!("Field {} not found", field_id)));
        }
        self.repository.schedules.list_by_field(field_id).await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Schedule> {
        self.repository.schedules.get_by_id(id).await
    }

    pub async fn create(&self, data: CreateSchedule) -> AppResult<Schedule> {
        let (day, open, close) = data.window()?;
        if !self.repository.fields.exists(data.field_id).await? {
            return Err(AppError::NotFound(format!("Field {} not found", data.field_id)));
        }
        let schedule = self
            .repository
            .schedules
            .create(data.field_id, day, open, close)
            .await?;
        tracing::info!(
            schedule_id = %schedule.schedule_id,
            field_id = %schedule.field_id,
            day_of_week = schedule.day_of_week,
            "Schedule created"
        );
        Ok(schedule)
    }

    pub async fn update(&self, id: Uuid, data: UpdateSchedule) -> AppResult<Schedule> {
        let mut schedule = self.repository.schedules.get_by_id(id).await?;
        data.apply_to(&mut schedule)?;
        self.repository.schedules.update(&schedule).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.schedules.delete(id).await?;
        tracing::info!(schedule_id = %id, "Schedule deleted");
        Ok(())
    }
}
