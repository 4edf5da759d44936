//! Field operating-hours schedules

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Weekday index of a calendar date (0=Sunday, 6=Saturday)
pub fn weekday_index(date: NaiveDate) -> i16 {
    date.weekday().num_days_from_sunday() as i16
}

/// English day name for a weekday index, if in range
pub fn day_name(day_of_week: i16) -> Option<&'static str> {
    usize::try_from(day_of_week)
        .ok()
        .and_then(|idx| DAY_NAMES.get(idx).copied())
}

/// Parse a wall-clock time in HH:MM form
pub fn parse_clock_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

fn validate_window(day_of_week: i16, open: NaiveTime, close: NaiveTime) -> AppResult<()> {
    if day_name(day_of_week).is_none() {
        return Err(AppError::Validation(
            "day_of_week must be between 0 (Sunday) and 6 (Saturday)".to_string(),
        ));
    }
    if close <= open {
        return Err(AppError::Validation(
            "close_time must be after open_time".to_string(),
        ));
    }
    Ok(())
}

/// Opening window of a field for one weekday
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Schedule {
    pub schedule_id: Uuid,
    pub field_id: Uuid,
    /// Day of week (0=Sunday, 6=Saturday)
    pub day_of_week: i16,
    #[schema(value_type = String, example = "08:00:00")]
    pub open_time: NaiveTime,
    #[schema(value_type = String, example = "22:00:00")]
    pub close_time: NaiveTime,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Schedule as returned by the API, with the weekday spelled out
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ScheduleResponse {
    #[serde(flatten)]
    pub schedule: Schedule,
    pub day_name: String,
}

impl From<Schedule> for ScheduleResponse {
    fn from(schedule: Schedule) -> Self {
        let day_name = day_name(schedule.day_of_week).unwrap_or("Unknown").to_string();
        Self { schedule, day_name }
    }
}

/// Create schedule request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSchedule {
    pub field_id: Uuid,
    /// Day of week (0=Sunday, 6=Saturday)
    pub day_of_week: i16,
    /// Opening time (HH:MM)
    pub open_time: String,
    /// Closing time (HH:MM)
    pub close_time: String,
}

impl CreateSchedule {
    /// Parsed and validated (day, open, close)
    pub fn window(&self) -> AppResult<(i16, NaiveTime, NaiveTime)> {
        let open = parse_clock_time(&self.open_time)
            .ok_or_else(|| AppError::Validation("Invalid open_time (use HH:MM)".to_string()))?;
        let close = parse_clock_time(&self.close_time)
            .ok_or_else(|| AppError::Validation("Invalid close_time (use HH:MM)".to_string()))?;
        validate_window(self.day_of_week, open, close)?;
        Ok((self.day_of_week, open, close))
    }
}

/// Update schedule request (only present values are applied)
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateSchedule {
    pub day_of_week: Option<i16>,
    /// Opening time (HH:MM)
    pub open_time: Option<String>,
    /// Closing time (HH:MM)
    pub close_time: Option<String>,
}

impl UpdateSchedule {
    /// Merge into `schedule`; the merged window must still be valid
    pub fn apply_to(&self, schedule: &mut Schedule) -> AppResult<()> {
        let day = self.day_of_week.unwrap_or(schedule.day_of_week);
        let open = match self.open_time {
            Some(ref value) => parse_clock_time(value)
                .ok_or_else(|| AppError::Validation("Invalid open_time (use HH:MM)".to_string()))?,
            None => schedule.open_time,
        };
        let close = match self.close_time {
            Some(ref value) => parse_clock_time(value)
                .ok_or_else(|| AppError::Validation("Invalid close_time (use HH:MM)".to_string()))?,
            None => schedule.close_time,
        };
        validate_window(day, open, close)?;

        schedule.day_of_week = day;
        schedule.open_time = open;
        schedule.close_time = close;
        Ok(())
    }
}
