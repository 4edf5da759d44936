//! Field category model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Category of field (futsal, badminton, ...)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create category request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategory {
    #[validate(length(min = 1, message = "Category name is required"))]
    pub name: String,
    pub description: Option<String>,
}

/// Update category request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCategory {
    #[validate(length(min = 1, message = "Category name cannot be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
}

impl UpdateCategory {
    pub fn apply_to(&self, category: &mut Category) {
        if let Some(ref name) = self.name {
            category.name = name.trim().to_string();
        }
        if let Some(ref description) = self.description {
            category.description = Some(description.clone());
        }
    }
}

/// Category list parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct CategoryQuery {
    /// Search in category name
    pub search: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
