//! Sports field model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::category::Category;
use crate::error::{AppError, AppResult};

/// Bookable field
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Field {
    pub field_id: Uuid,
    pub category_id: Uuid,
    pub field_name: String,
    pub field_address: Option<String>,
    /// Price per hour
    pub field_price: i32,
    pub field_image: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Field with its category embedded
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FieldWithCategory {
    #[serde(flatten)]
    pub field: Field,
    pub category: Option<Category>,
}

/// Flat row produced by the fields/categories join
#[derive(Debug, FromRow)]
pub struct FieldCategoryRow {
    pub field_id: Uuid,
    pub category_id: Uuid,
    pub field_name: String,
    pub field_address: Option<String>,
    pub field_price: i32,
    pub field_image: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub category_name: Option<String>,
    pub category_description: Option<String>,
    pub category_created_at: Option<DateTime<Utc>>,
    pub category_updated_at: Option<DateTime<Utc>>,
}

impl From<FieldCategoryRow> for FieldWithCategory {
    fn from(row: FieldCategoryRow) -> Self {
        let category = match (row.category_name, row.category_created_at) {
            (Some(name), Some(created_at)) => Some(Category {
                category_id: row.category_id,
                name,
                description: row.category_description,
                created_at,
                updated_at: row.category_updated_at,
            }),
            _ => None,
        };

        FieldWithCategory {
            field: Field {
                field_id: row.field_id,
                category_id: row.category_id,
                field_name: row.field_name,
                field_address: row.field_address,
                field_price: row.field_price,
                field_image: row.field_image,
                is_active: row.is_active,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            category,
        }
    }
}

/// Create field request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateField {
    pub category_id: Uuid,
    #[validate(length(min = 1, message = "Field name is required"))]
    pub field_name: String,
    pub field_address: Option<String>,
    #[validate(range(min = 0, message = "Field price cannot be negative"))]
    pub field_price: i32,
    pub field_image: Option<String>,
    pub is_active: Option<bool>,
}

/// Update field request (only present values are applied)
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateField {
    pub category_id: Option<Uuid>,
    pub field_name: Option<String>,
    pub field_address: Option<String>,
    pub field_price: Option<i32>,
    pub field_image: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateField {
    /// Merge into `field`, leaving it untouched when a value is rejected
    pub fn apply_to(&self, field: &mut Field) -> AppResult<()> {
        if let Some(price) = self.field_price {
            if price < 0 {
                return Err(AppError::Validation("Field price cannot be negative".to_string()));
            }
        }
        if let Some(ref name) = self.field_name {
            if name.trim().is_empty() {
                return Err(AppError::Validation("Field name cannot be empty".to_string()));
            }
        }

        if let Some(category_id) = self.category_id {
            field.category_id = category_id;
        }
        if let Some(ref name) = self.field_name {
            field.field_name = name.trim().to_string();
        }
        if let Some(ref address) = self.field_address {
            field.field_address = Some(address.clone());
        }
        if let Some(price) = self.field_price {
            field.field_price = price;
        }
        if let Some(ref image) = self.field_image {
            field.field_image = Some(image.clone());
        }
        if let Some(active) = self.is_active {
            field.is_active = active;
        }
        Ok(())
    }
}

/// Field list parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct FieldQuery {
    pub category_id: Option<Uuid>,
    /// Search in field name or address
    pub search: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
