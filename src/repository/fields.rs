//! Fields repository, also serving as the booking engine's field catalog

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::{has_sqlstate, FOREIGN_KEY_VIOLATION};
use crate::{
    booking::{FieldCatalog, FieldPricing, StoreError},
    error::{AppError, AppResult},
    models::{
        field::{CreateField, Field, FieldCategoryRow, FieldQuery, FieldWithCategory},
        pagination::PageRequest,
    },
};

const FIELD_WITH_CATEGORY: &str = r#"
    SELECT f.*,
           c.name AS category_name,
           c.description AS category_description,
           c.created_at AS category_created_at,
           c.updated_at AS category_updated_at
    FROM fields f
    LEFT JOIN categories c ON c.category_id = f.category_id
"#;

#[derive(Clone)]
pub struct FieldsRepository {
    pool: Pool<Postgres>,
}

impl FieldsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Field> {
        sqlx::query_as::<_, Field>("SELECT * FROM fields WHERE field_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Field {} not found", id)))
    }

    /// Get a field with its category
    pub async fn get_with_category(&self, id: Uuid) -> AppResult<FieldWithCategory> {
        let query = format!("{} WHERE f.field_id = $1", FIELD_WITH_CATEGORY);
        sqlx::query_as::<_, FieldCategoryRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(FieldWithCategory::from)
            .ok_or_else(|| AppError::NotFound(format!("Field {} not found", id)))
    }

    pub async fn exists(&self, id: Uuid) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM fields WHERE field_id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// List fields with category filter, search and pagination
    pub async fn search(&self, query: &FieldQuery) -> AppResult<(Vec<FieldWithCategory>, i64, PageRequest)> {
        let page = PageRequest::new(query.page, query.per_page);
        let pattern = query
            .search
            .as_ref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| format!("%{}%", s.trim()));
        let filter = r#"
            WHERE ($1::uuid IS NULL OR f.category_id = $1)
              AND ($2::text IS NULL OR f.field_name ILIKE $2 OR f.field_address ILIKE $2)
        "#;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM fields f {}", filter))
            .bind(query.category_id)
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await?;

        let list_query = format!(
            "{} {} ORDER BY f.created_at DESC LIMIT $3 OFFSET $4",
            FIELD_WITH_CATEGORY, filter
        );
        let fields = sqlx::query_as::<_, FieldCategoryRow>(&list_query)
            .bind(query.category_id)
            .bind(&pattern)
            .bind(page.per_page)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(FieldWithCategory::from)
            .collect();

        Ok((fields, total, page))
    }

    pub async fn create(&self, data: &CreateField) -> AppResult<Field> {
        let field = sqlx::query_as::<_, Field>(
            r#"
            INSERT INTO fields (field_id, category_id, field_name, field_address,
                                field_price, field_image, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.category_id)
        .bind(data.field_name.trim())
        .bind(&data.field_address)
        .bind(data.field_price)
        .bind(&data.field_image)
        .bind(data.is_active.unwrap_or(true))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(field)
    }

    pub async fn update(&self, field: &Field) -> AppResult<Field> {
        sqlx::query_as::<_, Field>(
            r#"
            UPDATE fields
            SET category_id = $2, field_name = $3, field_address = $4, field_price = $5,
                field_image = $6, is_active = $7, updated_at = $8
            WHERE field_id = $1
            RETURNING *
            "#,
        )
        .bind(field.field_id)
        .bind(field.category_id)
        .bind(&field.field_name)
        .bind(&field.field_address)
        .bind(field.field_price)
        .bind(&field.field_image)
        .bind(field.is_active)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Field {} not found", field.field_id)))
    }

    /// Delete a field; refused while bookings reference it
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM fields WHERE field_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if has_sqlstate(&e, FOREIGN_KEY_VIOLATION) {
                    AppError::Conflict("Field still has bookings".to_string())
                } else {
                    e.into()
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Field {} not found", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl FieldCatalog for FieldsRepository {
    async fn field_pricing(&self, field_id: Uuid) -> Result<Option<FieldPricing>, StoreError> {
        let row: Option<(i32, bool)> =
            sqlx::query_as("SELECT field_price, is_active FROM fields WHERE field_id = $1")
                .bind(field_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(hourly_price, is_active)| FieldPricing {
            hourly_price,
            is_active,
        }))
    }
}
