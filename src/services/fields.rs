//! Field management service

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        field::{CreateField, Field, FieldQuery, FieldWithCategory, UpdateField},
        pagination::PageRequest,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct FieldsService {
    repository: Repository,
}

impl FieldsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    async fn require_category(&self, category_id: Uuid) -> AppResult<()> {
        if !self.repository.categories.exists(category_id).await? {
            return Err(AppError::NotFound(format!("Category {} not found", category_id)));
        }
        Ok(())
    }

    pub async fn list(&self, query: &FieldQuery) -> AppResult<(Vec<FieldWithCategory>, i64, PageRequest)> {
        self.repository.fields.search(query).await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<FieldWithCategory> {
        self.repository.fields.get_with_category(id).await
    }

    pub async fn create(&self, data: CreateField) -> AppResult<Field> {
        data.validate()?;
        self.require_category(data.category_id).await?;
        let field = self.repository.fields.create(&data).await?;
        tracing::info!(field_id = %field.field_id, price = field.field_price, "Field created");
        Ok(field)
    }

    pub async fn update(&self, id: Uuid, data: UpdateField) -> AppResult<Field> {
        let mut field = self.repository.fields.get_by_id(id).await?;
        data.apply_to(&mut field)?;
        if let Some(category_id) = data.category_id {
            self.require_category(category_id).await?;
        }
        self.repository.fields.update(&field).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.fields.delete(id).await?;
        tracing::info!(field_id = %id, "Field deleted");
        Ok(())
    }
}
