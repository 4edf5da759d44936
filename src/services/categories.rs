//! Category management service

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        category::{Category, CategoryQuery, CreateCategory, UpdateCategory},
        pagination::PageRequest,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CategoriesService {
    repository: Repository,
}

impl CategoriesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &CategoryQuery) -> AppResult<(Vec<Category>, i64, PageRequest)> {
        self.repository.categories.search(query).await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Category> {
        self.repository.categories.get_by_id(id).await
    }

    pub async fn create(&self, data: CreateCategory) -> AppResult<Category> {
        data.validate()?;
        let category = self.repository.categories.create(&data).await?;
        tracing::info!(category_id = %category.category_id, "Category created");
        Ok(category)
    }

    pub async fn update(&self, id: Uuid, data: UpdateCategory) -> AppResult<Category> {
        data.validate()?;
        let mut category = self.repository.categories.get_by_id(id).await?;
        data.apply_to(&mut category);
        self.repository.categories.update(&category).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.categories.delete(id).await?;
        tracing::info!(category_id = %id, "Category deleted");
        Ok(())
    }
}
