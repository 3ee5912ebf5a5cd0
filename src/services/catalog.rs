//! Categories and tags service

use validator::Validate;

use crate::{
    error::AppResult,
    models::catalog::{Category, CreateCategory, CreateTag, Tag},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // ---- Categories ----
    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.repository.catalog.list_categories().await
    }

    pub async fn create_category(&self, data: &CreateCategory) -> AppResult<Category> {
        data.validate()?;
        self.repository.catalog.create_category(data).await
    }

    pub async fn delete_category(&self, id: i32) -> AppResult<()> {
        self.repository.catalog.delete_category(id).await
    }

    // ---- Tags ----
    pub async fn list_tags(&self) -> AppResult<Vec<Tag>> {
        self.repository.catalog.list_tags().await
    }

    pub async fn create_tag(&self, data: &CreateTag) -> AppResult<Tag> {
        data.validate()?;
        self.repository.catalog.create_tag(data).await
    }

    pub async fn delete_tag(&self, id: i32) -> AppResult<()> {
        self.repository.catalog.delete_tag(id).await
    }
}
