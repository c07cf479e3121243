//! Category repository.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::base::{self, contains_ci, search_term};
use super::entities::{category, story};
use super::mapping;
use super::story_repository::story_blob_paths;
use crate::domain::{CategoryFilter, CategoryRequest, CategoryResponse};
use crate::errors::AppResult;
use crate::infra::storage::BlobStore;
use crate::types::{PaginatedResponse, Pagination};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Category repository trait.
///
/// Reads never return soft-deleted categories.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn get_by_id(&self, id: i32) -> AppResult<Option<CategoryResponse>>;

    async fn get_paginated(
        &self,
        pagination: Pagination,
        filter: CategoryFilter,
    ) -> AppResult<PaginatedResponse<CategoryResponse>>;

    async fn add(&self, request: CategoryRequest) -> AppResult<CategoryResponse>;

    /// `None` when no live category has this id
    async fn update(&self, id: i32, request: CategoryRequest) -> AppResult<Option<CategoryResponse>>;

    /// Permanently delete the category, the stories filed under it and their blobs
    async fn delete(&self, id: i32) -> AppResult<()>;

    async fn soft_delete(&self, id: i32) -> AppResult<()>;
}

pub struct CategoryStore {
    db: DatabaseConnection,
    blobs: Arc<BlobStore>,
}

impl CategoryStore {
    pub fn new(db: DatabaseConnection, blobs: Arc<BlobStore>) -> Self {
        Self { db, blobs }
    }

    async fn total_stories(&self, id: i32) -> AppResult<i64> {
        let counts =
            base::count_live_children::<story::Entity, _>(&self.db, story::Column::CategoryId, &[id])
                .await?;
        Ok(counts.get(&id).copied().unwrap_or(0))
    }
}

#[async_trait]
impl CategoryRepository for CategoryStore {
    async fn get_by_id(&self, id: i32) -> AppResult<Option<CategoryResponse>> {
        let Some(model) = base::find_active::<category::Entity, _>(&self.db, id).await? else {
            return Ok(None);
        };
        let total_stories = self.total_stories(id).await?;

        Ok(Some(mapping::category_response(model, total_stories)))
    }

    async fn get_paginated(
        &self,
        pagination: Pagination,
        filter: CategoryFilter,
    ) -> AppResult<PaginatedResponse<CategoryResponse>> {
        let mut query = category::Entity::find();
        if let Some(term) = search_term(&filter.search) {
            query = query.filter(contains_ci(category::Column::CategoryName, term));
        }

        let (models, total) = base::fetch_page(&self.db, query, pagination).await?;
        let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
        let counts =
            base::count_live_children::<story::Entity, _>(&self.db, story::Column::CategoryId, &ids)
                .await?;

        let items = models
            .into_iter()
            .map(|model| {
                let total_stories = counts.get(&model.id).copied().unwrap_or(0);
                mapping::category_response(model, total_stories)
            })
            .collect();

        Ok(PaginatedResponse::new(items, total, pagination))
    }

    async fn add(&self, request: CategoryRequest) -> AppResult<CategoryResponse> {
        let now = Utc::now();
        let mut active = category::ActiveModel {
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };
        mapping::apply_category(&mut active, request);

        let model = active.insert(&self.db).await?;
        tracing::info!(category_id = model.id, "Category created");

        Ok(mapping::category_response(model, 0))
    }

    async fn update(&self, id: i32, request: CategoryRequest) -> AppResult<Option<CategoryResponse>> {
        let Some(model) = base::find_active::<category::Entity, _>(&self.db, id).await? else {
            return Ok(None);
        };

        let mut active: category::ActiveModel = model.into();
        mapping::apply_category(&mut active, request);
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        tracing::debug!(category_id = id, "Category updated");

        let total_stories = self.total_stories(id).await?;
        Ok(Some(mapping::category_response(model, total_stories)))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let blobs = story_blob_paths(&self.db, story::Column::CategoryId.eq(id)).await?;

        base::hard_delete::<category::Entity, _>(&self.db, id).await?;
        self.blobs.remove_all(blobs).await;

        tracing::info!(category_id = id, "Category deleted");
        Ok(())
    }

    async fn soft_delete(&self, id: i32) -> AppResult<()> {
        base::soft_delete::<category::Entity, _>(&self.db, id).await?;
        tracing::info!(category_id = id, "Category soft deleted");
        Ok(())
    }
}
