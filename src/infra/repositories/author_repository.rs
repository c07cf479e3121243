//! Author repository.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::base::{self, contains_ci, search_term};
use super::entities::{author, story};
use super::mapping;
use super::story_repository::story_blob_paths;
use crate::domain::{AuthorFilter, AuthorRequest, AuthorResponse};
use crate::errors::AppResult;
use crate::infra::storage::BlobStore;
use crate::types::{PaginatedResponse, Pagination};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Author repository trait for dependency injection.
///
/// Every read excludes soft-deleted authors.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    async fn get_by_id(&self, id: i32) -> AppResult<Option<AuthorResponse>>;

    async fn get_paginated(
        &self,
        pagination: Pagination,
        filter: AuthorFilter,
    ) -> AppResult<PaginatedResponse<AuthorResponse>>;

    async fn add(&self, request: AuthorRequest) -> AppResult<AuthorResponse>;

    /// `None` when no live author has this id
    async fn update(&self, id: i32, request: AuthorRequest) -> AppResult<Option<AuthorResponse>>;

    /// Permanently delete the author, its stories and their blobs
    async fn delete(&self, id: i32) -> AppResult<()>;

    async fn soft_delete(&self, id: i32) -> AppResult<()>;
}

pub struct AuthorStore {
    db: DatabaseConnection,
    blobs: Arc<BlobStore>,
}

impl AuthorStore {
    pub fn new(db: DatabaseConnection, blobs: Arc<BlobStore>) -> Self {
        Self { db, blobs }
    }

    async fn total_stories(&self, id: i32) -> AppResult<i64> {
        let counts =
            base::count_live_children::<story::Entity, _>(&self.db, story::Column::AuthorId, &[id])
                .await?;
        Ok(counts.get(&id).copied().unwrap_or(0))
    }
}

#[async_trait]
impl AuthorRepository for AuthorStore {
    async fn get_by_id(&self, id: i32) -> AppResult<Option<AuthorResponse>> {
        let Some(model) = base::find_active::<author::Entity, _>(&self.db, id).await? else {
            return Ok(None);
        };
        let total_stories = self.total_stories(id).await?;

        Ok(Some(mapping::author_response(model, total_stories)))
    }

    async fn get_paginated(
        &self,
        pagination: Pagination,
        filter: AuthorFilter,
    ) -> AppResult<PaginatedResponse<AuthorResponse>> {
        let mut query = author::Entity::find();
        if let Some(term) = search_term(&filter.search) {
            query = query.filter(contains_ci(author::Column::AuthorName, term));
        }

        let (models, total) = base::fetch_page(&self.db, query, pagination).await?;
        let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
        let counts =
            base::count_live_children::<story::Entity, _>(&self.db, story::Column::AuthorId, &ids)
                .await?;

        let items = models
            .into_iter()
            .map(|model| {
                let total_stories = counts.get(&model.id).copied().unwrap_or(0);
                mapping::author_response(model, total_stories)
            })
            .collect();

        Ok(PaginatedResponse::new(items, total, pagination))
    }

    async fn add(&self, request: AuthorRequest) -> AppResult<AuthorResponse> {
        let now = Utc::now();
        let mut active = author::ActiveModel {
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };
        mapping::apply_author(&mut active, request);

        let model = active.insert(&self.db).await?;
        tracing::info!(author_id = model.id, "Author created");

        Ok(mapping::author_response(model, 0))
    }

    async fn update(&self, id: i32, request: AuthorRequest) -> AppResult<Option<AuthorResponse>> {
        let Some(model) = base::find_active::<author::Entity, _>(&self.db, id).await? else {
            return Ok(None);
        };

        let mut active: author::ActiveModel = model.into();
        mapping::apply_author(&mut active, request);
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        tracing::debug!(author_id = id, "Author updated");

        let total_stories = self.total_stories(id).await?;
        Ok(Some(mapping::author_response(model, total_stories)))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let blobs = story_blob_paths(&self.db, story::Column::AuthorId.eq(id)).await?;

        base::hard_delete::<author::Entity, _>(&self.db, id).await?;
        self.blobs.remove_all(blobs).await;

        tracing::info!(author_id = id, "Author deleted");
        Ok(())
    }

    async fn soft_delete(&self, id: i32) -> AppResult<()> {
        base::soft_delete::<author::Entity, _>(&self.db, id).await?;
        tracing::info!(author_id = id, "Author soft deleted");
        Ok(())
    }
}
