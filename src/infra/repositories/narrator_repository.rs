//! Narrator repository.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::base::{self, contains_ci, search_term};
use super::entities::{narrator, story};
use super::mapping;
use super::story_repository::story_blob_paths;
use crate::domain::{NarratorFilter, NarratorRequest, NarratorResponse};
use crate::errors::AppResult;
use crate::infra::storage::BlobStore;
use crate::types::{PaginatedResponse, Pagination};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Narrator repository trait.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait NarratorRepository: Send + Sync {
    async fn get_by_id(&self, id: i32) -> AppResult<Option<NarratorResponse>>;

    async fn get_paginated(
        &self,
        pagination: Pagination,
        filter: NarratorFilter,
    ) -> AppResult<PaginatedResponse<NarratorResponse>>;

    async fn add(&self, request: NarratorRequest) -> AppResult<NarratorResponse>;

    /// `None` when no live narrator has this id
    async fn update(&self, id: i32, request: NarratorRequest) -> AppResult<Option<NarratorResponse>>;

    /// Permanently delete the narrator, every story it narrates and their blobs
    async fn delete(&self, id: i32) -> AppResult<()>;

    async fn soft_delete(&self, id: i32) -> AppResult<()>;
}

pub struct NarratorStore {
    db: DatabaseConnection,
    blobs: Arc<BlobStore>,
}

impl NarratorStore {
    pub fn new(db: DatabaseConnection, blobs: Arc<BlobStore>) -> Self {
        Self { db, blobs }
    }

    async fn total_stories(&self, id: i32) -> AppResult<i64> {
        let counts =
            base::count_live_children::<story::Entity, _>(&self.db, story::Column::NarratorId, &[id])
                .await?;
        Ok(counts.get(&id).copied().unwrap_or(0))
    }
}

#[async_trait]
impl NarratorRepository for NarratorStore {
    async fn get_by_id(&self, id: i32) -> AppResult<Option<NarratorResponse>> {
        let Some(model) = base::find_active::<narrator::Entity, _>(&self.db, id).await? else {
            return Ok(None);
        };
        let total_stories = self.total_stories(id).await?;

        Ok(Some(mapping::narrator_response(model, total_stories)))
    }

    async fn get_paginated(
        &self,
        pagination: Pagination,
        filter: NarratorFilter,
    ) -> AppResult<PaginatedResponse<NarratorResponse>> {
        let mut query = narrator::Entity::find();
        if let Some(term) = search_term(&filter.search) {
            query = query.filter(contains_ci(narrator::Column::NarratorName, term));
        }

        let (models, total) = base::fetch_page(&self.db, query, pagination).await?;
        let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
        let counts =
            base::count_live_children::<story::Entity, _>(&self.db, story::Column::NarratorId, &ids)
                .await?;

        let items = models
            .into_iter()
            .map(|model| {
                let total_stories = counts.get(&model.id).copied().unwrap_or(0);
                mapping::narrator_response(model, total_stories)
            })
            .collect();

        Ok(PaginatedResponse::new(items, total, pagination))
    }

    async fn add(&self, request: NarratorRequest) -> AppResult<NarratorResponse> {
        let now = Utc::now();
        let mut active = narrator::ActiveModel {
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };
        mapping::apply_narrator(&mut active, request);

        let model = active.insert(&self.db).await?;
        tracing::info!(narrator_id = model.id, "Narrator created");

        Ok(mapping::narrator_response(model, 0))
    }

    async fn update(&self, id: i32, request: NarratorRequest) -> AppResult<Option<NarratorResponse>> {
        let Some(model) = base::find_active::<narrator::Entity, _>(&self.db, id).await? else {
            return Ok(None);
        };

        let mut active: narrator::ActiveModel = model.into();
        mapping::apply_narrator(&mut active, request);
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        tracing::debug!(narrator_id = id, "Narrator updated");

        let total_stories = self.total_stories(id).await?;
        Ok(Some(mapping::narrator_response(model, total_stories)))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let blobs = story_blob_paths(&self.db, story::Column::NarratorId.eq(id)).await?;

        base::hard_delete::<narrator::Entity, _>(&self.db, id).await?;
        self.blobs.remove_all(blobs).await;

        tracing::info!(narrator_id = id, "Narrator deleted");
        Ok(())
    }

    async fn soft_delete(&self, id: i32) -> AppResult<()> {
        base::soft_delete::<narrator::Entity, _>(&self.db, id).await?;
        tracing::info!(narrator_id = id, "Narrator soft deleted");
        Ok(())
    }
}
