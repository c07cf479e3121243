//! Audio track repository.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect, Set,
};

use super::base::{self, contains_ci, search_term};
use super::entities::{audio, story};
use super::mapping;
use crate::config::AUDIO_FILE_REQUIRED;
use crate::domain::{AudioFilter, AudioRequest, AudioResponse};
use crate::errors::{AppError, AppResult};
use crate::infra::storage::{BlobKind, BlobStore};
use crate::types::{PaginatedResponse, Pagination};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AudioRepository: Send + Sync {
    async fn get_by_id(&self, id: i32) -> AppResult<Option<AudioResponse>>;

    async fn get_paginated(
        &self,
        pagination: Pagination,
        filter: AudioFilter,
    ) -> AppResult<PaginatedResponse<AudioResponse>>;

    /// Validation error when the request carries no audio file
    async fn add(&self, request: AudioRequest) -> AppResult<AudioResponse>;

    async fn update(&self, id: i32, request: AudioRequest) -> AppResult<Option<AudioResponse>>;

    async fn delete(&self, id: i32) -> AppResult<()>;

    async fn soft_delete(&self, id: i32) -> AppResult<()>;
}

pub struct AudioStore {
    db: DatabaseConnection,
    blobs: Arc<BlobStore>,
    base_url: String,
}

impl AudioStore {
    pub fn new(db: DatabaseConnection, blobs: Arc<BlobStore>, base_url: impl Into<String>) -> Self {
        Self {
            db,
            blobs,
            base_url: base_url.into(),
        }
    }

    async fn story_titles<I>(&self, story_ids: I) -> AppResult<HashMap<i32, String>>
    where
        I: IntoIterator<Item = i32> + Send,
    {
        let rows: Vec<(i32, String)> = story::Entity::find()
            .select_only()
            .column(story::Column::Id)
            .column(story::Column::Title)
            .filter(story::Column::Id.is_in(story_ids))
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().collect())
    }

    async fn to_response(&self, model: audio::Model) -> AppResult<AudioResponse> {
        let mut titles = self.story_titles([model.story_id]).await?;
        let story_title = titles.remove(&model.story_id).unwrap_or_default();
        Ok(mapping::audio_response(model, story_title, &self.base_url))
    }
}

#[async_trait]
impl AudioRepository for AudioStore {
    async fn get_by_id(&self, id: i32) -> AppResult<Option<AudioResponse>> {
        match base::find_active::<audio::Entity, _>(&self.db, id).await? {
            Some(model) => Ok(Some(self.to_response(model).await?)),
            None => Ok(None),
        }
    }

    async fn get_paginated(
        &self,
        pagination: Pagination,
        filter: AudioFilter,
    ) -> AppResult<PaginatedResponse<AudioResponse>> {
        let mut query = audio::Entity::find();
        if let Some(story_id) = filter.story_id {
            query = query.filter(audio::Column::StoryId.eq(story_id));
        }
        if let Some(term) = search_term(&filter.search) {
            query = query.filter(contains_ci(audio::Column::Title, term));
        }

        let (models, total) = base::fetch_page(&self.db, query, pagination).await?;
        let titles = self
            .story_titles(models.iter().map(|m| m.story_id).collect::<Vec<_>>())
            .await?;

        let items = models
            .into_iter()
            .map(|model| {
                let story_title = titles.get(&model.story_id).cloned().unwrap_or_default();
                mapping::audio_response(model, story_title, &self.base_url)
            })
            .collect();

        Ok(PaginatedResponse::new(items, total, pagination))
    }

    async fn add(&self, request: AudioRequest) -> AppResult<AudioResponse> {
        let file = request
            .audio_file
            .ok_or_else(|| AppError::validation(AUDIO_FILE_REQUIRED))?;
        let path = self.blobs.save(BlobKind::Audio, file).await?;

        let now = Utc::now();
        let mut active = audio::ActiveModel {
            file_path: Set(path.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };
        mapping::apply_audio(&mut active, request.title, request.story_id, request.duration);

        let model = match active.insert(&self.db).await {
            Ok(model) => model,
            Err(e) => {
                self.blobs.remove(&path).await;
                return Err(e.into());
            }
        };
        tracing::info!(audio_id = model.id, story_id = model.story_id, "Audio created");

        self.to_response(model).await
    }

    async fn update(&self, id: i32, request: AudioRequest) -> AppResult<Option<AudioResponse>> {
        let Some(existing) = base::find_active::<audio::Entity, _>(&self.db, id).await? else {
            return Ok(None);
        };
        let old_path = existing.file_path.clone();
        let new_path = match request.audio_file {
            Some(file) => Some(self.blobs.save(BlobKind::Audio, file).await?),
            None => None,
        };

        let mut active: audio::ActiveModel = existing.into();
        mapping::apply_audio(&mut active, request.title, request.story_id, request.duration);
        if let Some(path) = &new_path {
            active.file_path = Set(path.clone());
        }
        active.updated_at = Set(Utc::now());

        let model = match active.update(&self.db).await {
            Ok(model) => model,
            Err(e) => {
                if let Some(path) = &new_path {
                    self.blobs.remove(path).await;
                }
                return Err(e.into());
            }
        };

        if new_path.is_some() {
            self.blobs.remove(&old_path).await;
        }
        tracing::debug!(audio_id = id, file_replaced = new_path.is_some(), "Audio updated");

        Ok(Some(self.to_response(model).await?))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let path: Option<String> = audio::Entity::find_by_id(id)
            .select_only()
            .column(audio::Column::FilePath)
            .into_tuple()
            .one(&self.db)
            .await?;

        base::hard_delete::<audio::Entity, _>(&self.db, id).await?;
        if let Some(path) = path {
            self.blobs.remove(&path).await;
        }

        tracing::info!(audio_id = id, "Audio deleted");
        Ok(())
    }

    async fn soft_delete(&self, id: i32) -> AppResult<()> {
        base::soft_delete::<audio::Entity, _>(&self.db, id).await?;
        tracing::info!(audio_id = id, "Audio soft deleted");
        Ok(())
    }
}
