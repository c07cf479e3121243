//! Story repository.
//!
//! Stories own a cover-image blob and, through cascading foreign keys, the
//! blobs of their audio tracks. Responses carry the author, category and
//! narrator names plus the live audio count and average rating, all loaded
//! with one batched query per relation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QuerySelect, Set,
};

use super::base::{self, contains_ci, search_term, SoftDeletable};
use super::entities::{audio, author, category, narrator, rating, story};
use super::mapping::{self, StoryRelations};
use crate::domain::{StoryFilter, StoryRequest, StoryResponse};
use crate::errors::AppResult;
use crate::infra::storage::{BlobKind, BlobStore};
use crate::types::{PaginatedResponse, Pagination};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Story repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait StoryRepository: Send + Sync {
    async fn get_by_id(&self, id: i32) -> AppResult<Option<StoryResponse>>;

    async fn get_paginated(
        &self,
        pagination: Pagination,
        filter: StoryFilter,
    ) -> AppResult<PaginatedResponse<StoryResponse>>;

    /// Store the optional cover image, then insert the row
    async fn add(&self, request: StoryRequest) -> AppResult<StoryResponse>;

    /// Replace the cover image only when a new one is supplied
    async fn update(&self, id: i32, request: StoryRequest) -> AppResult<Option<StoryResponse>>;

    /// Delete the row, its audio tracks and every blob they referenced
    async fn delete(&self, id: i32) -> AppResult<()>;

    async fn soft_delete(&self, id: i32) -> AppResult<()>;
}

pub struct StoryStore {
    db: DatabaseConnection,
    blobs: Arc<BlobStore>,
    base_url: String,
}

impl StoryStore {
    pub fn new(db: DatabaseConnection, blobs: Arc<BlobStore>, base_url: impl Into<String>) -> Self {
        Self {
            db,
            blobs,
            base_url: base_url.into(),
        }
    }

    /// Related names and aggregates for a batch of stories, keyed by story id.
    async fn load_relations(&self, stories: &[story::Model]) -> AppResult<HashMap<i32, StoryRelations>> {
        if stories.is_empty() {
            return Ok(HashMap::new());
        }

        let ids: Vec<i32> = stories.iter().map(|s| s.id).collect();

        let authors: HashMap<i32, String> = author::Entity::find()
            .select_only()
            .column(author::Column::Id)
            .column(author::Column::AuthorName)
            .filter(author::Column::Id.is_in(stories.iter().map(|s| s.author_id)))
            .into_tuple::<(i32, String)>()
            .all(&self.db)
            .await?
            .into_iter()
            .collect();

        let categories: HashMap<i32, String> = category::Entity::find()
            .select_only()
            .column(category::Column::Id)
            .column(category::Column::CategoryName)
            .filter(category::Column::Id.is_in(stories.iter().map(|s| s.category_id)))
            .into_tuple::<(i32, String)>()
            .all(&self.db)
            .await?
            .into_iter()
            .collect();

        let narrators: HashMap<i32, String> = narrator::Entity::find()
            .select_only()
            .column(narrator::Column::Id)
            .column(narrator::Column::NarratorName)
            .filter(narrator::Column::Id.is_in(stories.iter().map(|s| s.narrator_id)))
            .into_tuple::<(i32, String)>()
            .all(&self.db)
            .await?
            .into_iter()
            .collect();

        let audio_counts =
            base::count_live_children::<audio::Entity, _>(&self.db, audio::Column::StoryId, &ids)
                .await?;

        // (story_id, sum, count) over live ratings
        let ratings: HashMap<i32, (i64, i64)> = rating::Entity::live()
            .select_only()
            .column(rating::Column::StoryId)
            .column_as(Expr::col(rating::Column::RatingValue).sum(), "rating_sum")
            .column_as(Expr::col(rating::Column::Id).count(), "rating_count")
            .filter(rating::Column::StoryId.is_in(ids.iter().copied()))
            .group_by(rating::Column::StoryId)
            .into_tuple::<(i32, i64, i64)>()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|(story_id, sum, count)| (story_id, (sum, count)))
            .collect();

        Ok(stories
            .iter()
            .map(|s| {
                let (sum, count) = ratings.get(&s.id).copied().unwrap_or((0, 0));
                let relations = StoryRelations {
                    author_name: authors.get(&s.author_id).cloned().unwrap_or_default(),
                    category_name: categories.get(&s.category_id).cloned().unwrap_or_default(),
                    narrator_name: narrators.get(&s.narrator_id).cloned().unwrap_or_default(),
                    total_audios: audio_counts.get(&s.id).copied().unwrap_or(0),
                    average_rating: mapping::average_rating(sum, count),
                };
                (s.id, relations)
            })
            .collect())
    }

    async fn to_response(&self, model: story::Model) -> AppResult<StoryResponse> {
        let mut relations = self.load_relations(std::slice::from_ref(&model)).await?;
        let relations = relations.remove(&model.id).unwrap_or_default();
        Ok(mapping::story_response(model, relations, &self.base_url))
    }

    async fn save_cover(&self, request: &mut StoryRequest) -> AppResult<Option<String>> {
        match request.cover_image.take() {
            Some(file) => Ok(Some(self.blobs.save(BlobKind::CoverImage, file).await?)),
            None => Ok(None),
        }
    }
}

/// Blob paths owned by the stories matching `condition`: their cover images
/// and the files of all their audio tracks, soft-deleted rows included.
///
/// Collected before a delete that cascades through stories so the files can
/// be removed once the rows are gone.
pub(crate) async fn story_blob_paths<C>(db: &C, condition: SimpleExpr) -> AppResult<Vec<String>>
where
    C: ConnectionTrait,
{
    let stories: Vec<(i32, Option<String>)> = story::Entity::find()
        .select_only()
        .column(story::Column::Id)
        .column(story::Column::CoverImagePath)
        .filter(condition)
        .into_tuple()
        .all(db)
        .await?;

    if stories.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = stories.iter().map(|(id, _)| *id).collect();
    let mut paths: Vec<String> = stories.into_iter().filter_map(|(_, path)| path).collect();

    let audio_paths: Vec<String> = audio::Entity::find()
        .select_only()
        .column(audio::Column::FilePath)
        .filter(audio::Column::StoryId.is_in(ids))
        .into_tuple()
        .all(db)
        .await?;
    paths.extend(audio_paths);

    Ok(paths)
}

#[async_trait]
impl StoryRepository for StoryStore {
    async fn get_by_id(&self, id: i32) -> AppResult<Option<StoryResponse>> {
        match base::find_active::<story::Entity, _>(&self.db, id).await? {
            Some(model) => Ok(Some(self.to_response(model).await?)),
            None => Ok(None),
        }
    }

    async fn get_paginated(
        &self,
        pagination: Pagination,
        filter: StoryFilter,
    ) -> AppResult<PaginatedResponse<StoryResponse>> {
        let mut query = story::Entity::find();
        if let Some(author_id) = filter.author_id {
            query = query.filter(story::Column::AuthorId.eq(author_id));
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(story::Column::CategoryId.eq(category_id));
        }
        if let Some(narrator_id) = filter.narrator_id {
            query = query.filter(story::Column::NarratorId.eq(narrator_id));
        }
        if let Some(term) = search_term(&filter.search_query) {
            query = query.filter(
                Condition::any()
                    .add(contains_ci(story::Column::Title, term))
                    .add(contains_ci(story::Column::Description, term)),
            );
        }

        let (models, total) = base::fetch_page(&self.db, query, pagination).await?;
        let mut relations = self.load_relations(&models).await?;

        let items = models
            .into_iter()
            .map(|model| {
                let related = relations.remove(&model.id).unwrap_or_default();
                mapping::story_response(model, related, &self.base_url)
            })
            .collect();

        Ok(PaginatedResponse::new(items, total, pagination))
    }

    async fn add(&self, mut request: StoryRequest) -> AppResult<StoryResponse> {
        let cover = self.save_cover(&mut request).await?;

        let now = Utc::now();
        let mut active = story::ActiveModel {
            cover_image_path: Set(cover.clone()),
            listeners_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };
        mapping::apply_story(&mut active, &request);

        let model = match active.insert(&self.db).await {
            Ok(model) => model,
            Err(e) => {
                if let Some(path) = &cover {
                    self.blobs.remove(path).await;
                }
                return Err(e.into());
            }
        };
        tracing::info!(story_id = model.id, "Story created");

        self.to_response(model).await
    }

    async fn update(&self, id: i32, mut request: StoryRequest) -> AppResult<Option<StoryResponse>> {
        let Some(existing) = base::find_active::<story::Entity, _>(&self.db, id).await? else {
            return Ok(None);
        };
        let old_cover = existing.cover_image_path.clone();
        let new_cover = self.save_cover(&mut request).await?;

        let mut active: story::ActiveModel = existing.into();
        mapping::apply_story(&mut active, &request);
        if let Some(path) = &new_cover {
            active.cover_image_path = Set(Some(path.clone()));
        }
        active.updated_at = Set(Utc::now());

        let model = match active.update(&self.db).await {
            Ok(model) => model,
            Err(e) => {
                if let Some(path) = &new_cover {
                    self.blobs.remove(path).await;
                }
                return Err(e.into());
            }
        };

        if let (Some(_), Some(old)) = (&new_cover, &old_cover) {
            self.blobs.remove(old).await;
        }
        tracing::debug!(story_id = id, cover_replaced = new_cover.is_some(), "Story updated");

        Ok(Some(self.to_response(model).await?))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let blobs = story_blob_paths(&self.db, story::Column::Id.eq(id)).await?;

        base::hard_delete::<story::Entity, _>(&self.db, id).await?;
        self.blobs.remove_all(blobs).await;

        tracing::info!(story_id = id, "Story deleted");
        Ok(())
    }

    async fn soft_delete(&self, id: i32) -> AppResult<()> {
        base::soft_delete::<story::Entity, _>(&self.db, id).await?;
        tracing::info!(story_id = id, "Story soft deleted");
        Ok(())
    }
}
