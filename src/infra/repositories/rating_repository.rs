//! Rating repository.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect, Set,
};

use super::base::{self, contains_ci, search_term};
use super::entities::{account, rating, story};
use super::mapping;
use crate::domain::{RatingFilter, RatingRequest, RatingResponse};
use crate::errors::AppResult;
use crate::types::{PaginatedResponse, Pagination};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RatingRepository: Send + Sync {
    async fn get_by_id(&self, id: i32) -> AppResult<Option<RatingResponse>>;

    async fn get_paginated(
        &self,
        pagination: Pagination,
        filter: RatingFilter,
    ) -> AppResult<PaginatedResponse<RatingResponse>>;

    async fn add(&self, request: RatingRequest) -> AppResult<RatingResponse>;

    async fn update(&self, id: i32, request: RatingRequest) -> AppResult<Option<RatingResponse>>;

    async fn delete(&self, id: i32) -> AppResult<()>;

    async fn soft_delete(&self, id: i32) -> AppResult<()>;
}

pub struct RatingStore {
    db: DatabaseConnection,
}

impl RatingStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Usernames and story titles for the given ratings
    async fn lookup_names(
        &self,
        ratings: &[rating::Model],
    ) -> AppResult<(HashMap<i32, String>, HashMap<i32, String>)> {
        if ratings.is_empty() {
            return Ok((HashMap::new(), HashMap::new()));
        }

        let usernames: Vec<(i32, String)> = account::Entity::find()
            .select_only()
            .column(account::Column::Id)
            .column(account::Column::Username)
            .filter(account::Column::Id.is_in(ratings.iter().map(|r| r.account_id)))
            .into_tuple()
            .all(&self.db)
            .await?;

        let titles: Vec<(i32, String)> = story::Entity::find()
            .select_only()
            .column(story::Column::Id)
            .column(story::Column::Title)
            .filter(story::Column::Id.is_in(ratings.iter().map(|r| r.story_id)))
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok((usernames.into_iter().collect(), titles.into_iter().collect()))
    }

    async fn to_response(&self, model: rating::Model) -> AppResult<RatingResponse> {
        let (usernames, titles) = self.lookup_names(std::slice::from_ref(&model)).await?;
        let username = usernames.get(&model.account_id).cloned().unwrap_or_default();
        let story_title = titles.get(&model.story_id).cloned().unwrap_or_default();
        Ok(mapping::rating_response(model, username, story_title))
    }
}

#[async_trait]
impl RatingRepository for RatingStore {
    async fn get_by_id(&self, id: i32) -> AppResult<Option<RatingResponse>> {
        match base::find_active::<rating::Entity, _>(&self.db, id).await? {
            Some(model) => Ok(Some(self.to_response(model).await?)),
            None => Ok(None),
        }
    }

    async fn get_paginated(
        &self,
        pagination: Pagination,
        filter: RatingFilter,
    ) -> AppResult<PaginatedResponse<RatingResponse>> {
        let mut query = rating::Entity::find();
        if let Some(story_id) = filter.story_id {
            query = query.filter(rating::Column::StoryId.eq(story_id));
        }
        if let Some(account_id) = filter.account_id {
            query = query.filter(rating::Column::AccountId.eq(account_id));
        }
        if let Some(term) = search_term(&filter.search) {
            query = query.filter(contains_ci(rating::Column::Comment, term));
        }

        let (models, total) = base::fetch_page(&self.db, query, pagination).await?;
        let (usernames, titles) = self.lookup_names(&models).await?;

        let items = models
            .into_iter()
            .map(|model| {
                let username = usernames.get(&model.account_id).cloned().unwrap_or_default();
                let story_title = titles.get(&model.story_id).cloned().unwrap_or_default();
                mapping::rating_response(model, username, story_title)
            })
            .collect();

        Ok(PaginatedResponse::new(items, total, pagination))
    }

    async fn add(&self, request: RatingRequest) -> AppResult<RatingResponse> {
        let now = Utc::now();
        let mut active = rating::ActiveModel {
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };
        mapping::apply_rating(&mut active, request);

        let model = active.insert(&self.db).await?;
        tracing::info!(
            rating_id = model.id,
            story_id = model.story_id,
            account_id = model.account_id,
            "Rating created"
        );

        self.to_response(model).await
    }

    async fn update(&self, id: i32, request: RatingRequest) -> AppResult<Option<RatingResponse>> {
        let Some(existing) = base::find_active::<rating::Entity, _>(&self.db, id).await? else {
            return Ok(None);
        };

        let mut active: rating::ActiveModel = existing.into();
        mapping::apply_rating(&mut active, request);
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Some(self.to_response(model).await?))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        base::hard_delete::<rating::Entity, _>(&self.db, id).await?;
        tracing::info!(rating_id = id, "Rating deleted");
        Ok(())
    }

    async fn soft_delete(&self, id: i32) -> AppResult<()> {
        base::soft_delete::<rating::Entity, _>(&self.db, id).await
    }
}
