//! Story handlers.
//!
//! Create and update take `multipart/form-data` so the cover image travels
//! with the scalar fields.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{delete, get},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;

use super::ensure_matching_id;
use crate::api::extractors::{FromMultipart, MultipartForm, ValidatedMultipart};
use crate::api::AppState;
use crate::domain::{StoryFilter, StoryRequest, StoryResponse};
use crate::errors::{AppResult, OptionExt};
use crate::types::{Created, NoContent, PageQuery, PaginatedStories};

impl FromMultipart for StoryRequest {
    fn from_form(form: &mut MultipartForm, errors: &mut Vec<String>) -> Self {
        Self {
            id: form.optional_i32("id", "ID", errors),
            title: form.text_or_default("title"),
            description: form.text_or_default("description"),
            author_id: form.required_i32("authorId", "Author ID", errors),
            category_id: form.required_i32("categoryId", "Category ID", errors),
            narrator_id: form.required_i32("narratorId", "Narrator ID", errors),
            cover_image: form
                .file("coverImageFile")
                .or_else(|| form.file("coverImage")),
        }
    }
}

/// Multipart form accepted by story create/update (documentation only)
#[allow(dead_code)]
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoryForm {
    id: Option<i32>,
    title: String,
    description: String,
    author_id: i32,
    category_id: i32,
    narrator_id: i32,
    /// Optional on update; the current cover is kept when omitted
    #[schema(format = Binary)]
    cover_image_file: Option<String>,
}

pub fn story_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_stories).post(create_story))
        .route("/:id", get(get_story).put(update_story).delete(delete_story))
        .route("/soft-delete/:id", delete(soft_delete_story))
        .route("/soft/:id", delete(soft_delete_story))
}

#[utoipa::path(
    get,
    path = "/api/story/{id}",
    tag = "Stories",
    params(("id" = i32, Path, description = "Story ID")),
    responses(
        (status = 200, description = "Story with names, audio count and average rating", body = StoryResponse),
        (status = 404, description = "Story not found")
    )
)]
pub async fn get_story(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<StoryResponse>> {
    let story = state.uow.stories().get_by_id(id).await?.ok_or_not_found()?;
    Ok(Json(story))
}

#[utoipa::path(
    get,
    path = "/api/story",
    tag = "Stories",
    params(PageQuery, StoryFilter),
    responses(
        (status = 200, description = "One page of stories", body = PaginatedStories)
    )
)]
pub async fn list_stories(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    Query(filter): Query<StoryFilter>,
) -> AppResult<Json<PaginatedStories>> {
    tracing::debug!(?filter, "Listing stories");
    let stories = state
        .uow
        .stories()
        .get_paginated(page.pagination(), filter)
        .await?;
    Ok(Json(stories))
}

#[utoipa::path(
    post,
    path = "/api/story",
    tag = "Stories",
    request_body(content = StoryForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Story created", body = StoryResponse),
        (status = 400, description = "Validation error or unknown author, category or narrator")
    )
)]
pub async fn create_story(
    State(state): State<AppState>,
    ValidatedMultipart(payload): ValidatedMultipart<StoryRequest>,
) -> AppResult<Created<StoryResponse>> {
    let story = state.uow.stories().add(payload).await?;
    Ok(Created::new(format!("/api/story/{}", story.id), story))
}

#[utoipa::path(
    put,
    path = "/api/story/{id}",
    tag = "Stories",
    params(("id" = i32, Path, description = "Story ID")),
    request_body(content = StoryForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Story updated", body = StoryResponse),
        (status = 400, description = "Validation error or ID mismatch"),
        (status = 404, description = "Story not found")
    )
)]
pub async fn update_story(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedMultipart(payload): ValidatedMultipart<StoryRequest>,
) -> AppResult<Json<StoryResponse>> {
    ensure_matching_id(id, payload.id)?;
    let story = state
        .uow
        .stories()
        .update(id, payload)
        .await?
        .ok_or_not_found()?;
    Ok(Json(story))
}

/// Deletes the story, its audio tracks and ratings, and their files
#[utoipa::path(
    delete,
    path = "/api/story/{id}",
    tag = "Stories",
    params(("id" = i32, Path, description = "Story ID")),
    responses(
        (status = 204, description = "Story deleted"),
        (status = 404, description = "Story not found")
    )
)]
pub async fn delete_story(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    state.uow.stories().delete(id).await?;
    Ok(NoContent)
}

#[utoipa::path(
    delete,
    path = "/api/story/soft-delete/{id}",
    tag = "Stories",
    params(("id" = i32, Path, description = "Story ID")),
    responses(
        (status = 204, description = "Story soft deleted"),
        (status = 404, description = "Story not found or already deleted")
    )
)]
pub async fn soft_delete_story(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    state.uow.stories().soft_delete(id).await?;
    Ok(NoContent)
}
