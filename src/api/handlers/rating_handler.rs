//! Rating handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{delete, get},
    Router,
};

use super::ensure_matching_id;
use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{RatingFilter, RatingRequest, RatingResponse};
use crate::errors::{AppResult, OptionExt};
use crate::types::{Created, NoContent, PageQuery, PaginatedRatings};

pub fn rating_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_ratings).post(create_rating))
        .route("/:id", get(get_rating).put(update_rating).delete(delete_rating))
        .route("/soft-delete/:id", delete(soft_delete_rating))
        .route("/soft/:id", delete(soft_delete_rating))
}

#[utoipa::path(
    get,
    path = "/api/rating/{id}",
    tag = "Ratings",
    params(("id" = i32, Path, description = "Rating ID")),
    responses(
        (status = 200, description = "Rating found", body = RatingResponse),
        (status = 404, description = "Rating not found")
    )
)]
pub async fn get_rating(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<RatingResponse>> {
    let rating = state.uow.ratings().get_by_id(id).await?.ok_or_not_found()?;
    Ok(Json(rating))
}

#[utoipa::path(
    get,
    path = "/api/rating",
    tag = "Ratings",
    params(PageQuery, RatingFilter),
    responses(
        (status = 200, description = "One page of ratings", body = PaginatedRatings)
    )
)]
pub async fn list_ratings(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    Query(filter): Query<RatingFilter>,
) -> AppResult<Json<PaginatedRatings>> {
    let ratings = state
        .uow
        .ratings()
        .get_paginated(page.pagination(), filter)
        .await?;
    Ok(Json(ratings))
}

#[utoipa::path(
    post,
    path = "/api/rating",
    tag = "Ratings",
    request_body = RatingRequest,
    responses(
        (status = 201, description = "Rating created", body = RatingResponse),
        (status = 400, description = "Validation error or unknown account or story")
    )
)]
pub async fn create_rating(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RatingRequest>,
) -> AppResult<Created<RatingResponse>> {
    let rating = state.uow.ratings().add(payload).await?;
    Ok(Created::new(format!("/api/rating/{}", rating.id), rating))
}

#[utoipa::path(
    put,
    path = "/api/rating/{id}",
    tag = "Ratings",
    params(("id" = i32, Path, description = "Rating ID")),
    request_body = RatingRequest,
    responses(
        (status = 200, description = "Rating updated", body = RatingResponse),
        (status = 400, description = "Validation error or ID mismatch"),
        (status = 404, description = "Rating not found")
    )
)]
pub async fn update_rating(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<RatingRequest>,
) -> AppResult<Json<RatingResponse>> {
    ensure_matching_id(id, payload.id)?;
    let rating = state
        .uow
        .ratings()
        .update(id, payload)
        .await?
        .ok_or_not_found()?;
    Ok(Json(rating))
}

#[utoipa::path(
    delete,
    path = "/api/rating/{id}",
    tag = "Ratings",
    params(("id" = i32, Path, description = "Rating ID")),
    responses(
        (status = 204, description = "Rating deleted"),
        (status = 404, description = "Rating not found")
    )
)]
pub async fn delete_rating(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    state.uow.ratings().delete(id).await?;
    Ok(NoContent)
}

#[utoipa::path(
    delete,
    path = "/api/rating/soft-delete/{id}",
    tag = "Ratings",
    params(("id" = i32, Path, description = "Rating ID")),
    responses(
        (status = 204, description = "Rating soft deleted"),
        (status = 404, description = "Rating not found or already deleted")
    )
)]
pub async fn soft_delete_rating(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    state.uow.ratings().soft_delete(id).await?;
    Ok(NoContent)
}
