//! Category handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{delete, get},
    Router,
};

use super::ensure_matching_id;
use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{CategoryFilter, CategoryRequest, CategoryResponse};
use crate::errors::{AppResult, OptionExt};
use crate::types::{Created, NoContent, PageQuery, PaginatedCategories};

/// Create category routes
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
        .route("/soft-delete/:id", delete(soft_delete_category))
        .route("/soft/:id", delete(soft_delete_category))
}

/// Get category by ID
#[utoipa::path(
    get,
    path = "/api/category/{id}",
    tag = "Categories",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category found", body = CategoryResponse),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<CategoryResponse>> {
    let category = state.uow.categories().get_by_id(id).await?.ok_or_not_found()?;
    Ok(Json(category))
}

/// List categories page by page
#[utoipa::path(
    get,
    path = "/api/category",
    tag = "Categories",
    params(PageQuery, CategoryFilter),
    responses(
        (status = 200, description = "One page of categories", body = PaginatedCategories)
    )
)]
pub async fn list_categories(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    Query(filter): Query<CategoryFilter>,
) -> AppResult<Json<PaginatedCategories>> {
    let categories = state
        .uow
        .categories()
        .get_paginated(page.pagination(), filter)
        .await?;
    Ok(Json(categories))
}

/// Create a category
#[utoipa::path(
    post,
    path = "/api/category",
    tag = "Categories",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Validation error")
    )
)]
pub async fn create_category(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CategoryRequest>,
) -> AppResult<Created<CategoryResponse>> {
    let category = state.uow.categories().add(payload).await?;
    Ok(Created::new(format!("/api/category/{}", category.id), category))
}

/// Update a category
#[utoipa::path(
    put,
    path = "/api/category/{id}",
    tag = "Categories",
    params(("id" = i32, Path, description = "Category ID")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 400, description = "Validation error or ID mismatch"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<CategoryRequest>,
) -> AppResult<Json<CategoryResponse>> {
    ensure_matching_id(id, payload.id)?;
    let category = state
        .uow
        .categories()
        .update(id, payload)
        .await?
        .ok_or_not_found()?;
    Ok(Json(category))
}

/// Permanently delete a category with its stories
#[utoipa::path(
    delete,
    path = "/api/category/{id}",
    tag = "Categories",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    state.uow.categories().delete(id).await?;
    Ok(NoContent)
}

/// Soft delete a category (also reachable at `/api/category/soft/{id}`)
#[utoipa::path(
    delete,
    path = "/api/category/soft-delete/{id}",
    tag = "Categories",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category soft deleted"),
        (status = 404, description = "Category not found or already deleted")
    )
)]
pub async fn soft_delete_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    state.uow.categories().soft_delete(id).await?;
    Ok(NoContent)
}
