//! Author handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{delete, get},
    Router,
};

use super::ensure_matching_id;
use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{AuthorFilter, AuthorRequest, AuthorResponse};
use crate::errors::{AppResult, OptionExt};
use crate::types::{Created, NoContent, PageQuery, PaginatedAuthors};

/// Create author routes
pub fn author_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_authors).post(create_author))
        .route(
            "/:id",
            get(get_author).put(update_author).delete(delete_author),
        )
        .route("/soft-delete/:id", delete(soft_delete_author))
        .route("/soft/:id", delete(soft_delete_author))
}

/// Get author by ID
#[utoipa::path(
    get,
    path = "/api/author/{id}",
    tag = "Authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author found", body = AuthorResponse),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<AuthorResponse>> {
    let author = state.uow.authors().get_by_id(id).await?.ok_or_not_found()?;
    Ok(Json(author))
}

/// List authors page by page
#[utoipa::path(
    get,
    path = "/api/author",
    tag = "Authors",
    params(PageQuery, AuthorFilter),
    responses(
        (status = 200, description = "One page of authors", body = PaginatedAuthors)
    )
)]
pub async fn list_authors(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    Query(filter): Query<AuthorFilter>,
) -> AppResult<Json<PaginatedAuthors>> {
    let authors = state
        .uow
        .authors()
        .get_paginated(page.pagination(), filter)
        .await?;
    Ok(Json(authors))
}

/// Create an author
#[utoipa::path(
    post,
    path = "/api/author",
    tag = "Authors",
    request_body = AuthorRequest,
    responses(
        (status = 201, description = "Author created", body = AuthorResponse),
        (status = 400, description = "Validation error")
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AuthorRequest>,
) -> AppResult<Created<AuthorResponse>> {
    let author = state.uow.authors().add(payload).await?;
    Ok(Created::new(format!("/api/author/{}", author.id), author))
}

/// Update an author
#[utoipa::path(
    put,
    path = "/api/author/{id}",
    tag = "Authors",
    params(("id" = i32, Path, description = "Author ID")),
    request_body = AuthorRequest,
    responses(
        (status = 200, description = "Author updated", body = AuthorResponse),
        (status = 400, description = "Validation error or ID mismatch"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<AuthorRequest>,
) -> AppResult<Json<AuthorResponse>> {
    ensure_matching_id(id, payload.id)?;
    let author = state
        .uow
        .authors()
        .update(id, payload)
        .await?
        .ok_or_not_found()?;
    Ok(Json(author))
}

/// Permanently delete an author with its stories
#[utoipa::path(
    delete,
    path = "/api/author/{id}",
    tag = "Authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    state.uow.authors().delete(id).await?;
    Ok(NoContent)
}

/// Soft delete an author (also reachable at `/api/author/soft/{id}`)
#[utoipa::path(
    delete,
    path = "/api/author/soft-delete/{id}",
    tag = "Authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Author soft deleted"),
        (status = 404, description = "Author not found or already deleted")
    )
)]
pub async fn soft_delete_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    state.uow.authors().soft_delete(id).await?;
    Ok(NoContent)
}
