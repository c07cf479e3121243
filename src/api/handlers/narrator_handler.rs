//! Narrator handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{delete, get},
    Router,
};

use super::ensure_matching_id;
use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{NarratorFilter, NarratorRequest, NarratorResponse};
use crate::errors::{AppResult, OptionExt};
use crate::types::{Created, NoContent, PageQuery, PaginatedNarrators};

/// Create narrator routes
pub fn narrator_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_narrators).post(create_narrator))
        .route(
            "/:id",
            get(get_narrator).put(update_narrator).delete(delete_narrator),
        )
        .route("/soft-delete/:id", delete(soft_delete_narrator))
        .route("/soft/:id", delete(soft_delete_narrator))
}

/// Get narrator by ID
#[utoipa::path(
    get,
    path = "/api/narrator/{id}",
    tag = "Narrators",
    params(("id" = i32, Path, description = "Narrator ID")),
    responses(
        (status = 200, description = "Narrator found", body = NarratorResponse),
        (status = 404, description = "Narrator not found")
    )
)]
pub async fn get_narrator(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<NarratorResponse>> {
    let narrator = state.uow.narrators().get_by_id(id).await?.ok_or_not_found()?;
    Ok(Json(narrator))
}

/// List narrators page by page
#[utoipa::path(
    get,
    path = "/api/narrator",
    tag = "Narrators",
    params(PageQuery, NarratorFilter),
    responses(
        (status = 200, description = "One page of narrators", body = PaginatedNarrators)
    )
)]
pub async fn list_narrators(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    Query(filter): Query<NarratorFilter>,
) -> AppResult<Json<PaginatedNarrators>> {
    let narrators = state
        .uow
        .narrators()
        .get_paginated(page.pagination(), filter)
        .await?;
    Ok(Json(narrators))
}

/// Create a narrator
#[utoipa::path(
    post,
    path = "/api/narrator",
    tag = "Narrators",
    request_body = NarratorRequest,
    responses(
        (status = 201, description = "Narrator created", body = NarratorResponse),
        (status = 400, description = "Validation error")
    )
)]
pub async fn create_narrator(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NarratorRequest>,
) -> AppResult<Created<NarratorResponse>> {
    let narrator = state.uow.narrators().add(payload).await?;
    Ok(Created::new(format!("/api/narrator/{}", narrator.id), narrator))
}

/// Update a narrator
#[utoipa::path(
    put,
    path = "/api/narrator/{id}",
    tag = "Narrators",
    params(("id" = i32, Path, description = "Narrator ID")),
    request_body = NarratorRequest,
    responses(
        (status = 200, description = "Narrator updated", body = NarratorResponse),
        (status = 400, description = "Validation error or ID mismatch"),
        (status = 404, description = "Narrator not found")
    )
)]
pub async fn update_narrator(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<NarratorRequest>,
) -> AppResult<Json<NarratorResponse>> {
    ensure_matching_id(id, payload.id)?;
    let narrator = state
        .uow
        .narrators()
        .update(id, payload)
        .await?
        .ok_or_not_found()?;
    Ok(Json(narrator))
}

/// Permanently delete a narrator with its stories
#[utoipa::path(
    delete,
    path = "/api/narrator/{id}",
    tag = "Narrators",
    params(("id" = i32, Path, description = "Narrator ID")),
    responses(
        (status = 204, description = "Narrator deleted"),
        (status = 404, description = "Narrator not found")
    )
)]
pub async fn delete_narrator(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    state.uow.narrators().delete(id).await?;
    Ok(NoContent)
}

/// Soft delete a narrator (also reachable at `/api/narrator/soft/{id}`)
#[utoipa::path(
    delete,
    path = "/api/narrator/soft-delete/{id}",
    tag = "Narrators",
    params(("id" = i32, Path, description = "Narrator ID")),
    responses(
        (status = 204, description = "Narrator soft deleted"),
        (status = 404, description = "Narrator not found or already deleted")
    )
)]
pub async fn soft_delete_narrator(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    state.uow.narrators().soft_delete(id).await?;
    Ok(NoContent)
}
