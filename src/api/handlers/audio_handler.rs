//! Audio track handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{delete, get},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use super::ensure_matching_id;
use crate::api::extractors::{FromMultipart, MultipartForm, ValidatedMultipart};
use crate::api::AppState;
use crate::config::AUDIO_FILE_REQUIRED;
use crate::domain::{AudioFilter, AudioRequest, AudioResponse};
use crate::errors::{AppResult, OptionExt};
use crate::types::{Created, NoContent, PageQuery, PaginatedAudios};

impl FromMultipart for AudioRequest {
    fn from_form(form: &mut MultipartForm, errors: &mut Vec<String>) -> Self {
        Self {
            id: form.optional_i32("id", "ID", errors),
            title: form.text_or_default("title"),
            story_id: form.required_i32("storyId", "Story ID", errors),
            duration: form.optional_i32("duration", "Duration", errors).unwrap_or(0),
            audio_file: form.file("audioFile"),
        }
    }
}

/// Audio form for create, where the file is mandatory
pub struct NewAudio(pub AudioRequest);

impl FromMultipart for NewAudio {
    fn from_form(form: &mut MultipartForm, errors: &mut Vec<String>) -> Self {
        let request = AudioRequest::from_form(form, errors);
        if request.audio_file.is_none() {
            errors.push(AUDIO_FILE_REQUIRED.to_string());
        }
        Self(request)
    }
}

impl Validate for NewAudio {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.0.validate()
    }
}

/// Multipart form accepted by audio create/update (documentation only)
#[allow(dead_code)]
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AudioForm {
    id: Option<i32>,
    title: String,
    story_id: i32,
    /// Seconds
    duration: Option<i32>,
    /// Required on create, optional on update
    #[schema(format = Binary)]
    audio_file: Option<String>,
}

pub fn audio_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_audios).post(create_audio))
        .route("/:id", get(get_audio).put(update_audio).delete(delete_audio))
        .route("/soft-delete/:id", delete(soft_delete_audio))
        .route("/soft/:id", delete(soft_delete_audio))
}

#[utoipa::path(
    get,
    path = "/api/audio/{id}",
    tag = "Audio",
    params(("id" = i32, Path, description = "Audio ID")),
    responses(
        (status = 200, description = "Audio track found", body = AudioResponse),
        (status = 404, description = "Audio track not found")
    )
)]
pub async fn get_audio(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<AudioResponse>> {
    let audio = state.uow.audios().get_by_id(id).await?.ok_or_not_found()?;
    Ok(Json(audio))
}

#[utoipa::path(
    get,
    path = "/api/audio",
    tag = "Audio",
    params(PageQuery, AudioFilter),
    responses(
        (status = 200, description = "One page of audio tracks", body = PaginatedAudios)
    )
)]
pub async fn list_audios(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    Query(filter): Query<AudioFilter>,
) -> AppResult<Json<PaginatedAudios>> {
    let audios = state
        .uow
        .audios()
        .get_paginated(page.pagination(), filter)
        .await?;
    Ok(Json(audios))
}

#[utoipa::path(
    post,
    path = "/api/audio",
    tag = "Audio",
    request_body(content = AudioForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Audio track created", body = AudioResponse),
        (status = 400, description = "Validation error, missing file or unknown story")
    )
)]
pub async fn create_audio(
    State(state): State<AppState>,
    ValidatedMultipart(NewAudio(payload)): ValidatedMultipart<NewAudio>,
) -> AppResult<Created<AudioResponse>> {
    let audio = state.uow.audios().add(payload).await?;
    Ok(Created::new(format!("/api/audio/{}", audio.id), audio))
}

#[utoipa::path(
    put,
    path = "/api/audio/{id}",
    tag = "Audio",
    params(("id" = i32, Path, description = "Audio ID")),
    request_body(content = AudioForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Audio track updated", body = AudioResponse),
        (status = 400, description = "Validation error or ID mismatch"),
        (status = 404, description = "Audio track not found")
    )
)]
pub async fn update_audio(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedMultipart(payload): ValidatedMultipart<AudioRequest>,
) -> AppResult<Json<AudioResponse>> {
    ensure_matching_id(id, payload.id)?;
    let audio = state
        .uow
        .audios()
        .update(id, payload)
        .await?
        .ok_or_not_found()?;
    Ok(Json(audio))
}

#[utoipa::path(
    delete,
    path = "/api/audio/{id}",
    tag = "Audio",
    params(("id" = i32, Path, description = "Audio ID")),
    responses(
        (status = 204, description = "Audio track and its file deleted"),
        (status = 404, description = "Audio track not found")
    )
)]
pub async fn delete_audio(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    state.uow.audios().delete(id).await?;
    Ok(NoContent)
}

#[utoipa::path(
    delete,
    path = "/api/audio/soft-delete/{id}",
    tag = "Audio",
    params(("id" = i32, Path, description = "Audio ID")),
    responses(
        (status = 204, description = "Audio track soft deleted"),
        (status = 404, description = "Audio track not found or already deleted")
    )
)]
pub async fn soft_delete_audio(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    state.uow.audios().soft_delete(id).await?;
    Ok(NoContent)
}
