//! Audio track DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::config::MAX_NAME_LENGTH;
use crate::types::UploadedFile;

/// Create/update payload for an audio track (multipart form)
#[derive(Debug, Validate)]
pub struct AudioRequest {
    pub id: Option<i32>,
    #[validate(length(
        min = 1,
        max = MAX_NAME_LENGTH,
        message = "Title is required and cannot exceed 255 characters."
    ))]
    pub title: String,
    pub story_id: i32,
    /// Length in seconds
    #[validate(range(min = 0, message = "Duration cannot be negative."))]
    pub duration: i32,
    /// Required when adding, optional when updating
    pub audio_file: Option<UploadedFile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AudioResponse {
    pub id: i32,
    pub story_id: i32,
    pub story_title: String,
    pub title: String,
    pub audio_file_url: String,
    pub duration: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AudioFilter {
    pub story_id: Option<i32>,
    /// Case-insensitive substring of the track title
    pub search: Option<String>,
}
