//! Narrator DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::config::MAX_NAME_LENGTH;

#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NarratorRequest {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(alias = "name")]
    #[validate(length(
        min = 1,
        max = MAX_NAME_LENGTH,
        message = "Narrator name is required and cannot exceed 255 characters."
    ))]
    pub narrator_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NarratorResponse {
    pub id: i32,
    pub narrator_name: String,
    pub total_stories: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct NarratorFilter {
    pub search: Option<String>,
}
