//! Story DTOs.
//!
//! Stories arrive as `multipart/form-data` so a cover image can travel with
//! the scalar fields; the form is parsed into [`StoryRequest`] by the
//! multipart extractor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::config::{MAX_NAME_LENGTH, MAX_TEXT_LENGTH};
use crate::types::UploadedFile;

/// Create/update payload for a story
#[derive(Debug, Validate)]
pub struct StoryRequest {
    pub id: Option<i32>,
    #[validate(length(
        min = 1,
        max = MAX_NAME_LENGTH,
        message = "Title is required and cannot exceed 255 characters."
    ))]
    pub title: String,
    #[validate(length(
        min = 1,
        max = MAX_TEXT_LENGTH,
        message = "Description is required and cannot exceed 1000 characters."
    ))]
    pub description: String,
    pub author_id: i32,
    pub category_id: i32,
    pub narrator_id: i32,
    /// New cover image; `None` keeps the current one on update
    pub cover_image: Option<UploadedFile>,
}

/// Story as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoryResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    /// Absolute URL of the cover image, null when none was uploaded
    pub cover_image_url: Option<String>,
    pub author_id: i32,
    pub author_name: String,
    pub category_id: i32,
    pub category_name: String,
    pub narrator_id: i32,
    pub narrator_name: String,
    pub listeners_count: i32,
    /// Live audio tracks of the story
    pub total_audios: i64,
    /// Mean of live ratings, 0 when unrated
    pub average_rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// List filter for `GET /api/story`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct StoryFilter {
    pub author_id: Option<i32>,
    pub category_id: Option<i32>,
    pub narrator_id: Option<i32>,
    /// Case-insensitive substring of the title or the description
    pub search_query: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> StoryRequest {
        StoryRequest {
            id: None,
            title: "S".to_string(),
            description: "D".to_string(),
            author_id: 1,
            category_id: 1,
            narrator_id: 1,
            cover_image: None,
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_every_violation_is_reported() {
        let invalid = StoryRequest {
            title: String::new(),
            description: "d".repeat(1001),
            ..request()
        };
        let errors = invalid.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 2);
    }

    #[test]
    fn test_filter_reads_camel_case_query() {
        let filter: StoryFilter =
            serde_json::from_str(r#"{"authorId":2,"searchQuery":"dragon"}"#).unwrap();
        assert_eq!(filter.author_id, Some(2));
        assert_eq!(filter.search_query.as_deref(), Some("dragon"));
        assert_eq!(filter.category_id, None);
    }
}
