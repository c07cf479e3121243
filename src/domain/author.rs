//! Author DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::config::MAX_NAME_LENGTH;

/// Create/update payload for an author
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRequest {
    /// Optional; must equal the path id on update
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(alias = "name")]
    #[validate(length(
        min = 1,
        max = MAX_NAME_LENGTH,
        message = "Author name is required and cannot exceed 255 characters."
    ))]
    #[schema(example = "Nam Cao")]
    pub author_name: String,
}

/// Author as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorResponse {
    pub id: i32,
    pub author_name: String,
    /// Live stories written by this author
    pub total_stories: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// List filter for `GET /api/author`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AuthorFilter {
    /// Case-insensitive substring of the author name
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_short_name_alias() {
        let request: AuthorRequest = serde_json::from_str(r#"{"name":"A"}"#).unwrap();
        assert_eq!(request.author_name, "A");
        assert_eq!(request.id, None);
    }

    #[test]
    fn test_empty_and_overlong_names_are_rejected() {
        let empty = AuthorRequest {
            id: None,
            author_name: String::new(),
        };
        assert!(empty.validate().is_err());

        let long = AuthorRequest {
            id: None,
            author_name: "x".repeat(256),
        };
        assert!(long.validate().is_err());
    }
}
