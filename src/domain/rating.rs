//! Rating DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::config::{MAX_RATING_VALUE, MAX_TEXT_LENGTH, MIN_RATING_VALUE};

#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingRequest {
    #[serde(default)]
    pub id: Option<i32>,
    pub account_id: i32,
    pub story_id: i32,
    #[validate(range(
        min = MIN_RATING_VALUE,
        max = MAX_RATING_VALUE,
        message = "Rating value must be between 1 and 5."
    ))]
    #[schema(example = 5, minimum = 1, maximum = 5)]
    pub rating_value: i32,
    #[serde(default)]
    #[validate(length(max = MAX_TEXT_LENGTH, message = "Comment cannot exceed 1000 characters."))]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingResponse {
    pub id: i32,
    pub account_id: i32,
    pub username: String,
    pub story_id: i32,
    pub story_title: String,
    pub rating_value: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RatingFilter {
    pub story_id: Option<i32>,
    pub account_id: Option<i32>,
    /// Case-insensitive substring of the comment
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_value_bounds() {
        let mut request = RatingRequest {
            id: None,
            account_id: 1,
            story_id: 1,
            rating_value: 5,
            comment: None,
        };
        assert!(request.validate().is_ok());

        request.rating_value = 0;
        assert!(request.validate().is_err());

        request.rating_value = 6;
        assert!(request.validate().is_err());
    }
}
