//! Conversions between database models and API shapes.
//!
//! Entity → response functions add the relation-derived fields (names,
//! counts, averages) and turn stored blob paths into public URLs.
//! Request → active model functions never touch ids or audit timestamps;
//! the repositories stamp those.

use sea_orm::ActiveValue::Set;

use super::entities::{account, audio, author, category, narrator, rating, story};
use crate::domain::{
    AccountResponse, AudioResponse, AuthorRequest, AuthorResponse, CategoryRequest,
    CategoryResponse, NarratorRequest, NarratorResponse, RatingRequest, RatingResponse, Role,
    StoryRequest, StoryResponse,
};

/// Absolute URL for a stored blob path.
pub fn public_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Mean rating, 0 when there are no ratings.
pub fn average_rating(sum: i64, count: i64) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

// ---------------------------------------------------------------------------
// Author / Category / Narrator
// ---------------------------------------------------------------------------

pub fn author_response(model: author::Model, total_stories: i64) -> AuthorResponse {
    AuthorResponse {
        id: model.id,
        author_name: model.author_name,
        total_stories,
        created_at: model.created_at,
        updated_at: model.updated_at,
        deleted_at: model.deleted_at,
    }
}

pub fn apply_author(active: &mut author::ActiveModel, request: AuthorRequest) {
    active.author_name = Set(request.author_name);
}

pub fn category_response(model: category::Model, total_stories: i64) -> CategoryResponse {
    CategoryResponse {
        id: model.id,
        category_name: model.category_name,
        total_stories,
        created_at: model.created_at,
        updated_at: model.updated_at,
        deleted_at: model.deleted_at,
    }
}

pub fn apply_category(active: &mut category::ActiveModel, request: CategoryRequest) {
    active.category_name = Set(request.category_name);
}

pub fn narrator_response(model: narrator::Model, total_stories: i64) -> NarratorResponse {
    NarratorResponse {
        id: model.id,
        narrator_name: model.narrator_name,
        total_stories,
        created_at: model.created_at,
        updated_at: model.updated_at,
        deleted_at: model.deleted_at,
    }
}

pub fn apply_narrator(active: &mut narrator::ActiveModel, request: NarratorRequest) {
    active.narrator_name = Set(request.narrator_name);
}

// ---------------------------------------------------------------------------
// Story
// ---------------------------------------------------------------------------

/// Values a story response needs from related tables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoryRelations {
    pub author_name: String,
    pub category_name: String,
    pub narrator_name: String,
    pub total_audios: i64,
    pub average_rating: f64,
}

pub fn story_response(
    model: story::Model,
    relations: StoryRelations,
    base_url: &str,
) -> StoryResponse {
    StoryResponse {
        id: model.id,
        title: model.title,
        description: model.description,
        cover_image_url: model
            .cover_image_path
            .as_deref()
            .map(|path| public_url(base_url, path)),
        author_id: model.author_id,
        author_name: relations.author_name,
        category_id: model.category_id,
        category_name: relations.category_name,
        narrator_id: model.narrator_id,
        narrator_name: relations.narrator_name,
        listeners_count: model.listeners_count,
        total_audios: relations.total_audios,
        average_rating: relations.average_rating,
        created_at: model.created_at,
        updated_at: model.updated_at,
        deleted_at: model.deleted_at,
    }
}

/// Copy the scalar story fields; the cover image is handled by the repository.
pub fn apply_story(active: &mut story::ActiveModel, request: &StoryRequest) {
    active.title = Set(request.title.clone());
    active.description = Set(request.description.clone());
    active.author_id = Set(request.author_id);
    active.category_id = Set(request.category_id);
    active.narrator_id = Set(request.narrator_id);
}

// ---------------------------------------------------------------------------
// Audio
// ---------------------------------------------------------------------------

pub fn audio_response(model: audio::Model, story_title: String, base_url: &str) -> AudioResponse {
    AudioResponse {
        id: model.id,
        story_id: model.story_id,
        story_title,
        title: model.title,
        audio_file_url: public_url(base_url, &model.file_path),
        duration: model.duration,
        created_at: model.created_at,
        updated_at: model.updated_at,
        deleted_at: model.deleted_at,
    }
}

pub fn apply_audio(active: &mut audio::ActiveModel, title: String, story_id: i32, duration: i32) {
    active.title = Set(title);
    active.story_id = Set(story_id);
    active.duration = Set(duration);
}

// ---------------------------------------------------------------------------
// Rating
// ---------------------------------------------------------------------------

pub fn rating_response(model: rating::Model, username: String, story_title: String) -> RatingResponse {
    RatingResponse {
        id: model.id,
        account_id: model.account_id,
        username,
        story_id: model.story_id,
        story_title,
        rating_value: model.rating_value,
        comment: model.comment,
        created_at: model.created_at,
        updated_at: model.updated_at,
        deleted_at: model.deleted_at,
    }
}

pub fn apply_rating(active: &mut rating::ActiveModel, request: RatingRequest) {
    active.account_id = Set(request.account_id);
    active.story_id = Set(request.story_id);
    active.rating_value = Set(request.rating_value);
    active.comment = Set(request.comment);
}

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

pub fn account_response(model: account::Model) -> AccountResponse {
    AccountResponse {
        id: model.id,
        username: model.username,
        email: model.email,
        role: Role::from(model.role.as_str()),
        created_at: model.created_at,
        updated_at: model.updated_at,
        deleted_at: model.deleted_at,
    }
}

/// Copy account fields; `password_hash` must already be hashed.
pub fn apply_account(
    active: &mut account::ActiveModel,
    username: String,
    email: String,
    password_hash: String,
    role: Role,
) {
    active.username = Set(username);
    active.email = Set(email);
    active.password_hash = Set(password_hash);
    active.role = Set(role.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn story_model(cover: Option<&str>) -> story::Model {
        let now = Utc::now();
        story::Model {
            id: 1,
            title: "S".to_string(),
            description: "D".to_string(),
            cover_image_path: cover.map(str::to_string),
            author_id: 1,
            category_id: 2,
            narrator_id: 3,
            listeners_count: 0,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn test_public_url_joins_with_single_slash() {
        assert_eq!(
            public_url("http://localhost:3000/", "/coverImages/a.png"),
            "http://localhost:3000/coverImages/a.png"
        );
        assert_eq!(
            public_url("https://cdn.example.com", "audio/b.mp3"),
            "https://cdn.example.com/audio/b.mp3"
        );
    }

    #[test]
    fn test_average_rating() {
        assert_eq!(average_rating(0, 0), 0.0);
        assert_eq!(average_rating(9, 2), 4.5);
    }

    #[test]
    fn test_story_response_without_cover() {
        let relations = StoryRelations {
            author_name: "A".to_string(),
            ..Default::default()
        };
        let response = story_response(story_model(None), relations, "http://localhost:3000");

        assert_eq!(response.cover_image_url, None);
        assert_eq!(response.author_name, "A");
        assert_eq!(response.total_audios, 0);
        assert_eq!(response.average_rating, 0.0);
        assert_eq!(response.category_id, 2);
    }

    #[test]
    fn test_story_response_prefixes_cover_url() {
        let response = story_response(
            story_model(Some("/coverImages/c.jpg")),
            StoryRelations::default(),
            "http://host",
        );
        assert_eq!(
            response.cover_image_url.as_deref(),
            Some("http://host/coverImages/c.jpg")
        );
    }

    #[test]
    fn test_account_response_parses_role() {
        let now = Utc::now();
        let model = account::Model {
            id: 4,
            username: "admin".to_string(),
            email: "a@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: "admin".to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        assert_eq!(account_response(model).role, Role::Admin);
    }
}
