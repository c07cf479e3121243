//! OpenAPI documentation configuration.
//!
//! Served through Swagger UI at `/swagger-ui`.

use utoipa::OpenApi;

use crate::api::handlers::{
    account_handler, audio_handler, author_handler, category_handler, narrator_handler,
    rating_handler, story_handler,
};
use crate::domain::{
    AccountRequest, AccountResponse, AudioResponse, AuthorRequest, AuthorResponse,
    CategoryRequest, CategoryResponse, ChangePasswordRequest, NarratorRequest, NarratorResponse,
    RatingRequest, RatingResponse, Role, StoryResponse,
};
use crate::types::{
    PaginatedAccounts, PaginatedAudios, PaginatedAuthors, PaginatedCategories, PaginatedNarrators,
    PaginatedRatings, PaginatedStories,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Audiobook API",
        version = "0.1.0",
        description = "Catalog of audiobook stories with their authors, narrators, categories, audio tracks, listener accounts and ratings",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        account_handler::get_account,
        account_handler::list_accounts,
        account_handler::create_account,
        account_handler::update_account,
        account_handler::change_password,
        account_handler::delete_account,
        account_handler::soft_delete_account,
        audio_handler::get_audio,
        audio_handler::list_audios,
        audio_handler::create_audio,
        audio_handler::update_audio,
        audio_handler::delete_audio,
        audio_handler::soft_delete_audio,
        author_handler::get_author,
        author_handler::list_authors,
        author_handler::create_author,
        author_handler::update_author,
        author_handler::delete_author,
        author_handler::soft_delete_author,
        category_handler::get_category,
        category_handler::list_categories,
        category_handler::create_category,
        category_handler::update_category,
        category_handler::delete_category,
        category_handler::soft_delete_category,
        narrator_handler::get_narrator,
        narrator_handler::list_narrators,
        narrator_handler::create_narrator,
        narrator_handler::update_narrator,
        narrator_handler::delete_narrator,
        narrator_handler::soft_delete_narrator,
        rating_handler::get_rating,
        rating_handler::list_ratings,
        rating_handler::create_rating,
        rating_handler::update_rating,
        rating_handler::delete_rating,
        rating_handler::soft_delete_rating,
        story_handler::get_story,
        story_handler::list_stories,
        story_handler::create_story,
        story_handler::update_story,
        story_handler::delete_story,
        story_handler::soft_delete_story,
    ),
    components(
        schemas(
            Role,
            AccountRequest,
            AccountResponse,
            ChangePasswordRequest,
            audio_handler::AudioForm,
            AudioResponse,
            AuthorRequest,
            AuthorResponse,
            CategoryRequest,
            CategoryResponse,
            NarratorRequest,
            NarratorResponse,
            RatingRequest,
            RatingResponse,
            story_handler::StoryForm,
            StoryResponse,
            PaginatedAccounts,
            PaginatedAudios,
            PaginatedAuthors,
            PaginatedCategories,
            PaginatedNarrators,
            PaginatedRatings,
            PaginatedStories,
        )
    ),
    tags(
        (name = "Accounts", description = "Listener and administrator accounts"),
        (name = "Audio", description = "Audio tracks of a story"),
        (name = "Authors", description = "Story authors"),
        (name = "Categories", description = "Story categories"),
        (name = "Narrators", description = "Story narrators"),
        (name = "Ratings", description = "Story ratings left by accounts"),
        (name = "Stories", description = "Audiobook stories")
    )
)]
pub struct ApiDoc;
