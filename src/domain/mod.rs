//! Domain layer - request, response and filter shapes for every catalog entity.
//!
//! Requests are validated with `validator` before they reach a repository;
//! responses are what the HTTP layer serializes (camelCase JSON).

pub mod account;
pub mod audio;
pub mod author;
pub mod category;
pub mod narrator;
pub mod password;
pub mod rating;
pub mod story;

pub use account::{AccountFilter, AccountRequest, AccountResponse, ChangePasswordRequest, Role};
pub use audio::{AudioFilter, AudioRequest, AudioResponse};
pub use author::{AuthorFilter, AuthorRequest, AuthorResponse};
pub use category::{CategoryFilter, CategoryRequest, CategoryResponse};
pub use narrator::{NarratorFilter, NarratorRequest, NarratorResponse};
pub use password::Password;
pub use rating::{RatingFilter, RatingRequest, RatingResponse};
pub use story::{StoryFilter, StoryRequest, StoryResponse};
