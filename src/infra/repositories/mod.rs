//! Repository layer - Data access abstraction
//!
//! Every entity gets a trait (mockable in tests) and a SeaORM-backed store
//! implementing the same contract: get by id, paginated query with filters,
//! add, update, delete and soft delete.

mod account_repository;
mod audio_repository;
mod author_repository;
pub(crate) mod base;
mod category_repository;
pub mod entities;
pub mod mapping;
mod narrator_repository;
mod rating_repository;
mod story_repository;

pub use account_repository::{AccountRepository, AccountStore};
pub use audio_repository::{AudioRepository, AudioStore};
pub use author_repository::{AuthorRepository, AuthorStore};
pub use category_repository::{CategoryRepository, CategoryStore};
pub use narrator_repository::{NarratorRepository, NarratorStore};
pub use rating_repository::{RatingRepository, RatingStore};
pub use story_repository::{StoryRepository, StoryStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use account_repository::MockAccountRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use audio_repository::MockAudioRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use author_repository::MockAuthorRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use category_repository::MockCategoryRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use narrator_repository::MockNarratorRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use rating_repository::MockRatingRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use story_repository::MockStoryRepository;
