//! Infrastructure layer - External systems integration
//!
//! - Database connection and migrations
//! - Entity repositories
//! - Blob storage for uploaded files
//! - Unit of Work giving handlers access to every repository

pub mod db;
pub mod repositories;
pub mod storage;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    AccountRepository, AudioRepository, AuthorRepository, CategoryRepository, NarratorRepository,
    RatingRepository, StoryRepository,
};
pub use storage::{BlobKind, BlobStore};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockAccountRepository, MockAudioRepository, MockAuthorRepository, MockCategoryRepository,
    MockNarratorRepository, MockRatingRepository, MockStoryRepository,
};
