//! Unit of Work - single access point to every repository.
//!
//! `Persistence` builds all stores from one database connection, one blob
//! store and the public base URL; handlers only ever see the trait.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use super::db;
use super::repositories::{
    AccountRepository, AccountStore, AudioRepository, AudioStore, AuthorRepository, AuthorStore,
    CategoryRepository, CategoryStore, NarratorRepository, NarratorStore, RatingRepository,
    RatingStore, StoryRepository, StoryStore,
};
use super::storage::BlobStore;
use crate::errors::AppResult;

/// Unit of Work trait for dependency injection.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn accounts(&self) -> Arc<dyn AccountRepository>;
    fn audios(&self) -> Arc<dyn AudioRepository>;
    fn authors(&self) -> Arc<dyn AuthorRepository>;
    fn categories(&self) -> Arc<dyn CategoryRepository>;
    fn narrators(&self) -> Arc<dyn NarratorRepository>;
    fn ratings(&self) -> Arc<dyn RatingRepository>;
    fn stories(&self) -> Arc<dyn StoryRepository>;

    /// Check that the backing store is reachable
    async fn ping(&self) -> AppResult<()>;
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    accounts: Arc<AccountStore>,
    audios: Arc<AudioStore>,
    authors: Arc<AuthorStore>,
    categories: Arc<CategoryStore>,
    narrators: Arc<NarratorStore>,
    ratings: Arc<RatingStore>,
    stories: Arc<StoryStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection, blobs: Arc<BlobStore>, base_url: &str) -> Self {
        Self {
            accounts: Arc::new(AccountStore::new(db.clone())),
            audios: Arc::new(AudioStore::new(db.clone(), blobs.clone(), base_url)),
            authors: Arc::new(AuthorStore::new(db.clone(), blobs.clone())),
            categories: Arc::new(CategoryStore::new(db.clone(), blobs.clone())),
            narrators: Arc::new(NarratorStore::new(db.clone(), blobs.clone())),
            ratings: Arc::new(RatingStore::new(db.clone())),
            stories: Arc::new(StoryStore::new(db.clone(), blobs, base_url)),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn accounts(&self) -> Arc<dyn AccountRepository> {
        self.accounts.clone()
    }

    fn audios(&self) -> Arc<dyn AudioRepository> {
        self.audios.clone()
    }

    fn authors(&self) -> Arc<dyn AuthorRepository> {
        self.authors.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.categories.clone()
    }

    fn narrators(&self) -> Arc<dyn NarratorRepository> {
        self.narrators.clone()
    }

    fn ratings(&self) -> Arc<dyn RatingRepository> {
        self.ratings.clone()
    }

    fn stories(&self) -> Arc<dyn StoryRepository> {
        self.stories.clone()
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(db::ping(&self.db).await?)
    }
}

/// Unit of work over mock repositories for handler tests.
///
/// Unset repositories are mocks without expectations, so any call to them
/// panics.
#[cfg(test)]
pub(crate) struct MockUnitOfWork {
    pub accounts: Arc<super::MockAccountRepository>,
    pub audios: Arc<super::MockAudioRepository>,
    pub authors: Arc<super::MockAuthorRepository>,
    pub categories: Arc<super::MockCategoryRepository>,
    pub narrators: Arc<super::MockNarratorRepository>,
    pub ratings: Arc<super::MockRatingRepository>,
    pub stories: Arc<super::MockStoryRepository>,
    pub healthy: bool,
}

#[cfg(test)]
impl Default for MockUnitOfWork {
    fn default() -> Self {
        Self {
            accounts: Arc::new(super::MockAccountRepository::new()),
            audios: Arc::new(super::MockAudioRepository::new()),
            authors: Arc::new(super::MockAuthorRepository::new()),
            categories: Arc::new(super::MockCategoryRepository::new()),
            narrators: Arc::new(super::MockNarratorRepository::new()),
            ratings: Arc::new(super::MockRatingRepository::new()),
            stories: Arc::new(super::MockStoryRepository::new()),
            healthy: true,
        }
    }
}

#[cfg(test)]
#[async_trait]
impl UnitOfWork for MockUnitOfWork {
    fn accounts(&self) -> Arc<dyn AccountRepository> {
        self.accounts.clone()
    }

    fn audios(&self) -> Arc<dyn AudioRepository> {
        self.audios.clone()
    }

    fn authors(&self) -> Arc<dyn AuthorRepository> {
        self.authors.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.categories.clone()
    }

    fn narrators(&self) -> Arc<dyn NarratorRepository> {
        self.narrators.clone()
    }

    fn ratings(&self) -> Arc<dyn RatingRepository> {
        self.ratings.clone()
    }

    fn stories(&self) -> Arc<dyn StoryRepository> {
        self.stories.clone()
    }

    async fn ping(&self) -> AppResult<()> {
        if self.healthy {
            Ok(())
        } else {
            Err(crate::errors::AppError::internal("database unreachable"))
        }
    }
}
