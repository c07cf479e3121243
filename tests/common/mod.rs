//! Shared fixtures: a migrated SQLite database and blob root in a temp dir.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use audiobook_api::config::UPLOAD_STAGING_DIR;
use audiobook_api::domain::{
    AccountRequest, AudioRequest, AuthorRequest, CategoryRequest, NarratorRequest, Role,
    StoryRequest,
};
use audiobook_api::infra::{BlobStore, Database, Persistence, UnitOfWork};
use audiobook_api::types::UploadedFile;

pub const BASE_URL: &str = "http://localhost:3000";

pub struct TestContext {
    dir: TempDir,
    pub uow: Arc<Persistence>,
}

impl TestContext {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("catalog.db").display());
        let db = Database::connect(&url).await.unwrap();

        let blobs = Arc::new(BlobStore::new(dir.path().join("wwwroot")));
        let uow = Arc::new(Persistence::new(db.get_connection(), blobs, BASE_URL));

        Self { dir, uow }
    }

    pub fn storage_root(&self) -> PathBuf {
        self.dir.path().join("wwwroot")
    }

    /// Whether a stored blob path (`/coverImages/...`) exists on disk
    pub fn blob_exists(&self, relative: &str) -> bool {
        self.storage_root()
            .join(relative.trim_start_matches('/'))
            .exists()
    }

    /// A file staged the way the multipart extractor stages uploads
    pub async fn upload(&self, name: &str, bytes: &[u8]) -> UploadedFile {
        UploadedFile::from_bytes(&self.storage_root().join(UPLOAD_STAGING_DIR), name, bytes)
            .await
            .unwrap()
    }

    pub async fn png(&self) -> UploadedFile {
        self.upload("cover.PNG", b"\x89PNG fake image").await
    }

    pub async fn mp3(&self) -> UploadedFile {
        self.upload("chapter.mp3", b"ID3 fake audio").await
    }

    /// Files still waiting in the upload staging directory
    pub fn staged_uploads(&self) -> usize {
        std::fs::read_dir(self.storage_root().join(UPLOAD_STAGING_DIR))
            .map(|d| d.count())
            .unwrap_or(0)
    }

    pub fn blob_path_from_url(url: &str) -> &str {
        url.strip_prefix(BASE_URL).unwrap()
    }

    /// Author, category and narrator ids for a new story
    pub async fn catalog(&self) -> (i32, i32, i32) {
        let author = self
            .uow
            .authors()
            .add(AuthorRequest {
                id: None,
                author_name: "Frank Herbert".to_string(),
            })
            .await
            .unwrap();
        let category = self
            .uow
            .categories()
            .add(CategoryRequest {
                id: None,
                category_name: "Science Fiction".to_string(),
            })
            .await
            .unwrap();
        let narrator = self
            .uow
            .narrators()
            .add(NarratorRequest {
                id: None,
                narrator_name: "Scott Brick".to_string(),
            })
            .await
            .unwrap();
        (author.id, category.id, narrator.id)
    }

    pub async fn account(&self, username: &str) -> i32 {
        self.uow
            .accounts()
            .add(account_request(username, "secret-pass"))
            .await
            .unwrap()
            .id
    }
}

pub fn story_request(
    (author_id, category_id, narrator_id): (i32, i32, i32),
    title: &str,
    cover: Option<UploadedFile>,
) -> StoryRequest {
    StoryRequest {
        id: None,
        title: title.to_string(),
        description: format!("{} description", title),
        author_id,
        category_id,
        narrator_id,
        cover_image: cover,
    }
}

pub fn audio_request(story_id: i32, title: &str, file: Option<UploadedFile>) -> AudioRequest {
    AudioRequest {
        id: None,
        title: title.to_string(),
        story_id,
        duration: 600,
        audio_file: file,
    }
}

pub fn account_request(username: &str, password: &str) -> AccountRequest {
    AccountRequest {
        id: None,
        username: username.to_string(),
        email: format!("{}@example.com", username),
        password: password.to_string(),
        role: Role::User,
    }
}
