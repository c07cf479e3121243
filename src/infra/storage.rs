//! Blob storage for uploaded cover images and audio files.
//!
//! Blobs live on the local filesystem under a storage root; the database
//! only stores their relative path (`/coverImages/<uuid>.png`), which is
//! also the path they are served from.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use uuid::Uuid;

use crate::config::{AUDIO_DIR, COVER_IMAGE_DIR};
use crate::errors::AppResult;
use crate::types::UploadedFile;

/// Which kind of blob is being stored (selects the sub-directory)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobKind {
    CoverImage,
    Audio,
}

impl BlobKind {
    pub fn dir(&self) -> &'static str {
        match self {
            BlobKind::CoverImage => COVER_IMAGE_DIR,
            BlobKind::Audio => AUDIO_DIR,
        }
    }
}

/// Filesystem-backed blob store
#[derive(Debug, Clone)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Move the staged upload into place under a fresh random name and
    /// return its relative path.
    ///
    /// The staged file is removed if it cannot be stored.
    pub async fn save(&self, kind: BlobKind, file: UploadedFile) -> AppResult<String> {
        let dir = self.root.join(kind.dir());
        tokio::fs::create_dir_all(&dir).await?;

        let name = format!("{}{}", Uuid::new_v4(), file.extension());
        let size = file.size;
        file.persist(&dir.join(&name)).await?;

        tracing::debug!(kind = kind.dir(), name = %name, size, "Blob stored");
        Ok(format!("/{}/{}", kind.dir(), name))
    }

    /// Best-effort removal. Missing files are ignored; other failures are logged.
    pub async fn remove(&self, relative_path: &str) {
        let Some(path) = self.resolve(relative_path) else {
            tracing::warn!(path = relative_path, "Refusing to remove blob outside storage root");
            return;
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::debug!(path = relative_path, "Blob removed"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = relative_path, error = %e, "Failed to remove blob"),
        }
    }

    /// Remove every blob in the list (see [`BlobStore::remove`]).
    pub async fn remove_all<I, S>(&self, relative_paths: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for path in relative_paths {
            self.remove(path.as_ref()).await;
        }
    }

    /// Map a stored relative path onto the filesystem, rejecting anything
    /// that could escape the root.
    fn resolve(&self, relative_path: &str) -> Option<PathBuf> {
        let relative = Path::new(relative_path.trim_start_matches('/'));
        let mut components = relative.components().peekable();
        components.peek()?;
        if components.all(|c| matches!(c, Component::Normal(_))) {
            Some(self.root.join(relative))
        } else {
            None
        }
    }
}
