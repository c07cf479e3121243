//! Uploaded file payload carried from multipart forms to blob storage.
//!
//! File parts are never held in memory: each one is streamed into a staging
//! file (`<uuid>.tmp`) while the body is read, and blob storage later moves
//! that file into place. A staged file that is never stored is removed when
//! its [`UploadedFile`] is dropped.

use std::path::{Path, PathBuf};

use tempfile::TempPath;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::config::MAX_EXTENSION_LENGTH;
use crate::errors::AppResult;

/// Directory multipart file parts are staged in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadDir(pub PathBuf);

/// Streams one file part to a staging file, chunk by chunk.
///
/// Dropping the writer before [`UploadWriter::finish`] (a broken body
/// stream, a failed write) removes the partial file.
pub struct UploadWriter {
    file: tokio::fs::File,
    staged: TempPath,
    file_name: String,
    size: u64,
}

impl UploadWriter {
    pub async fn create(dir: &Path, file_name: impl Into<String>) -> AppResult<Self> {
        tokio::fs::create_dir_all(dir).await?;

        let staged = TempPath::from_path(dir.join(format!("{}.tmp", Uuid::new_v4())));
        let file = tokio::fs::File::create(&staged).await?;

        Ok(Self {
            file,
            staged,
            file_name: file_name.into(),
            size: 0,
        })
    }

    pub async fn write(&mut self, chunk: &[u8]) -> AppResult<()> {
        self.file.write_all(chunk).await?;
        self.size += chunk.len() as u64;
        Ok(())
    }

    /// Flush the staging file and hand it over as a complete upload.
    pub async fn finish(mut self) -> AppResult<UploadedFile> {
        self.file.flush().await?;

        Ok(UploadedFile {
            file_name: self.file_name,
            size: self.size,
            staged: self.staged,
        })
    }
}

/// A file part received in a multipart request, staged on disk
pub struct UploadedFile {
    /// Client-supplied filename (only its extension is ever used)
    pub file_name: String,
    pub size: u64,
    staged: TempPath,
}

impl std::fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedFile")
            .field("file_name", &self.file_name)
            .field("size", &self.size)
            .field("staged", &self.staged.display())
            .finish()
    }
}

impl UploadedFile {
    /// Stage an in-memory payload in `dir`.
    pub async fn from_bytes(
        dir: &Path,
        file_name: impl Into<String>,
        bytes: &[u8],
    ) -> AppResult<Self> {
        let mut writer = UploadWriter::create(dir, file_name).await?;
        writer.write(bytes).await?;
        writer.finish().await
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Where the content currently lives
    pub fn staged_path(&self) -> &Path {
        &self.staged
    }

    /// Move the staged file to `dest`.
    ///
    /// On failure the staged file is removed. On success the guard only
    /// tries to remove the old, now vacant, name.
    pub async fn persist(self, dest: &Path) -> AppResult<()> {
        tokio::fs::rename(&self.staged, dest).await?;
        Ok(())
    }

    /// Lowercased extension including the dot, or an empty string.
    ///
    /// Anything that is not a short ASCII-alphanumeric extension is dropped
    /// so the client name can never influence the stored path.
    pub fn extension(&self) -> String {
        file_extension(&self.file_name)
    }
}

fn file_extension(file_name: &str) -> String {
    let name = file_name.rsplit(['/', '\\']).next().unwrap_or_default();
    match name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LENGTH
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            format!(".{}", ext.to_ascii_lowercase())
        }
        _ => String::new(),
    }
}
