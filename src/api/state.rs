//! Application state shared by every handler.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::FromRef;

use crate::config::{Config, UPLOAD_STAGING_DIR};
use crate::infra::UnitOfWork;
use crate::types::UploadDir;

/// Cloned into each request; everything inside is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Repository access
    pub uow: Arc<dyn UnitOfWork>,
    /// Directory uploaded blobs are served from
    pub storage_root: PathBuf,
    /// Request body limit in bytes
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(uow: Arc<dyn UnitOfWork>, config: &Config) -> Self {
        Self {
            uow,
            storage_root: config.storage_root.clone(),
            max_body_bytes: config.max_body_bytes(),
        }
    }
}

impl FromRef<AppState> for UploadDir {
    fn from_ref(state: &AppState) -> Self {
        UploadDir(state.storage_root.join(UPLOAD_STAGING_DIR))
    }
}
