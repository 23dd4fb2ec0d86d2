//! Local workspace directory layout.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{CONFIG_FILE_NAME, SettingsError};

/// Directory uploads are read from, under the base path.
pub const UPLOADS_DIR: &str = "uploads";

/// Directory downloads are written to, under the base path.
pub const DOWNLOADS_DIR: &str = "downloads";

/// The local directory layout rooted at an externally-determined base
/// path: `uploads/` for outgoing files, `downloads/` for incoming ones,
/// and the credentials file next to them.
#[derive(Debug, Clone)]
pub struct Workspace {
    base: PathBuf,
}

impl Workspace {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn config_path(&self) -> PathBuf {
        self.base.join(CONFIG_FILE_NAME)
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.base.join(UPLOADS_DIR)
    }

    pub fn downloads_dir(&self) -> PathBuf {
        self.base.join(DOWNLOADS_DIR)
    }

    /// Source path for uploading a named file.
    pub fn upload_path(&self, file_name: &str) -> PathBuf {
        self.uploads_dir().join(file_name)
    }

    /// Destination path for downloading a named file.
    pub fn download_path(&self, file_name: &str) -> PathBuf {
        self.downloads_dir().join(file_name)
    }

    /// Creates the uploads and downloads directories if absent.
    pub fn ensure_dirs(&self) -> Result<(), SettingsError> {
        for dir in [self.uploads_dir(), self.downloads_dir()] {
            if dir.is_dir() {
                continue;
            }
            std::fs::create_dir_all(&dir).map_err(|e| SettingsError::CreateDir {
                path: dir.clone(),
                source: e,
            })?;
            debug!(dir = %dir.display(), "created workspace directory");
        }
        Ok(())
    }
}
