//! Self-update orchestration.
//!
//! [`UpdateOrchestrator::patch`] composes the transfer engine and the
//! archive extractor: download a well-known build archive to a transient
//! path, unpack it over the install root, delete the archive. Patch is a
//! distinct, separately named operation — no file name is reserved or
//! overloaded on the upload/download path to trigger it.

use std::path::PathBuf;

use tokio::task;
use tracing::info;

use barge_transfer::{TransferClient, object_key};

/// Key prefix under which build archives live in the store.
pub const BUILDS_PREFIX: &str = "builds";

/// Errors produced while patching.
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error("transfer error: {0}")]
    Transfer(#[from] barge_transfer::TransferError),

    #[error("extract error: {0}")]
    Extract(#[from] barge_archive::ExtractError),

    #[error("failed to remove {path}: {source}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("extract task failed: {0}")]
    Task(String),
}

/// Downloads and applies build archives over a local installation.
pub struct UpdateOrchestrator {
    client: TransferClient,
    /// Transient download area for the fetched archive.
    download_dir: PathBuf,
    /// Root the archive is unpacked over.
    install_root: PathBuf,
    /// Archive object name under [`BUILDS_PREFIX`].
    archive_name: String,
}

impl UpdateOrchestrator {
    pub fn new(
        client: TransferClient,
        download_dir: impl Into<PathBuf>,
        install_root: impl Into<PathBuf>,
        archive_name: impl Into<String>,
    ) -> Self {
        Self {
            client,
            download_dir: download_dir.into(),
            install_root: install_root.into(),
            archive_name: archive_name.into(),
        }
    }

    /// The transient path the archive is downloaded to.
    pub fn archive_path(&self) -> PathBuf {
        self.download_dir.join(&self.archive_name)
    }

    /// Fetches `builds/<archive_name>`, unpacks it over the install root,
    /// then removes the downloaded archive.
    ///
    /// The three steps run sequentially and the operation fails fast on
    /// the first error; partial state (archive downloaded but not
    /// extracted, or extracted but not cleaned up) is left as-is — patch
    /// is not transactional.
    pub async fn patch(&self) -> Result<(), UpdateError> {
        let key = object_key(BUILDS_PREFIX, &self.archive_name);
        let archive_path = self.archive_path();

        self.client.download(&key, &archive_path).await?;

        let src = archive_path.clone();
        let dst = self.install_root.clone();
        // Zip extraction is blocking I/O; keep it off the async workers.
        task::spawn_blocking(move || barge_archive::extract(&src, &dst))
            .await
            .map_err(|e| UpdateError::Task(e.to_string()))??;

        tokio::fs::remove_file(&archive_path)
            .await
            .map_err(|e| UpdateError::Remove {
                path: archive_path.clone(),
                source: e,
            })?;

        info!(
            key = %key,
            install_root = %self.install_root.display(),
            "patch applied"
        );
        Ok(())
    }
}
