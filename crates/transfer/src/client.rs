//! The transfer client: multipart upload and atomic download.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use futures_util::TryStreamExt;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use barge_store::{CompletedPart, ObjectStore};

use crate::{PART_SIZE, TransferError, TransferEvent};

/// Moves files between the local filesystem and one bucket of an object
/// store.
///
/// The client holds no per-transfer state: methods take `&self` and
/// concurrent transfers of different keys are safe. Concurrent writes to
/// the same key are not coordinated — the last completed write wins.
#[derive(Clone)]
pub struct TransferClient {
    store: Arc<dyn ObjectStore>,
    bucket: String,
}

impl TransferClient {
    pub fn new(store: Arc<dyn ObjectStore>, bucket: impl Into<String>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
        }
    }

    /// The bucket this client operates on.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Uploads a local file to `key` via a multipart session.
    ///
    /// The file is read sequentially in [`PART_SIZE`] chunks; after each
    /// part a [`TransferEvent::Progress`] is sent on `events` (if supplied),
    /// in issuance order. A zero-length file is uploaded as a single empty
    /// part so the session still completes with a valid empty object.
    ///
    /// On any failure after the session opened — read error, part-upload
    /// error, or completion error — the session is aborted best-effort
    /// before the error propagates, so no session is ever left open.
    /// There are no retries.
    pub async fn upload(
        &self,
        key: &str,
        path: &Path,
        events: Option<mpsc::Sender<TransferEvent>>,
    ) -> Result<(), TransferError> {
        let mut file = File::open(path).await.map_err(|e| TransferError::Open {
            path: path.to_path_buf(),
            source: e,
        })?;
        // Size is read once; the file must not change during the upload.
        let total = file
            .metadata()
            .await
            .map_err(|e| TransferError::Open {
                path: path.to_path_buf(),
                source: e,
            })?
            .len();

        let upload_id = self.store.create_multipart_upload(&self.bucket, key).await?;
        info!(key, total_bytes = total, upload_id, "upload started");

        match self
            .upload_parts(key, path, &mut file, total, &upload_id, events.as_ref())
            .await
        {
            Ok(()) => {
                if let Some(tx) = &events {
                    let _ = tx
                        .send(TransferEvent::Completed {
                            key: key.to_string(),
                        })
                        .await;
                }
                info!(key, "upload complete");
                Ok(())
            }
            Err(e) => {
                // Best-effort cleanup; the original error is what propagates.
                if let Err(abort_err) = self
                    .store
                    .abort_multipart_upload(&self.bucket, key, &upload_id)
                    .await
                {
                    warn!(key, error = %abort_err, "failed to abort multipart upload");
                }
                if let Some(tx) = &events {
                    let _ = tx
                        .send(TransferEvent::Failed {
                            key: key.to_string(),
                            error: e.to_string(),
                        })
                        .await;
                }
                Err(e)
            }
        }
    }

    async fn upload_parts(
        &self,
        key: &str,
        path: &Path,
        file: &mut File,
        total: u64,
        upload_id: &str,
        events: Option<&mpsc::Sender<TransferEvent>>,
    ) -> Result<(), TransferError> {
        let mut parts: Vec<CompletedPart> = Vec::new();
        let mut transferred: u64 = 0;
        let mut part_number: i32 = 1;
        let mut buf = vec![0u8; PART_SIZE];

        loop {
            let n = read_full(file, &mut buf)
                .await
                .map_err(|e| TransferError::Read {
                    path: path.to_path_buf(),
                    source: e,
                })?;
            if n == 0 && !parts.is_empty() {
                break;
            }

            // n == 0 only for a zero-length file here: upload one empty
            // part so the session can complete.
            let etag = self
                .store
                .upload_part(
                    &self.bucket,
                    key,
                    upload_id,
                    part_number,
                    Bytes::copy_from_slice(&buf[..n]),
                )
                .await?;
            parts.push(CompletedPart::new(part_number, etag));
            transferred += n as u64;
            debug!(key, part_number, bytes = n, "part uploaded");

            if let Some(tx) = events {
                let _ = tx
                    .send(TransferEvent::Progress {
                        key: key.to_string(),
                        percent: TransferEvent::percent_of(transferred, total),
                        transferred_bytes: transferred,
                        total_bytes: total,
                    })
                    .await;
            }

            if n < PART_SIZE {
                break;
            }
            part_number += 1;
        }

        // Upload order already matches part order; sort anyway so the
        // completion call stays correct if parts ever upload concurrently.
        parts.sort_by_key(|p| p.part_number);
        self.store
            .complete_multipart_upload(&self.bucket, key, upload_id, &parts)
            .await?;
        Ok(())
    }

    /// Downloads the object at `key` into `dest`.
    ///
    /// The body streams into a temporary file next to `dest`, which is
    /// renamed over the destination only after the whole object arrived —
    /// a partially written file is never visible under the final name, and
    /// a failed download leaves any existing destination untouched.
    pub async fn download(&self, key: &str, dest: &Path) -> Result<(), TransferError> {
        let mut body = self.store.get_object(&self.bucket, key).await?;

        let parent = match dest.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let tmp = tempfile::NamedTempFile::new_in(&parent).map_err(|e| TransferError::Create {
            path: parent.clone(),
            source: e,
        })?;
        let mut file = File::create(tmp.path())
            .await
            .map_err(|e| TransferError::Create {
                path: tmp.path().to_path_buf(),
                source: e,
            })?;

        while let Some(chunk) = body.try_next().await? {
            file.write_all(&chunk)
                .await
                .map_err(|e| TransferError::Write {
                    path: dest.to_path_buf(),
                    source: e,
                })?;
        }
        file.flush().await.map_err(|e| TransferError::Write {
            path: dest.to_path_buf(),
            source: e,
        })?;
        drop(file);

        tmp.persist(dest).map_err(|e| TransferError::Replace {
            path: dest.to_path_buf(),
            source: e.error,
        })?;
        info!(key, dest = %dest.display(), "download complete");
        Ok(())
    }
}

/// Reads until `buf` is full or EOF; returns the number of bytes read.
async fn read_full(file: &mut File, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = file.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
