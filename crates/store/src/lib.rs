//! Object-store seam for the transfer engine.
//!
//! Defines the [`ObjectStore`] trait — multipart upload session primitives
//! plus single-shot download — and two backends: [`S3Store`] wrapping
//! `aws-sdk-s3`, and [`MemoryStore`] for tests and local development.
//!
//! The trait is deliberately narrow: a store handle is constructed once,
//! shared behind an `Arc`, and treated as read-only for the rest of the
//! process. Sessions (upload id + parts) live entirely on the caller side.

mod memory;
mod s3;

use bytes::Bytes;
use futures_util::stream::BoxStream;

pub use memory::MemoryStore;
pub use s3::S3Store;

/// Streamed object body returned by [`ObjectStore::get_object`].
pub type ObjectBody = BoxStream<'static, Result<Bytes, StoreError>>;

/// Errors produced by store backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("object not found: {0}")]
    NotFound(String),

    #[error("upload session not found: {0}")]
    UploadNotFound(String),

    #[error("invalid part: {0}")]
    InvalidPart(String),

    #[error("store error: {0}")]
    Backend(String),
}

/// A part that finished uploading: its 1-based number and the etag the
/// store assigned to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedPart {
    pub part_number: i32,
    pub etag: String,
}

impl CompletedPart {
    pub fn new(part_number: i32, etag: impl Into<String>) -> Self {
        Self {
            part_number,
            etag: etag.into(),
        }
    }
}

/// Remote object store: multipart upload sessions and streamed download.
///
/// All methods are safe to call concurrently for different keys. Writes to
/// the same key are not coordinated — the last completed write wins.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Opens a multipart upload session for `key` and returns its upload id.
    async fn create_multipart_upload(&self, bucket: &str, key: &str)
    -> Result<String, StoreError>;

    /// Uploads one numbered part and returns the etag assigned by the store.
    ///
    /// Part numbers start at 1. Every part except the last must be at least
    /// the store's minimum part size.
    async fn upload_part(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        part_number: i32,
        body: Bytes,
    ) -> Result<String, StoreError>;

    /// Finalizes a session. `parts` must be in strictly ascending part-number
    /// order and carry the etags returned by [`upload_part`](Self::upload_part).
    async fn complete_multipart_upload(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        parts: &[CompletedPart],
    ) -> Result<(), StoreError>;

    /// Aborts a session, discarding all uploaded parts.
    async fn abort_multipart_upload(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
    ) -> Result<(), StoreError>;

    /// Fetches the full object as a byte stream.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectBody, StoreError>;
}
