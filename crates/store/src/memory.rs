//! In-memory [`ObjectStore`] backend.
//!
//! Implements the same multipart protocol rules as the real store so the
//! transfer engine can be exercised without network access: unknown upload
//! ids are rejected, etags must match, and the completion part list must be
//! strictly ascending. Etags are hex SHA-256 digests of the part body.

use std::collections::HashMap;
use std::sync::Mutex;

use bytes::{Bytes, BytesMut};
use sha2::{Digest, Sha256};

use crate::{CompletedPart, ObjectBody, ObjectStore, StoreError};

/// Maximum part number accepted by S3; enforced here so tests catch
/// overruns before they hit a real bucket.
const MAX_PART_NUMBER: i32 = 10_000;

/// Chunk size used when streaming an object body back out.
const READ_CHUNK_SIZE: usize = 64 * 1024;

#[derive(Default)]
struct PendingUpload {
    bucket: String,
    key: String,
    /// part number -> (etag, data)
    parts: HashMap<i32, (String, Bytes)>,
}

#[derive(Default)]
struct MemoryInner {
    /// (bucket, key) -> object bytes
    objects: HashMap<(String, String), Bytes>,
    /// upload id -> pending session
    uploads: HashMap<String, PendingUpload>,
    next_upload_id: u64,
}

/// In-memory object store for tests and local development.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored bytes for an object, if present.
    pub fn object(&self, bucket: &str, key: &str) -> Option<Bytes> {
        let inner = self.inner.lock().unwrap();
        inner
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// Returns `true` if an object is visible at `key`.
    pub fn has_object(&self, bucket: &str, key: &str) -> bool {
        self.object(bucket, key).is_some()
    }

    /// Number of multipart sessions that were opened but neither completed
    /// nor aborted.
    pub fn open_upload_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.uploads.len()
    }
}

fn etag_for(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

fn validate_part_number(part_number: i32) -> Result<(), StoreError> {
    if part_number < 1 || part_number > MAX_PART_NUMBER {
        return Err(StoreError::InvalidPart(format!(
            "part number out of range: {part_number}"
        )));
    }
    Ok(())
}

#[async_trait::async_trait]
impl ObjectStore for MemoryStore {
    async fn create_multipart_upload(
        &self,
        bucket: &str,
        key: &str,
    ) -> Result<String, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_upload_id += 1;
        let upload_id = format!("upload-{}", inner.next_upload_id);
        inner.uploads.insert(
            upload_id.clone(),
            PendingUpload {
                bucket: bucket.to_string(),
                key: key.to_string(),
                parts: HashMap::new(),
            },
        );
        Ok(upload_id)
    }

    async fn upload_part(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        part_number: i32,
        body: Bytes,
    ) -> Result<String, StoreError> {
        validate_part_number(part_number)?;

        let mut inner = self.inner.lock().unwrap();
        let upload = inner
            .uploads
            .get_mut(upload_id)
            .ok_or_else(|| StoreError::UploadNotFound(upload_id.to_string()))?;
        if upload.bucket != bucket || upload.key != key {
            return Err(StoreError::InvalidPart(format!(
                "upload id {upload_id} does not belong to {bucket}/{key}"
            )));
        }

        let etag = etag_for(&body);
        upload.parts.insert(part_number, (etag.clone(), body));
        Ok(etag)
    }

    async fn complete_multipart_upload(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        parts: &[CompletedPart],
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let upload = inner
            .uploads
            .get(upload_id)
            .ok_or_else(|| StoreError::UploadNotFound(upload_id.to_string()))?;
        if upload.bucket != bucket || upload.key != key {
            return Err(StoreError::InvalidPart(format!(
                "upload id {upload_id} does not belong to {bucket}/{key}"
            )));
        }
        if parts.is_empty() {
            return Err(StoreError::InvalidPart(
                "completion requires at least one part".into(),
            ));
        }

        let mut assembled = BytesMut::new();
        let mut previous = 0;
        for part in parts {
            validate_part_number(part.part_number)?;
            if part.part_number <= previous {
                return Err(StoreError::InvalidPart(format!(
                    "parts must be in ascending order, got {} after {previous}",
                    part.part_number
                )));
            }
            previous = part.part_number;

            let (etag, data) = upload.parts.get(&part.part_number).ok_or_else(|| {
                StoreError::InvalidPart(format!("part {} was never uploaded", part.part_number))
            })?;
            if *etag != part.etag {
                return Err(StoreError::InvalidPart(format!(
                    "etag mismatch for part {}",
                    part.part_number
                )));
            }
            assembled.extend_from_slice(data);
        }

        inner
            .objects
            .insert((bucket.to_string(), key.to_string()), assembled.freeze());
        inner.uploads.remove(upload_id);
        Ok(())
    }

    async fn abort_multipart_upload(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let upload = inner
            .uploads
            .get(upload_id)
            .ok_or_else(|| StoreError::UploadNotFound(upload_id.to_string()))?;
        if upload.bucket != bucket || upload.key != key {
            return Err(StoreError::InvalidPart(format!(
                "upload id {upload_id} does not belong to {bucket}/{key}"
            )));
        }
        inner.uploads.remove(upload_id);
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectBody, StoreError> {
        let data = self
            .object(bucket, key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;

        let mut chunks: Vec<Result<Bytes, StoreError>> = Vec::new();
        let mut rest = data;
        while rest.len() > READ_CHUNK_SIZE {
            chunks.push(Ok(rest.split_to(READ_CHUNK_SIZE)));
        }
        chunks.push(Ok(rest));
        Ok(Box::pin(futures_util::stream::iter(chunks)))
    }
}
