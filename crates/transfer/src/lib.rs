//! Chunked object transfer engine.
//!
//! [`TransferClient`] moves files between the local filesystem and an
//! object store: multipart upload with progress events and abort-on-failure,
//! and streamed download with atomic destination replacement. The store
//! itself is abstracted behind [`barge_store::ObjectStore`], so the engine
//! runs against S3 or the in-memory backend unchanged.

mod client;
mod events;

use std::path::PathBuf;

pub use client::TransferClient;
pub use events::TransferEvent;

/// Upload part size: 5 MiB, the minimum part size the store accepts for
/// any non-final part.
pub const PART_SIZE: usize = 5 * 1024 * 1024;

/// Errors produced by the transfer engine.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to replace {path}: {source}")]
    Replace {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("store error: {0}")]
    Store(#[from] barge_store::StoreError),
}

/// Namespaces a logical file name under a key prefix.
///
/// `object_key("releases", "tool.exe")` -> `"releases/tool.exe"`.
pub fn object_key(prefix: &str, file_name: &str) -> String {
    format!("{}/{file_name}", prefix.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_key_joins_prefix_and_name() {
        assert_eq!(object_key("releases", "tool.exe"), "releases/tool.exe");
    }

    #[test]
    fn object_key_tolerates_trailing_slash() {
        assert_eq!(object_key("releases/", "tool.exe"), "releases/tool.exe");
    }
}
