//! Zip archive extraction with path-traversal protection.
//!
//! Every entry name is validated before anything touches disk: an archive
//! containing even one entry that would escape the destination directory
//! is rejected outright, with zero files written. Directory entries are
//! enumerated but never created — parent directories are made implicitly
//! for each file entry instead.

mod extract;
mod validation;

use std::path::PathBuf;

pub use extract::extract;
pub use validation::validate_entry_path;

/// Errors produced during archive extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("failed to open archive {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("unsafe entry path: {0}")]
    UnsafePath(String),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
