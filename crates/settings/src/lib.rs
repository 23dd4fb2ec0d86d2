//! Store credentials and local workspace layout.
//!
//! [`StoreConfig`] loads the flat `KEY=value` credentials file; the engine
//! receives the parsed tuple and never touches the file again.
//! [`Workspace`] resolves the `uploads/` and `downloads/` directories
//! under an externally-determined base path and creates them on first use.

mod config;
mod workspace;

use std::path::PathBuf;

pub use config::StoreConfig;
pub use workspace::Workspace;

/// Credentials file name under the workspace base path.
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Errors produced while loading settings or preparing directories.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read config {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}
