//! Two-pass zip extraction.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::{debug, info};
use zip::ZipArchive;

use crate::{ExtractError, validate_entry_path};

/// Extracts a zip archive into `dest_dir`.
///
/// Pass 1 validates every entry name; an entry that would escape
/// `dest_dir` fails the whole extraction before any file is written.
/// Pass 2 materializes regular-file entries only: directory entries are
/// skipped and parent directories are created implicitly, so archives
/// whose files live in directories without matching directory entries
/// still extract. Existing files are overwritten; unix mode bits from
/// the entry are applied when present.
///
/// A read or write error aborts immediately. Files extracted before the
/// failure remain on disk — extraction is not transactional.
pub fn extract(archive_path: &Path, dest_dir: &Path) -> Result<(), ExtractError> {
    let file = File::open(archive_path).map_err(|e| ExtractError::Open {
        path: archive_path.to_path_buf(),
        source: e,
    })?;
    let mut archive = ZipArchive::new(BufReader::new(file))?;

    // Pass 1: reject the whole archive before anything touches disk.
    for i in 0..archive.len() {
        let name = archive
            .name_for_index(i)
            .ok_or_else(|| ExtractError::UnsafePath(format!("entry {i} has no valid name")))?;
        validate_entry_path(name)?;
    }

    // Pass 2: write file entries.
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }

        let out_path = dest_dir.join(entry.name());
        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ExtractError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut out_file = File::create(&out_path).map_err(|e| ExtractError::Write {
            path: out_path.clone(),
            source: e,
        })?;
        std::io::copy(&mut entry, &mut out_file).map_err(|e| ExtractError::Write {
            path: out_path.clone(),
            source: e,
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                std::fs::set_permissions(&out_path, std::fs::Permissions::from_mode(mode))
                    .map_err(|e| ExtractError::Write {
                        path: out_path.clone(),
                        source: e,
                    })?;
            }
        }

        debug!(entry = entry.name(), "extracted");
    }

    info!(
        archive = %archive_path.display(),
        dest = %dest_dir.display(),
        entries = archive.len(),
        "archive extracted"
    );
    Ok(())
}
