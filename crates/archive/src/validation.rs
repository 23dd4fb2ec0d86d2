use std::path::{Component, Path};

use crate::ExtractError;

/// Validates that an archive entry name stays inside the extraction root.
///
/// Rejects:
/// - Empty names
/// - Absolute paths (Unix `/` or Windows `C:\`)
/// - Parent directory traversal (`..`)
/// - Windows prefix components (`C:`, `\\server`)
pub fn validate_entry_path(entry_name: &str) -> Result<(), ExtractError> {
    if entry_name.is_empty() {
        return Err(ExtractError::UnsafePath("empty entry name".into()));
    }

    let path = Path::new(entry_name);

    if path.is_absolute() {
        return Err(ExtractError::UnsafePath(format!(
            "absolute path not allowed: {entry_name}"
        )));
    }

    for component in path.components() {
        match component {
            Component::ParentDir => {
                return Err(ExtractError::UnsafePath(format!(
                    "parent directory traversal not allowed: {entry_name}"
                )));
            }
            Component::Prefix(_) => {
                return Err(ExtractError::UnsafePath(format!(
                    "path prefix not allowed: {entry_name}"
                )));
            }
            Component::RootDir => {
                return Err(ExtractError::UnsafePath(format!(
                    "absolute path not allowed: {entry_name}"
                )));
            }
            Component::CurDir | Component::Normal(_) => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_name() {
        assert!(validate_entry_path("").is_err());
    }

    #[test]
    fn rejects_parent_dir_traversal() {
        assert!(validate_entry_path("../../evil.txt").is_err());
    }

    #[test]
    fn rejects_nested_parent_dir_traversal() {
        assert!(validate_entry_path("sub/../../../escape").is_err());
    }

    #[test]
    fn rejects_absolute_path() {
        assert!(validate_entry_path("/etc/passwd").is_err());
    }

    #[test]
    fn rejects_bare_parent_dir() {
        assert!(validate_entry_path("..").is_err());
    }

    #[test]
    fn accepts_simple_filename() {
        assert!(validate_entry_path("readme.txt").is_ok());
    }

    #[test]
    fn accepts_nested_path() {
        assert!(validate_entry_path("sub/dir/file.txt").is_ok());
    }

    #[test]
    fn accepts_directory_entry() {
        assert!(validate_entry_path("sub/dir/").is_ok());
    }

    #[test]
    fn accepts_current_dir_prefix() {
        assert!(validate_entry_path("./file.txt").is_ok());
    }
}
