//! Listing files below a supporting-material directory.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

/// Recursively list all regular files below `root`.
///
/// Returns paths sorted lexicographically. Symbolic links to directories
/// are not followed.
pub fn list_files_recursive(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let entries = std::fs::read_dir(&dir).map_err(|e| IngestError::DirectoryRead {
            path: dir.clone(),
            source: e,
        })?;
        for entry_result in entries {
            let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
                path: dir.clone(),
                source: e,
            })?;
            let file_type = entry.file_type().map_err(|e| IngestError::DirectoryRead {
                path: dir.clone(),
                source: e,
            })?;
            let path = entry.path();
            if file_type.is_dir() {
                pending.push(path);
            } else if path.is_file() {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Recursively list files below `root` whose extension matches `ext`
/// (case-insensitive, without the dot).
pub fn list_files_with_extension(root: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    Ok(list_files_recursive(root)?
        .into_iter()
        .filter(|path| has_extension(path, ext))
        .collect())
}

pub fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("CD3_AF488");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("0000-0003-0315-7727.md"), "# Configurations").unwrap();
        std::fs::write(nested.join("image.png"), [0u8, 1, 2]).unwrap();
        std::fs::write(dir.path().join("README.MD"), "readme").unwrap();
        dir
    }

    #[test]
    fn test_list_files_recursive_walks_subdirectories() {
        let dir = create_test_dir();
        let files = list_files_recursive(dir.path()).unwrap();
        assert_eq!(files.len(), 3);
        assert!(files.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn test_extension_filter_is_case_insensitive() {
        let dir = create_test_dir();
        let files = list_files_with_extension(dir.path(), "md").unwrap();
        assert_eq!(files.len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_symlink_cycle_is_not_followed() {
        let dir = create_test_dir();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("CD3_AF488").join("loop")).unwrap();
        let files = list_files_recursive(dir.path()).unwrap();
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn test_missing_directory() {
        let err = list_files_recursive(Path::new("/nonexistent/kb/supporting")).unwrap_err();
        assert!(matches!(err, IngestError::DirectoryNotFound { .. }));
    }
}
