//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Read file contents with standardized error handling.
///
/// Wraps `fs::read_to_string` with consistent `Error::internal_io` formatting.
pub fn read_file(path: &Path, operation: &str) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}

/// Read raw file bytes with standardized error handling.
pub fn read_bytes(path: &Path, operation: &str) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn read_file_succeeds_for_existing_file() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "test content").unwrap();

        let content = read_file(temp.path(), "test read").unwrap();
        assert!(content.contains("test content"));
    }

    #[test]
    fn read_file_returns_error_for_missing_file() {
        let result = read_file(Path::new("/nonexistent/path.txt"), "test read");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
        assert_eq!(err.details["context"], "test read");
    }

    #[test]
    fn read_bytes_returns_raw_content() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(&[0x50, 0x4b, 0x03, 0x04]).unwrap();

        let bytes = read_bytes(temp.path(), "test read").unwrap();
        assert_eq!(bytes, vec![0x50, 0x4b, 0x03, 0x04]);
    }

    #[test]
    fn expand_path_leaves_absolute_paths_alone() {
        assert_eq!(expand_path("/tmp/app.aab"), PathBuf::from("/tmp/app.aab"));
    }

    #[test]
    fn expand_path_replaces_tilde() {
        if std::env::var_os("HOME").is_none() {
            return;
        }
        let expanded = expand_path("~/app.aab");
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.ends_with("app.aab"));
    }
}
