//! Utility functions for Primer.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{PrimerError, Result};

/// Default maximum size of a file read into memory (1 MiB).
///
/// Marker files and module bodies are small; anything larger is almost
/// certainly a generated artifact or a binary.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Read a file into a string with a size limit.
///
/// # Errors
///
/// Returns an error if:
/// * The file cannot be read (doesn't exist, permission denied, etc.)
/// * The file exceeds `max_size`
/// * The file is not valid UTF-8
pub fn read_to_string_with_limit(path: &Path, max_size: u64) -> Result<String> {
    let metadata = fs::metadata(path).map_err(|e| PrimerError::storage(path, e))?;

    let size = metadata.len();
    if size > max_size {
        return Err(PrimerError::storage(
            path,
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("file too large ({} bytes, max {} bytes)", size, max_size),
            ),
        ));
    }

    fs::read_to_string(path).map_err(|e| PrimerError::storage(path, e))
}

/// Read a file into a string with the default size limit.
pub fn read_to_string_limited(path: &Path) -> Result<String> {
    read_to_string_with_limit(path, DEFAULT_MAX_FILE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_read_to_string_limited_success() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Cargo.toml");
        fs::write(&path, "[package]").unwrap();

        assert_eq!(read_to_string_limited(&path).unwrap(), "[package]");
    }

    #[test]
    fn test_read_to_string_limited_nonexistent() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nonexistent.txt");

        let err = read_to_string_limited(&path).unwrap_err();
        assert!(matches!(err, PrimerError::Storage { .. }));
        assert!(err.to_string().contains("nonexistent.txt"));
    }

    #[test]
    fn test_read_to_string_with_limit_exceeds() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("large.txt");

        let mut file = fs::File::create(&path).unwrap();
        file.write_all(&[b'x'; 1000]).unwrap();

        let err = read_to_string_with_limit(&path, 500).unwrap_err().to_string();
        assert!(err.contains("too large"));
        assert!(err.contains("1000 bytes"));
        assert!(err.contains("max 500 bytes"));
    }

    #[test]
    fn test_read_to_string_at_boundary() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("boundary.txt");
        fs::write(&path, "x".repeat(100)).unwrap();

        assert!(read_to_string_with_limit(&path, 100).is_ok());
        assert!(read_to_string_with_limit(&path, 99).is_err());
    }

    #[test]
    fn test_read_binary_file_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("blob.bin");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x81]).unwrap();

        assert!(read_to_string_limited(&path).is_err());
    }
}
