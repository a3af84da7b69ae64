//! SHA-256 file fingerprinter with streaming support.
//!
//! # Overview
//!
//! This module provides the [`Hasher`] struct for computing SHA-256 digests
//! of file contents using memory-efficient streaming. Files are read in
//! fixed-size chunks (8192 bytes by default) so arbitrarily large files
//! never need to fit in memory.
//!
//! # Example
//!
//! ```no_run
//! use dupehist::scanner::Hasher;
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! match hasher.hash_file(Path::new("/path/to/file.bin")) {
//!     Ok(digest) => println!("{digest}"),
//!     Err(e) => eprintln!("Warning: {e}"),
//! }
//! ```

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use super::HashError;

/// Default chunk size for streaming reads, in bytes.
pub const CHUNK_SIZE: usize = 8192;

/// Convert a raw digest to a lowercase hexadecimal string.
#[must_use]
pub fn hash_to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;

    let mut hex = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(hex, "{b:02x}");
    }
    hex
}

/// Streaming SHA-256 fingerprinter for file contents.
///
/// Stateless and cheap to share across threads; one instance can serve
/// an entire parallel hashing phase.
#[derive(Debug, Clone)]
pub struct Hasher {
    chunk_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher with the default chunk size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
        }
    }

    /// Create a hasher with a custom chunk size.
    ///
    /// Chunk sizes below 1 byte are clamped to 1.
    #[must_use]
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Compute the hex-encoded SHA-256 digest of a file's full contents.
    ///
    /// # Arguments
    ///
    /// * `path` - File to fingerprint
    ///
    /// # Errors
    ///
    /// - `NotFound` if the file doesn't exist
    /// - `PermissionDenied` if the file can't be opened for reading
    /// - `Io` for any other open or mid-stream read failure
    pub fn hash_file(&self, path: &Path) -> Result<String, HashError> {
        let mut file = File::open(path).map_err(|e| Self::map_io_error(path, e))?;

        let mut hasher = Sha256::new();
        let mut buf = vec![0u8; self.chunk_size];

        loop {
            let n = file
                .read(&mut buf)
                .map_err(|e| Self::map_io_error(path, e))?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }

        Ok(hash_to_hex(&hasher.finalize()))
    }

    fn map_io_error(path: &Path, e: io::Error) -> HashError {
        match e.kind() {
            io::ErrorKind::NotFound => HashError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => HashError::PermissionDenied(path.to_path_buf()),
            _ => HashError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_hash_known_value() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hello.txt");
        fs::write(&path, b"hello").unwrap();

        let digest = Hasher::new().hash_file(&path).unwrap();

        // SHA-256 of "hello"
        assert_eq!(
            digest,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_hash_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty");
        fs::write(&path, b"").unwrap();

        let digest = Hasher::new().hash_file(&path).unwrap();

        // SHA-256 of the empty string
        assert_eq!(
            digest,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_hash_spans_multiple_chunks() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("big.bin");
        fs::write(&path, vec![0xabu8; CHUNK_SIZE * 3 + 17]).unwrap();

        let whole = Hasher::new().hash_file(&path).unwrap();
        let tiny_chunks = Hasher::with_chunk_size(7).hash_file(&path).unwrap();

        assert_eq!(whole, tiny_chunks);
    }

    #[test]
    fn test_hash_not_found() {
        let result = Hasher::new().hash_file(Path::new("/nonexistent/file.bin"));
        assert!(matches!(result, Err(HashError::NotFound(_))));
    }

    #[test]
    fn test_hash_to_hex() {
        assert_eq!(hash_to_hex(&[0x00, 0xff, 0x0a]), "00ff0a");
        assert_eq!(hash_to_hex(&[]), "");
    }
}
