//! Exact byte digest.
//!
//! Streams the raw file through SHA-256. Two files collide only when
//! their bytes are identical, which makes this the most trusted
//! algorithm.

use super::traits::{Algorithm, Extractor, Fingerprint};
use crate::error::FingerprintError;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Read size for streaming file contents into the digest
const CHUNK_SIZE: usize = 8192;

/// SHA-256 content digest extractor
#[derive(Debug, Default, Clone, Copy)]
pub struct ExactDigest;

impl ExactDigest {
    pub fn new() -> Self {
        Self
    }

    /// Digest any reader, returning lowercase hex
    pub fn digest_reader<R: Read>(reader: &mut R) -> std::io::Result<String> {
        let mut hasher = Sha256::new();
        let mut buffer = [0u8; CHUNK_SIZE];

        loop {
            let bytes_read = reader.read(&mut buffer)?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(format!("{:x}", hasher.finalize()))
    }
}

impl Extractor for ExactDigest {
    fn fingerprint(&self, path: &Path) -> Result<Fingerprint, FingerprintError> {
        let io_error = |source| FingerprintError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(io_error)?;
        let mut reader = BufReader::new(file);
        let digest = Self::digest_reader(&mut reader).map_err(io_error)?;

        Ok(Fingerprint::new(Algorithm::Exact, digest))
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Exact
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn digest_of_empty_input_is_known_value() {
        let digest = ExactDigest::digest_reader(&mut &b""[..]).unwrap();
        assert_eq!(
            digest,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn digest_is_lowercase_hex_of_fixed_length() {
        let digest = ExactDigest::digest_reader(&mut &b"hello"[..]).unwrap();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn identical_files_share_a_digest() {
        let dir = TempDir::new().unwrap();
        let content = vec![7u8; CHUNK_SIZE * 3 + 17];
        fs::write(dir.path().join("a.png"), &content).unwrap();
        fs::write(dir.path().join("b.png"), &content).unwrap();

        let extractor = ExactDigest::new();
        let a = extractor.fingerprint(&dir.path().join("a.png")).unwrap();
        let b = extractor.fingerprint(&dir.path().join("b.png")).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.algorithm(), Algorithm::Exact);
    }

    #[test]
    fn one_byte_difference_changes_digest() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.png"), b"abcdef").unwrap();
        fs::write(dir.path().join("b.png"), b"abcdeg").unwrap();

        let extractor = ExactDigest::new();
        let a = extractor.fingerprint(&dir.path().join("a.png")).unwrap();
        let b = extractor.fingerprint(&dir.path().join("b.png")).unwrap();

        assert_ne!(a, b);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = ExactDigest::new().fingerprint(&dir.path().join("gone.png"));
        assert!(matches!(result, Err(FingerprintError::Io { .. })));
    }
}
