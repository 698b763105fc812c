//! SHA-256 integrity checks for downloaded files.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

const CHUNK_SIZE: usize = 64 * 1024;

/// Compute the lowercase hex SHA-256 of a file, streaming it in fixed chunks.
pub fn sha256_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let n = file.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Check `path` against an expected digest.
///
/// Without an expected digest the check passes. Comparison is exact, so an
/// upper-case expected digest never matches. I/O errors count as a failed check.
pub fn verify(path: &Path, expected: Option<&str>) -> bool {
    let Some(expected) = expected else {
        tracing::info!(path = %path.display(), "verification skipped, no digest provided");
        return true;
    };

    match sha256_file(path) {
        Ok(actual) if actual == expected => {
            tracing::info!(path = %path.display(), "verified");
            true
        }
        Ok(actual) => {
            tracing::error!(
                path = %path.display(),
                expected,
                actual = %actual,
                "checksum mismatch"
            );
            false
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "could not hash file");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO_WORLD: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    #[test]
    fn sha256_known_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.txt");
        std::fs::write(&path, "hello world").unwrap();

        assert_eq!(sha256_file(&path).unwrap(), HELLO_WORLD);
    }

    #[test]
    fn sha256_spans_multiple_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.bin");
        let data = vec![7u8; CHUNK_SIZE * 3 + 17];
        std::fs::write(&path, &data).unwrap();

        let expected = format!("{:x}", Sha256::digest(&data));
        assert_eq!(sha256_file(&path).unwrap(), expected);
    }

    #[test]
    fn verify_matches_exact_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.txt");
        std::fs::write(&path, "hello world").unwrap();

        assert!(verify(&path, Some(HELLO_WORLD)));
    }

    #[test]
    fn verify_rejects_wrong_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.txt");
        std::fs::write(&path, "hello world!").unwrap();

        assert!(!verify(&path, Some(HELLO_WORLD)));
    }

    #[test]
    fn verify_is_case_sensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.txt");
        std::fs::write(&path, "hello world").unwrap();

        assert!(!verify(&path, Some(HELLO_WORLD.to_uppercase().as_str())));
    }

    #[test]
    fn verify_without_digest_always_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anything.jar");
        std::fs::write(&path, "whatever bytes").unwrap();

        assert!(verify(&path, None));
        // Even a missing file passes when there is nothing to check against.
        assert!(verify(&dir.path().join("missing.jar"), None));
    }

    #[test]
    fn verify_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!verify(&dir.path().join("missing.jar"), Some(HELLO_WORLD)));
    }
}
