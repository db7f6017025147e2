//! SHA-256 helpers for cached executables and downloaded archives.

use super::error::{Error, ErrorExt, Result};
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Calculates the hex-encoded SHA-256 of a file.
///
/// Reads the file in 8KB chunks so large executables are never held in memory.
pub async fn file_sha256(file_path: &Path) -> Result<String> {
    let mut file = tokio::fs::File::open(file_path)
        .await
        .fs_context("opening file for hashing", file_path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];

    loop {
        let n = file
            .read(&mut buffer)
            .await
            .fs_context("reading file for hash calculation", file_path)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Validates a user-supplied SHA-256 and returns it lowercased.
pub fn normalize_digest(digest: &str) -> Result<String> {
    let digest = digest.trim();
    let bytes = hex::decode(digest)
        .map_err(|e| Error::GenericError(format!("Invalid SHA-256 `{digest}`: {e}")))?;
    if bytes.len() != 32 {
        return Err(Error::GenericError(format!(
            "Invalid SHA-256 `{digest}`: expected 64 hex characters"
        )));
    }
    Ok(digest.to_ascii_lowercase())
}
