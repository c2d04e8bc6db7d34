//! Archive checksum calculation.
//!
//! This module provides SHA256 checksum calculation for release archives
//! downloaded through a [`ReleaseSource`].

use super::ReleaseSource;
use crate::error::{Error, Result};
use sha2::{Digest, Sha256};

/// Calculates the SHA256 checksum of a byte slice.
///
/// # Returns
///
/// Hex-encoded SHA-256 hash (64 lowercase characters)
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Downloads an archive and returns the SHA256 checksum of its raw bytes.
///
/// # Arguments
///
/// * `source` - Release source used for the download
/// * `url` - Archive URL from the release metadata
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash
/// * `Err(ChecksumError)` - If the download fails or yields no bytes
pub async fn fetch_archive_checksum<S>(source: &S, url: &str) -> Result<String>
where
    S: ReleaseSource + ?Sized,
{
    log::info!("Downloading {}", url);
    let bytes = source.download(url).await?;

    if bytes.is_empty() {
        return Err(Error::ChecksumError {
            url: url.to_string(),
            reason: "download returned zero bytes".to_string(),
        });
    }

    log::debug!("Downloaded {} bytes", bytes.len());
    Ok(sha256_hex(&bytes))
}
