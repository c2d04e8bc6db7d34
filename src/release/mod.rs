//! Latest-release lookup and archive checksumming.
//!
//! The hosting API is reached through the [`ReleaseSource`] trait so the
//! pipeline can run against fixtures. [`GitHubReleases`] is the production
//! implementation.
//!
//! # Module Organization
//!
//! - [`checksum`] - SHA-256 over downloaded archive bytes
//! - [`github`] - GitHub REST implementation of [`ReleaseSource`]

pub mod checksum;
pub mod github;

pub use checksum::{fetch_archive_checksum, sha256_hex};
pub use github::GitHubReleases;

use crate::config::Config;
use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;

/// Latest published release as reported by the hosting API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// Tag name, kept opaque (e.g. `v1.0`)
    pub version: String,

    /// Source tarball download URL
    pub archive_url: String,
}

/// Release plus the checksum of its archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseArchive {
    /// Release metadata
    pub release: Release,

    /// Lowercase hex SHA-256 of the archive bytes
    pub checksum: String,
}

/// Read access to a release-hosting service.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Looks up the latest release of `owner/repo`.
    ///
    /// Fails with `NetworkError` on transport failure and `NoReleaseFound`
    /// when the answer lacks a tarball URL or tag name.
    async fn latest_release(&self, owner: &str, repo: &str) -> Result<Release>;

    /// Downloads the bytes behind `url`.
    ///
    /// Fails with `ChecksumError`.
    async fn download(&self, url: &str) -> Result<Bytes>;
}

/// Fetches the latest release of the configured scripts repository and
/// checksums its archive.
///
/// Every call performs a fresh lookup and download.
pub async fn fetch_release<S>(source: &S, config: &Config) -> Result<ReleaseArchive>
where
    S: ReleaseSource + ?Sized,
{
    log::info!(
        "Fetching latest release of {}/{}",
        config.owner(),
        config.source_repo()
    );
    let release = source
        .latest_release(config.owner(), config.source_repo())
        .await?;
    log::info!("Latest release: {} ({})", release.version, release.archive_url);

    let checksum = fetch_archive_checksum(source, &release.archive_url).await?;
    log::info!("Archive SHA256: {}", checksum);

    Ok(ReleaseArchive { release, checksum })
}
