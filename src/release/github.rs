//! GitHub releases API client.

use super::{Release, ReleaseSource};
use crate::config::Config;
use crate::error::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode, header};
use serde::Deserialize;
use url::Url;

const USER_AGENT: &str = concat!("scriptbrew/", env!("CARGO_PKG_VERSION"));

/// The two fields read from the "latest release" response.
///
/// Everything else in the payload is ignored.
#[derive(Debug, Deserialize)]
struct LatestReleaseResponse {
    tarball_url: Option<String>,
    tag_name: Option<String>,
}

/// [`ReleaseSource`] backed by the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GitHubReleases {
    client: Client,
    api_base_url: String,
    token: Option<String>,
}

impl GitHubReleases {
    /// Creates a client for the API root and token in `config`.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::NetworkError {
                url: config.api_base_url().to_string(),
                reason: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_base_url: config.api_base_url().to_string(),
            token: config.github_token().map(String::from),
        })
    }

    /// `{api}/repos/{owner}/{repo}/releases/latest`
    fn latest_release_url(&self, owner: &str, repo: &str) -> Result<Url> {
        let invalid = |reason: String| Error::NetworkError {
            url: self.api_base_url.clone(),
            reason,
        };

        let mut url =
            Url::parse(&self.api_base_url).map_err(|e| invalid(format!("invalid API URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| invalid("API URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["repos", owner, repo, "releases", "latest"]);
        Ok(url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl ReleaseSource for GitHubReleases {
    async fn latest_release(&self, owner: &str, repo: &str) -> Result<Release> {
        let url = self.latest_release_url(owner, repo)?;
        log::debug!("GET {}", url);

        let network_error = |reason: String| Error::NetworkError {
            url: url.to_string(),
            reason,
        };

        let response = self
            .authorize(self.client.get(url.clone()))
            .header(header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| network_error(e.to_string()))?;

        let status = response.status();
        log::debug!("Release API answered {}", status);

        if status == StatusCode::NOT_FOUND {
            return Err(Error::NoReleaseFound {
                owner: owner.to_string(),
                repo: repo.to_string(),
                reason: "the API reports no published release".to_string(),
            });
        }
        if !status.is_success() {
            return Err(network_error(format!("unexpected status {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| network_error(format!("failed to read response: {e}")))?;

        parse_latest_release(&body, owner, repo)
    }

    async fn download(&self, url: &str) -> Result<Bytes> {
        let checksum_error = |reason: String| Error::ChecksumError {
            url: url.to_string(),
            reason,
        };

        let response = self
            .authorize(self.client.get(url))
            .send()
            .await
            .map_err(|e| checksum_error(format!("download failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(checksum_error(format!("download returned status {status}")));
        }

        response
            .bytes()
            .await
            .map_err(|e| checksum_error(format!("failed to read response: {e}")))
    }
}

/// Extracts the tarball URL and tag name from a "latest release" body.
pub fn parse_latest_release(body: &str, owner: &str, repo: &str) -> Result<Release> {
    let no_release = |reason: &str| Error::NoReleaseFound {
        owner: owner.to_string(),
        repo: repo.to_string(),
        reason: reason.to_string(),
    };

    let parsed: LatestReleaseResponse = serde_json::from_str(body)
        .map_err(|e| no_release(&format!("unreadable response: {e}")))?;

    let archive_url = parsed
        .tarball_url
        .filter(|value| !value.is_empty())
        .ok_or_else(|| no_release("response has no tarball_url"))?;
    let version = parsed
        .tag_name
        .filter(|value| !value.is_empty())
        .ok_or_else(|| no_release("response has no tag_name"))?;

    Ok(Release {
        version,
        archive_url,
    })
}
