//! GitHub releases API client.
//!
//! Reads the latest published release for a repository via
//! `GET /repos/{owner}/{repo}/releases/latest`. Unauthenticated reads
//! are sufficient for public repositories (60 requests/hour per IP,
//! far above the 10-minute poll cadence).

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{ReleaseSource, SourceError};
use crate::types::{ReleaseAsset, ReleaseDescriptor};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

const BASE_URL: &str = "https://api.github.com";
const SOURCE_NAME: &str = "github";

/// Fixed client identifier sent on every request. GitHub rejects
/// requests without a User-Agent.
const USER_AGENT: &str = "HERALD/0.1.0 (release-notifier)";

// ---------------------------------------------------------------------------
// API response types (GitHub JSON → Rust)
// ---------------------------------------------------------------------------

/// GitHub release — we only deserialize the fields we need.
#[derive(Debug, Deserialize)]
struct GithubRelease {
    /// The version identifier. Absent or empty means the payload is
    /// not a usable release.
    tag_name: Option<String>,
    #[serde(default)]
    html_url: String,
    #[serde(default)]
    assets: Vec<GithubAsset>,
}

#[derive(Debug, Deserialize)]
struct GithubAsset {
    #[serde(default)]
    name: String,
    #[serde(default)]
    browser_download_url: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// GitHub releases source client.
pub struct GithubReleaseClient {
    http: Client,
    /// Repository identifier, "owner/repo".
    repository: String,
}

impl GithubReleaseClient {
    pub fn new(repository: impl Into<String>) -> Result<Self, SourceError> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SourceError::Unavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            repository: repository.into(),
        })
    }

    /// Convert a parsed GitHub release into the HERALD descriptor.
    /// Fails with `Malformed` if the version field is absent.
    fn to_descriptor(release: GithubRelease) -> Result<ReleaseDescriptor, SourceError> {
        let version = release
            .tag_name
            .ok_or_else(|| SourceError::Malformed("missing tag_name field".to_string()))?;

        let assets = release
            .assets
            .into_iter()
            .map(|a| ReleaseAsset {
                name: a.name,
                download_url: a.browser_download_url,
            })
            .collect();

        Ok(ReleaseDescriptor {
            version,
            url: release.html_url,
            assets,
        })
    }
}

// ---------------------------------------------------------------------------
// ReleaseSource trait implementation
// ---------------------------------------------------------------------------

#[async_trait]
impl ReleaseSource for GithubReleaseClient {
    async fn fetch_latest_release(&self) -> Result<ReleaseDescriptor, SourceError> {
        let url = format!("{BASE_URL}/repos/{}/releases/latest", self.repository);
        debug!(url = %url, "Fetching latest release");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(SourceError::Unavailable(format!(
                "GitHub API error {status}: {body}"
            )));
        }

        let release: GithubRelease = resp
            .json()
            .await
            .map_err(|e| SourceError::Malformed(e.to_string()))?;

        Self::to_descriptor(release)
    }

    fn name(&self) -> &str {
        SOURCE_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
