//! Release announcement formatter.
//!
//! Pure transform from (release, environment facts, timestamp) to the
//! message body handed to the delivery channel. The timestamp is
//! injected by the caller — it is the only source of non-determinism,
//! and keeping it out of this module keeps the formatter testable.

use chrono::{DateTime, Utc};

use crate::facts::EnvironmentFacts;
use crate::types::ReleaseDescriptor;

/// Substrings identifying the desktop-platform build among asset names.
/// Matching is case-sensitive against the name as the source lists it.
const DESKTOP_MARKERS: [&str; 2] = ["macos", "dmg"];

/// Substrings identifying the mobile-platform build.
const MOBILE_MARKERS: [&str; 2] = ["android", "apk"];

/// Placeholder when the source omits the version field entirely.
const UNKNOWN_VERSION: &str = "Unknown";

/// Static feature summary included in every announcement.
const FEATURES: [&str; 7] = [
    "Real-time market scanning",
    "VWAP momentum analysis",
    "Options gamma walls detection",
    "Squeeze metrics (float, SI, volume)",
    "BTC benchmark comparison",
    "One-button trading interface",
    "Dark theme (8-bit ANSI colors)",
];

/// Renders release descriptors into announcement bodies.
///
/// Holds only the repository identifier, which parameterizes the
/// fallback link used when an asset class has no matching artifact.
pub struct MessageFormatter {
    repository: String,
}

impl MessageFormatter {
    pub fn new(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
        }
    }

    /// The generic releases page, substituted for any asset class with
    /// no matching download.
    pub fn fallback_link(&self) -> String {
        format!("https://github.com/{}/releases/latest", self.repository)
    }

    /// Render the announcement. Never fails: missing descriptor fields
    /// are filled with documented placeholders rather than raised.
    pub fn render(
        &self,
        release: &ReleaseDescriptor,
        facts: &EnvironmentFacts,
        now: DateTime<Utc>,
    ) -> String {
        let version = if release.version.is_empty() {
            UNKNOWN_VERSION
        } else {
            release.version.as_str()
        };

        let (desktop_link, mobile_link) = self.classify_assets(release);
        let desktop_link = desktop_link.unwrap_or_else(|| self.fallback_link());
        let mobile_link = mobile_link.unwrap_or_else(|| self.fallback_link());

        let features = FEATURES
            .iter()
            .map(|f| format!("- {f}"))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "Market Scanner {version} - Ready to Download!\n\
             \n\
             Autonomous Bitcoin Outperformer Scanner\n\
             \n\
             Download Links:\n\
             macOS: {desktop_link}\n\
             Android: {mobile_link}\n\
             \n\
             Key Features:\n\
             {features}\n\
             \n\
             Full Release: {url}\n\
             \n\
             AUTOMATED NOTIFICATION\n\
             Sent by: Market Scanner Build Bot\n\
             Reason: New app version available for testing\n\
             Build Time: {build_time}\n\
             \n\
             Built on:\n\
             {facts}\n\
             \n\
             This is an automated message sent from the build container",
            url = release.url,
            build_time = now.to_rfc3339(),
        )
    }

    /// Walk the assets once, assigning each to at most one class.
    /// Desktop markers are checked first, so an asset matching both
    /// classes fills only the desktop slot; within a class the last
    /// matching asset wins.
    fn classify_assets(&self, release: &ReleaseDescriptor) -> (Option<String>, Option<String>) {
        let mut desktop = None;
        let mut mobile = None;
        for asset in &release.assets {
            if DESKTOP_MARKERS.iter().any(|m| asset.name.contains(m)) {
                desktop = Some(asset.download_url.clone());
            } else if MOBILE_MARKERS.iter().any(|m| asset.name.contains(m)) {
                mobile = Some(asset.download_url.clone());
            }
        }
        (desktop, mobile)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
