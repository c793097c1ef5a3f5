//! Shared types for the HERALD agent.
//!
//! These types form the data model used across all modules.
//! They are designed to be stable so that source, delivery, and
//! notifier modules can depend on them without circular references.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Release
// ---------------------------------------------------------------------------

/// A versioned snapshot of a published artifact set, fetched fresh on
/// every poll and discarded after use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseDescriptor {
    /// Opaque version identifier. Used purely as an equality key —
    /// never parsed or ordered as semver.
    pub version: String,
    /// Human-facing release page link.
    pub url: String,
    /// Downloadable artifacts in the order the source lists them.
    pub assets: Vec<ReleaseAsset>,
}

/// A single named downloadable artifact attached to a release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub download_url: String,
}

impl fmt::Display for ReleaseDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} assets, {})",
            self.version,
            self.assets.len(),
            self.url,
        )
    }
}

impl ReleaseDescriptor {
    /// Helper to build a test/sample release with sensible defaults.
    #[cfg(test)]
    pub fn sample() -> Self {
        ReleaseDescriptor {
            version: "v1.2.0".to_string(),
            url: "https://github.com/bayfitt/market-scanner/releases/tag/v1.2.0".to_string(),
            assets: vec![
                ReleaseAsset {
                    name: "market-scanner-macos.dmg".to_string(),
                    download_url: "https://example.com/dl/macos.dmg".to_string(),
                },
                ReleaseAsset {
                    name: "market-scanner-android.apk".to_string(),
                    download_url: "https://example.com/dl/android.apk".to_string(),
                },
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Recipients
// ---------------------------------------------------------------------------

/// A delivery target: display name plus messenger address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub name: String,
    pub address: String,
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.address)
    }
}

// ---------------------------------------------------------------------------
// Delivery outcomes
// ---------------------------------------------------------------------------

/// Per-recipient outcome of one fan-out pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryStatus {
    Sent,
    Failed,
    /// Recipient had a placeholder address and was never attempted.
    Skipped,
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryStatus::Sent => write!(f, "sent"),
            DeliveryStatus::Failed => write!(f, "failed"),
            DeliveryStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// One recipient's result, recorded in directory order.
#[derive(Debug, Clone)]
pub struct DeliveryResult {
    pub recipient: Recipient,
    pub status: DeliveryStatus,
    /// Diagnostic detail: delivery ack text, error message, or skip reason.
    pub detail: String,
}

/// Batch summary of a single fan-out pass.
#[derive(Debug, Clone, Default)]
pub struct FanoutSummary {
    pub results: Vec<DeliveryResult>,
}

impl FanoutSummary {
    pub fn sent(&self) -> usize {
        self.count(DeliveryStatus::Sent)
    }

    pub fn failed(&self) -> usize {
        self.count(DeliveryStatus::Failed)
    }

    pub fn skipped(&self) -> usize {
        self.count(DeliveryStatus::Skipped)
    }

    /// Recipients that were actually attempted (sent + failed).
    pub fn attempted(&self) -> usize {
        self.sent() + self.failed()
    }

    fn count(&self, status: DeliveryStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }
}

impl fmt::Display for FanoutSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sent: {} | failed: {} | skipped: {}",
            self.sent(),
            self.failed(),
            self.skipped(),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
