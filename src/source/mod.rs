//! Release source integrations.
//!
//! Defines the `ReleaseSource` trait and provides the GitHub releases
//! implementation. The trait seam exists so the notifier can be driven
//! by an in-memory source in tests.

pub mod github;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::ReleaseDescriptor;

/// Poll-time failures. Both variants are recoverable: the notifier
/// abandons the current cycle and tries again on the next tick.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Transport-level failure: connection refused, DNS, timeout,
    /// or a non-success HTTP status.
    #[error("release source unavailable: {0}")]
    Unavailable(String),

    /// The response arrived but could not be parsed into a release
    /// descriptor (non-JSON body, missing version field).
    #[error("release source returned malformed payload: {0}")]
    Malformed(String),
}

/// Abstraction over the remote release feed.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Fetch the latest published release descriptor.
    /// No retry at this layer — retry policy belongs to the poll cadence.
    async fn fetch_latest_release(&self) -> Result<ReleaseDescriptor, SourceError>;

    /// Source name for logging and identification.
    fn name(&self) -> &str;
}
