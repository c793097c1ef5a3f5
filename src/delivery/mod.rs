//! Delivery channel integrations.
//!
//! Defines the `DeliveryChannel` trait and provides the external-command
//! implementation. Exactly one channel is modeled; the trait seam exists
//! so tests can fan out without spawning real processes.

pub mod command;

use async_trait::async_trait;
use thiserror::Error;

/// Per-recipient delivery failure. Recoverable: the notifier records it
/// and continues with the remaining recipients.
#[derive(Debug, Error)]
#[error("delivery to {address} failed (exit {exit_code:?}): {diagnostics}")]
pub struct DeliveryError {
    pub address: String,
    /// Exit code of the external mechanism; `None` if it could not be
    /// started or was killed by a signal.
    pub exit_code: Option<i32>,
    /// Anything the mechanism wrote to its error stream, plus context.
    pub diagnostics: String,
}

/// Acknowledgement of a successful send.
#[derive(Debug, Clone)]
pub struct DeliveryAck {
    pub address: String,
    /// Whatever the mechanism printed on success (may be empty).
    pub detail: String,
}

/// Abstraction over the external delivery mechanism. One call sends one
/// message to one recipient and blocks the fan-out loop until it
/// completes — serialization is intentional rate-limit courtesy.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// Send `message` to `address`. No retry inside this component.
    async fn send(&self, address: &str, message: &str) -> Result<DeliveryAck, DeliveryError>;

    /// Channel name for logging and identification.
    fn name(&self) -> &str;
}
