//! Recipient directory.
//!
//! Static, loaded once at process start from configuration. Order is
//! preserved and determines fan-out order. Addresses still carrying a
//! placeholder sentinel are recognized here and skipped by the
//! notifier before the delivery channel is ever invoked.

use crate::types::Recipient;

/// Sentinel prefixes marking an address that was never filled in.
/// These match the unedited entries of the reference contact table.
const PLACEHOLDER_PREFIXES: [&str; 2] = ["@username", "-100123"];

/// Ordered, immutable set of delivery targets.
pub struct RecipientDirectory {
    recipients: Vec<Recipient>,
}

impl RecipientDirectory {
    pub fn new(recipients: Vec<Recipient>) -> Self {
        Self { recipients }
    }

    /// Recipients in fan-out order.
    pub fn list(&self) -> &[Recipient] {
        &self.recipients
    }

    pub fn len(&self) -> usize {
        self.recipients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipients.is_empty()
    }

    /// Whether an address is an unconfigured placeholder. Empty
    /// addresses count as placeholders too — there is nothing to
    /// deliver to.
    pub fn is_placeholder(address: &str) -> bool {
        address.is_empty()
            || PLACEHOLDER_PREFIXES
                .iter()
                .any(|p| address.starts_with(p))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
