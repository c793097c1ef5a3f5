//! Rate-limited dispatch policy.
//!
//! The delivery channel has implicit downstream rate limits, so
//! consecutive sends within one fan-out are spaced by a fixed interval.
//! Modeled as an explicit policy rather than an ad hoc sleep so the
//! spacing can be tuned (or the fan-out parallelized behind it) without
//! touching the orchestrator.

use std::time::Duration;
use tokio::time::Instant;

/// Enforces a minimum interval between consecutive dispatches.
/// The first dispatch is never delayed.
pub struct DispatchPacer {
    spacing: Duration,
    last_dispatch: Option<Instant>,
}

impl DispatchPacer {
    pub fn new(spacing: Duration) -> Self {
        Self {
            spacing,
            last_dispatch: None,
        }
    }

    /// Wait until the spacing since the previous dispatch has elapsed,
    /// then claim this dispatch slot.
    pub async fn wait_turn(&mut self) {
        if let Some(last) = self.last_dispatch {
            let elapsed = last.elapsed();
            if elapsed < self.spacing {
                tokio::time::sleep(self.spacing - elapsed).await;
            }
        }
        self.last_dispatch = Some(Instant::now());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
