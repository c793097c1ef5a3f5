//! Notification orchestrator — the detect → format → fan-out → record cycle.
//!
//! One `run_cycle` pass walks `Polling → (NoChange | Notifying) → Idle`:
//! fetch the latest release, compare against the version ledger, and if
//! new, render the announcement once and deliver it to every
//! non-placeholder recipient in directory order. The ledger is written
//! after the full fan-out attempt regardless of per-recipient outcomes —
//! it records "this release was processed", not "everyone received it".
//!
//! A single notifier instance is assumed to own the ledger file; this
//! is a documented deployment invariant, not internally enforced.

pub mod pacer;

use std::time::Duration;
use tracing::{error, info, warn};

use crate::delivery::DeliveryChannel;
use crate::directory::RecipientDirectory;
use crate::facts::EnvironmentFacts;
use crate::ledger::VersionLedger;
use crate::message::MessageFormatter;
use crate::source::ReleaseSource;
use crate::types::{DeliveryResult, DeliveryStatus, FanoutSummary};
use pacer::DispatchPacer;

/// Outcome of a single poll cycle. No variant is a process-fatal error:
/// every failure is scoped to the cycle that observed it.
#[derive(Debug)]
pub enum CycleOutcome {
    /// The release fetch failed; the cycle was abandoned with no ledger
    /// write and no deliveries. The next tick retries naturally.
    SourceFailed,
    /// The ledger could not be read; the cycle was abandoned.
    LedgerFailed,
    /// The fetched version is empty or matches the ledger.
    NoNewRelease { version: Option<String> },
    /// A fan-out ran for a newly observed version.
    Notified {
        version: String,
        summary: FanoutSummary,
    },
}

/// Ties source, ledger, formatter, directory, and channel together.
pub struct Notifier {
    source: Box<dyn ReleaseSource>,
    channel: Box<dyn DeliveryChannel>,
    ledger: VersionLedger,
    directory: RecipientDirectory,
    formatter: MessageFormatter,
    /// Inter-recipient spacing within one fan-out.
    spacing: Duration,
}

impl Notifier {
    pub fn new(
        source: Box<dyn ReleaseSource>,
        channel: Box<dyn DeliveryChannel>,
        ledger: VersionLedger,
        directory: RecipientDirectory,
        formatter: MessageFormatter,
        spacing: Duration,
    ) -> Self {
        Self {
            source,
            channel,
            ledger,
            directory,
            formatter,
            spacing,
        }
    }

    /// Run one fetch → compare → (notify) pass.
    pub async fn run_cycle(&self) -> CycleOutcome {
        info!(source = self.source.name(), "Checking for new release");

        let release = match self.source.fetch_latest_release().await {
            Ok(r) => r,
            Err(e) => {
                warn!(
                    source = self.source.name(),
                    error = %e,
                    "Release fetch failed — abandoning this cycle"
                );
                return CycleOutcome::SourceFailed;
            }
        };

        if release.version.is_empty() {
            warn!("Fetched release has an empty version, treating as no new release");
            return CycleOutcome::NoNewRelease { version: None };
        }

        let last_notified = match self.ledger.read_last_notified() {
            Ok(v) => v,
            Err(e) => {
                error!(error = %e, "Ledger read failed — abandoning this cycle");
                return CycleOutcome::LedgerFailed;
            }
        };

        if last_notified.as_deref() == Some(release.version.as_str()) {
            info!(version = %release.version, "No new release");
            return CycleOutcome::NoNewRelease {
                version: Some(release.version),
            };
        }

        info!(
            version = %release.version,
            previous = last_notified.as_deref().unwrap_or("none"),
            assets = release.assets.len(),
            "New release found"
        );

        // Render once; environment collection never fails (fixed
        // fallbacks), so formatting cannot abort the flow.
        let facts = EnvironmentFacts::collect();
        let message = self.formatter.render(&release, &facts, chrono::Utc::now());

        let summary = self.fan_out(&message).await;

        // The ledger advances even if every recipient failed: a
        // transient delivery outage must not cause a re-announcement
        // storm on the next cycle. Accepted tradeoff.
        if let Err(e) = self.ledger.write_last_notified(&release.version) {
            error!(
                version = %release.version,
                error = %e,
                "LEDGER WRITE FAILED — this release may be announced again next cycle"
            );
        }

        info!(
            version = %release.version,
            sent = summary.sent(),
            failed = summary.failed(),
            skipped = summary.skipped(),
            total = self.directory.len(),
            "Notification summary"
        );

        CycleOutcome::Notified {
            version: release.version,
            summary,
        }
    }

    /// Deliver one rendered message to every recipient, sequentially in
    /// directory order. One recipient's failure never aborts the rest.
    async fn fan_out(&self, message: &str) -> FanoutSummary {
        info!(
            recipients = self.directory.len(),
            channel = self.channel.name(),
            "Fanning out notification"
        );

        let mut pacer = DispatchPacer::new(self.spacing);
        let mut results = Vec::with_capacity(self.directory.len());

        for recipient in self.directory.list() {
            if RecipientDirectory::is_placeholder(&recipient.address) {
                warn!(
                    recipient = %recipient,
                    "Skipping placeholder address — update the contact table"
                );
                results.push(DeliveryResult {
                    recipient: recipient.clone(),
                    status: DeliveryStatus::Skipped,
                    detail: "placeholder address".to_string(),
                });
                continue;
            }

            pacer.wait_turn().await;

            match self.channel.send(&recipient.address, message).await {
                Ok(ack) => {
                    info!(recipient = %recipient, "Message sent");
                    results.push(DeliveryResult {
                        recipient: recipient.clone(),
                        status: DeliveryStatus::Sent,
                        detail: ack.detail,
                    });
                }
                Err(e) => {
                    warn!(
                        recipient = %recipient,
                        error = %e,
                        "Delivery failed — continuing fan-out"
                    );
                    results.push(DeliveryResult {
                        recipient: recipient.clone(),
                        status: DeliveryStatus::Failed,
                        detail: e.to_string(),
                    });
                }
            }
        }

        FanoutSummary { results }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
