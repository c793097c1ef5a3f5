//! End-to-end notifier simulations over mock source and channel.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use herald::directory::RecipientDirectory;
use herald::ledger::VersionLedger;
use herald::message::MessageFormatter;
use herald::notifier::{CycleOutcome, Notifier};
use herald::types::Recipient;

use crate::mock::{release, FetchScript, MockDeliveryChannel, MockReleaseSource, SentMessage};

const REPO: &str = "bayfitt/market-scanner";

fn temp_ledger() -> VersionLedger {
    let mut p = std::env::temp_dir();
    p.push(format!("herald_sim_ledger_{}.txt", uuid::Uuid::new_v4()));
    VersionLedger::new(p)
}

fn recipient(name: &str, address: &str) -> Recipient {
    Recipient {
        name: name.to_string(),
        address: address.to_string(),
    }
}

struct Harness {
    notifier: Notifier,
    sends: Arc<Mutex<Vec<SentMessage>>>,
    ledger_path: std::path::PathBuf,
}

impl Harness {
    fn new(source: MockReleaseSource, channel: MockDeliveryChannel, recipients: Vec<Recipient>) -> Self {
        let sends = channel.sends_handle();
        let ledger = temp_ledger();
        let ledger_path = ledger.path().to_path_buf();
        let notifier = Notifier::new(
            Box::new(source),
            Box::new(channel),
            ledger,
            RecipientDirectory::new(recipients),
            MessageFormatter::new(REPO),
            Duration::ZERO, // no pacing in tests
        );
        Self {
            notifier,
            sends,
            ledger_path,
        }
    }

    fn ledger_value(&self) -> Option<String> {
        VersionLedger::new(self.ledger_path.clone())
            .read_last_notified()
            .unwrap()
    }

    fn sent(&self) -> Vec<SentMessage> {
        self.sends.lock().unwrap().clone()
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.ledger_path);
    }
}

// ---------------------------------------------------------------------------
// Scenarios from the notifier's contract
// ---------------------------------------------------------------------------

/// Fresh ledger, one macOS asset, two valid recipients plus one
/// placeholder: two deliveries, ledger written, desktop link resolved,
/// mobile link falls back to the generic releases page.
#[tokio::test]
async fn first_release_fans_out_and_records() {
    let harness = Harness::new(
        MockReleaseSource::fixed(release("v1.2.0", &[("app-macos.dmg", "A")])),
        MockDeliveryChannel::new(),
        vec![
            recipient("Alice", "@alice"),
            recipient("Pending", "@username_pending"),
            recipient("Bob", "+15551234567"),
        ],
    );

    let outcome = harness.notifier.run_cycle().await;
    let summary = match outcome {
        CycleOutcome::Notified { version, summary } => {
            assert_eq!(version, "v1.2.0");
            summary
        }
        other => panic!("expected Notified, got {other:?}"),
    };

    assert_eq!(summary.sent(), 2);
    assert_eq!(summary.failed(), 0);
    assert_eq!(summary.skipped(), 1);
    assert_eq!(harness.ledger_value(), Some("v1.2.0".to_string()));

    let sent = harness.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].0, "@alice");
    assert_eq!(sent[1].0, "+15551234567");

    // Same rendered body to everyone; desktop link resolved, mobile
    // slot falls back to the generic releases page
    let body = &sent[0].1;
    assert_eq!(body, &sent[1].1);
    assert!(body.contains("macOS: A\n"));
    assert!(body.contains(&format!("Android: https://github.com/{REPO}/releases/latest")));
}

/// Ledger already holds the fetched version: zero deliveries, ledger
/// untouched.
#[tokio::test]
async fn already_notified_version_is_noop() {
    let harness = Harness::new(
        MockReleaseSource::fixed(release("v1.2.0", &[])),
        MockDeliveryChannel::new(),
        vec![recipient("Alice", "@alice")],
    );
    VersionLedger::new(harness.ledger_path.clone())
        .write_last_notified("v1.2.0")
        .unwrap();

    let outcome = harness.notifier.run_cycle().await;
    assert!(matches!(outcome, CycleOutcome::NoNewRelease { .. }));
    assert!(harness.sent().is_empty());
    assert_eq!(harness.ledger_value(), Some("v1.2.0".to_string()));
}

/// Malformed source payload: cycle abandoned, nothing delivered,
/// ledger untouched, and the outcome is a value — not a panic that
/// would kill the monitor loop.
#[tokio::test]
async fn malformed_source_abandons_cycle() {
    let harness = Harness::new(
        MockReleaseSource::with_script(vec![FetchScript::Malformed("missing tag_name")]),
        MockDeliveryChannel::new(),
        vec![recipient("Alice", "@alice")],
    );

    let outcome = harness.notifier.run_cycle().await;
    assert!(matches!(outcome, CycleOutcome::SourceFailed));
    assert!(harness.sent().is_empty());
    assert_eq!(harness.ledger_value(), None);
}

/// Monotonic-once: versions [v1, v1, v2, v2, v2, v3] across six
/// cycles produce exactly three fan-outs.
#[tokio::test]
async fn repeated_versions_announce_once_each() {
    let script = ["v1", "v1", "v2", "v2", "v2", "v3"]
        .iter()
        .map(|v| FetchScript::Release(release(v, &[])))
        .collect();
    let harness = Harness::new(
        MockReleaseSource::with_script(script),
        MockDeliveryChannel::new(),
        vec![recipient("Alice", "@alice")],
    );

    let mut notified = Vec::new();
    for _ in 0..6 {
        if let CycleOutcome::Notified { version, .. } = harness.notifier.run_cycle().await {
            notified.push(version);
        }
    }

    assert_eq!(notified, ["v1", "v2", "v3"]);
    assert_eq!(harness.sent().len(), 3);
    assert_eq!(harness.ledger_value(), Some("v3".to_string()));
}

/// Fan-out isolation: recipient 2 of 5 failing still leaves recipients
/// 3-5 attempted and the ledger written.
#[tokio::test]
async fn failed_recipient_does_not_stop_the_rest() {
    let channel = MockDeliveryChannel::new();
    channel.fail_address("@two");
    let harness = Harness::new(
        MockReleaseSource::fixed(release("v1.0.0", &[])),
        channel,
        vec![
            recipient("One", "@one"),
            recipient("Two", "@two"),
            recipient("Three", "@three"),
            recipient("Four", "@four"),
            recipient("Five", "@five"),
        ],
    );

    let outcome = harness.notifier.run_cycle().await;
    let summary = match outcome {
        CycleOutcome::Notified { summary, .. } => summary,
        other => panic!("expected Notified, got {other:?}"),
    };

    assert_eq!(summary.sent(), 4);
    assert_eq!(summary.failed(), 1);
    let attempted: Vec<_> = harness.sent().iter().map(|(a, _)| a.clone()).collect();
    assert_eq!(attempted, ["@one", "@two", "@three", "@four", "@five"]);
    assert_eq!(harness.ledger_value(), Some("v1.0.0".to_string()));
}

/// Recovery: a failed poll doesn't block the next cycle from noticing
/// and announcing a new version.
#[tokio::test]
async fn source_outage_recovers_next_cycle() {
    let harness = Harness::new(
        MockReleaseSource::with_script(vec![
            FetchScript::Unavailable("connection refused"),
            FetchScript::Release(release("v1.1.0", &[])),
        ]),
        MockDeliveryChannel::new(),
        vec![recipient("Alice", "@alice")],
    );

    assert!(matches!(
        harness.notifier.run_cycle().await,
        CycleOutcome::SourceFailed
    ));
    assert!(matches!(
        harness.notifier.run_cycle().await,
        CycleOutcome::Notified { .. }
    ));
    assert_eq!(harness.ledger_value(), Some("v1.1.0".to_string()));
}

/// A version change in either direction triggers an announcement:
/// versions are equality keys, not ordered.
#[tokio::test]
async fn version_is_equality_key_not_ordered() {
    let harness = Harness::new(
        MockReleaseSource::with_script(vec![
            FetchScript::Release(release("v2.0.0", &[])),
            FetchScript::Release(release("v1.9.0", &[])), // rollback release
        ]),
        MockDeliveryChannel::new(),
        vec![recipient("Alice", "@alice")],
    );

    assert!(matches!(
        harness.notifier.run_cycle().await,
        CycleOutcome::Notified { .. }
    ));
    // A differing (even "older") version is still new to the ledger
    assert!(matches!(
        harness.notifier.run_cycle().await,
        CycleOutcome::Notified { .. }
    ));
    assert_eq!(harness.ledger_value(), Some("v1.9.0".to_string()));
}
