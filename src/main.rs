//! HERALD — Autonomous Release Notification Agent
//!
//! Entry point. Loads configuration, initialises structured logging,
//! and runs one of three modes: a manual single-shot notify pass, the
//! continuous release monitor, or an environment diagnostic.

use std::process::ExitCode;
use std::time::Duration;
use tracing::{info, warn};

use herald::config::AppConfig;
use herald::delivery::command::CommandChannel;
use herald::directory::RecipientDirectory;
use herald::facts::EnvironmentFacts;
use herald::ledger::VersionLedger;
use herald::message::MessageFormatter;
use herald::notifier::{CycleOutcome, Notifier};
use herald::source::github::GithubReleaseClient;

const BANNER: &str = r#"
 _   _ _____ ____      _    _     ____
| | | | ____|  _ \    / \  | |   |  _ \
| |_| |  _| | |_) |  / _ \ | |   | | | |
|  _  | |___|  _ <  / ___ \| |___| |_| |
|_| |_|_____|_| \_\/_/   \_\_____|____/

  Hands-off External Release Announcement & Latest-version Dispatcher
  v0.1.0 — Autonomous Agent
"#;

const USAGE: &str = r#"Usage:
  herald manual     Send a notification for the latest release now
  herald monitor    Poll for new releases and notify on change
  herald specs      Print collected environment facts and exit

Setup:
  1. Install the messenger CLI and authenticate it once
  2. Copy config.toml next to the binary and fill in the recipient
     table with real addresses (placeholder entries are skipped)
  3. Test with: herald specs, then herald manual
  4. Run long-term with: herald monitor
"#;

/// Exit codes: 0 success / no-op, 1 partial delivery failure,
/// 2 fatal configuration error.
const EXIT_OK: u8 = 0;
const EXIT_PARTIAL: u8 = 1;
const EXIT_CONFIG: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = match AppConfig::load_or_default("config.toml") {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e:#}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    init_logging();

    let mode = std::env::args().nth(1).unwrap_or_default();
    match mode.as_str() {
        "manual" => run_manual(&cfg).await,
        "monitor" => run_monitor(&cfg).await,
        "specs" => run_specs(),
        _ => {
            println!("{BANNER}");
            println!("{USAGE}");
            ExitCode::from(EXIT_OK)
        }
    }
}

/// Build the notifier from configuration.
fn build_notifier(cfg: &AppConfig) -> Result<Notifier, ExitCode> {
    let source = match GithubReleaseClient::new(cfg.agent.repository.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to build release source client: {e}");
            return Err(ExitCode::from(EXIT_CONFIG));
        }
    };

    Ok(Notifier::new(
        Box::new(source),
        Box::new(CommandChannel::new(cfg.delivery.command.clone())),
        VersionLedger::new(cfg.agent.ledger_path.clone()),
        RecipientDirectory::new(cfg.recipients()),
        MessageFormatter::new(cfg.agent.repository.clone()),
        Duration::from_secs(cfg.agent.delivery_spacing_secs),
    ))
}

/// Manual mode: exactly one poll → notify-or-no-change pass.
async fn run_manual(cfg: &AppConfig) -> ExitCode {
    info!(repository = %cfg.agent.repository, "Manual notification pass");

    let notifier = match build_notifier(cfg) {
        Ok(n) => n,
        Err(code) => return code,
    };

    match notifier.run_cycle().await {
        CycleOutcome::Notified { version, summary } => {
            info!(version = %version, %summary, "Manual pass complete");
            if summary.failed() > 0 {
                ExitCode::from(EXIT_PARTIAL)
            } else {
                ExitCode::from(EXIT_OK)
            }
        }
        CycleOutcome::NoNewRelease { version } => {
            info!(version = version.as_deref().unwrap_or("none"), "No new release");
            ExitCode::from(EXIT_OK)
        }
        CycleOutcome::SourceFailed | CycleOutcome::LedgerFailed => {
            // Already logged with context by the notifier
            ExitCode::from(EXIT_PARTIAL)
        }
    }
}

/// Monitor mode: one pass immediately, then on a fixed interval until
/// the process is terminated.
async fn run_monitor(cfg: &AppConfig) -> ExitCode {
    println!("{BANNER}");
    info!(
        repository = %cfg.agent.repository,
        recipients = cfg.recipients.len(),
        interval_secs = cfg.agent.poll_interval_secs,
        "Starting release monitor. Press Ctrl+C to stop."
    );

    let notifier = match build_notifier(cfg) {
        Ok(n) => n,
        Err(code) => return code,
    };

    let mut interval =
        tokio::time::interval(Duration::from_secs(cfg.agent.poll_interval_secs));
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            // First tick fires immediately, then every poll interval
            _ = interval.tick() => {
                match notifier.run_cycle().await {
                    CycleOutcome::Notified { version, summary } => {
                        info!(version = %version, %summary, "Release announced");
                    }
                    CycleOutcome::NoNewRelease { .. } => {}
                    CycleOutcome::SourceFailed | CycleOutcome::LedgerFailed => {
                        warn!("Cycle abandoned — will retry on next tick");
                    }
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received.");
                break;
            }
        }
    }

    info!("HERALD shut down cleanly.");
    ExitCode::from(EXIT_OK)
}

/// Diagnostic mode: print collected environment facts and exit.
fn run_specs() -> ExitCode {
    let facts = EnvironmentFacts::collect();
    println!("Environment facts:");
    println!("{facts}");
    ExitCode::from(EXIT_OK)
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("herald=info"));

    let json_logging = std::env::var("HERALD_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
