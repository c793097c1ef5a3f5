//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! The compiled-in defaults mirror the reference deployment (contact
//! table, poll cadence, ledger path) so the agent can run without a
//! config file at all.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::types::Recipient;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub agent: AgentConfig,
    pub delivery: DeliveryConfig,
    pub recipients: Vec<RecipientEntry>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AgentConfig {
    pub name: String,
    /// GitHub repository to watch, "owner/repo".
    pub repository: String,
    pub poll_interval_secs: u64,
    /// Pause between consecutive recipient deliveries (rate-limit courtesy).
    pub delivery_spacing_secs: u64,
    /// Path of the single-line last-notified-version file.
    pub ledger_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DeliveryConfig {
    /// External messenger program, invoked as `command <address> <message>`.
    pub command: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RecipientEntry {
    pub name: String,
    pub address: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: "HERALD-001".to_string(),
            repository: "bayfitt/market-scanner".to_string(),
            poll_interval_secs: 600,
            delivery_spacing_secs: 3,
            ledger_path: "/tmp/market_scanner_last_release.txt".to_string(),
        }
    }
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            command: "tg-send".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            agent: AgentConfig::default(),
            delivery: DeliveryConfig::default(),
            recipients: default_recipients(),
        }
    }
}

/// Reference contact table. Entries still carrying the placeholder
/// prefixes are skipped at fan-out time, not here.
fn default_recipients() -> Vec<RecipientEntry> {
    [
        ("David Eiber", "@davideiber"),
        ("ACP Group", "-1001234567890"),
        ("Precious Perl", "@preciousperl"),
        ("JB", "@jb_username"),
        ("Doron", "@doron_username"),
        ("Asher", "@asher_username"),
        ("Josh Noahide", "@josh_noahide"),
        ("Dassy", "@dassy_username"),
        ("Dad", "+14045433417"),
    ]
    .into_iter()
    .map(|(name, address)| RecipientEntry {
        name: name.to_string(),
        address: address.to_string(),
    })
    .collect()
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to the
    /// compiled-in defaults. A present-but-invalid file is still an
    /// error — silently ignoring a broken config hides typos.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Recipients in configured order.
    pub fn recipients(&self) -> Vec<Recipient> {
        self.recipients
            .iter()
            .map(|e| Recipient {
                name: e.name.clone(),
                address: e.address.clone(),
            })
            .collect()
    }
}
