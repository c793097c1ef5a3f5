//! Mock release source and delivery channel for integration testing.
//!
//! Deterministic doubles with no external dependencies: the source
//! plays back a scripted sequence of fetch results, and the channel
//! records every send in-memory and can be forced to fail per address.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use herald::delivery::{DeliveryAck, DeliveryChannel, DeliveryError};
use herald::source::{ReleaseSource, SourceError};
use herald::types::{ReleaseAsset, ReleaseDescriptor};

// ---------------------------------------------------------------------------
// Release source
// ---------------------------------------------------------------------------

/// One scripted fetch outcome.
#[derive(Debug, Clone)]
pub enum FetchScript {
    Release(ReleaseDescriptor),
    Unavailable(&'static str),
    Malformed(&'static str),
}

/// A mock release source playing back a fixed script. Each `fetch`
/// consumes one entry; the final entry repeats once the script runs out.
pub struct MockReleaseSource {
    script: Mutex<Vec<FetchScript>>,
}

impl MockReleaseSource {
    pub fn with_script(script: Vec<FetchScript>) -> Self {
        assert!(!script.is_empty(), "script must not be empty");
        Self {
            script: Mutex::new(script),
        }
    }

    /// Convenience: a source that always returns the same release.
    pub fn fixed(release: ReleaseDescriptor) -> Self {
        Self::with_script(vec![FetchScript::Release(release)])
    }
}

#[async_trait]
impl ReleaseSource for MockReleaseSource {
    async fn fetch_latest_release(&self) -> Result<ReleaseDescriptor, SourceError> {
        let mut script = self.script.lock().unwrap();
        let item = if script.len() > 1 {
            script.remove(0)
        } else {
            script[0].clone()
        };

        match item {
            FetchScript::Release(r) => Ok(r),
            FetchScript::Unavailable(m) => Err(SourceError::Unavailable(m.to_string())),
            FetchScript::Malformed(m) => Err(SourceError::Malformed(m.to_string())),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Build a release with the given version and assets.
pub fn release(version: &str, assets: &[(&str, &str)]) -> ReleaseDescriptor {
    ReleaseDescriptor {
        version: version.to_string(),
        url: format!("https://github.com/bayfitt/market-scanner/releases/tag/{version}"),
        assets: assets
            .iter()
            .map(|(name, url)| ReleaseAsset {
                name: name.to_string(),
                download_url: url.to_string(),
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Delivery channel
// ---------------------------------------------------------------------------

/// A recorded send: (address, message body).
pub type SentMessage = (String, String);

/// A mock delivery channel recording every send. Addresses listed in
/// `fail_addresses` report a non-zero-exit delivery error.
pub struct MockDeliveryChannel {
    sends: Arc<Mutex<Vec<SentMessage>>>,
    fail_addresses: Mutex<Vec<String>>,
}

impl MockDeliveryChannel {
    pub fn new() -> Self {
        Self {
            sends: Arc::new(Mutex::new(Vec::new())),
            fail_addresses: Mutex::new(Vec::new()),
        }
    }

    /// Force delivery to the given address to fail.
    pub fn fail_address(&self, address: &str) {
        self.fail_addresses.lock().unwrap().push(address.to_string());
    }

    /// Handle for inspecting sends after the channel has been boxed.
    pub fn sends_handle(&self) -> Arc<Mutex<Vec<SentMessage>>> {
        self.sends.clone()
    }
}

#[async_trait]
impl DeliveryChannel for MockDeliveryChannel {
    async fn send(&self, address: &str, message: &str) -> Result<DeliveryAck, DeliveryError> {
        self.sends
            .lock()
            .unwrap()
            .push((address.to_string(), message.to_string()));

        if self.fail_addresses.lock().unwrap().iter().any(|a| a == address) {
            Err(DeliveryError {
                address: address.to_string(),
                exit_code: Some(1),
                diagnostics: "mock: forced delivery failure".to_string(),
            })
        } else {
            Ok(DeliveryAck {
                address: address.to_string(),
                detail: "mock: delivered".to_string(),
            })
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
