//! Version ledger — the single persisted "last notified version" value.
//!
//! One UTF-8 text file holding the version identifier of the most
//! recently dispatched release. Absence of the file means "no prior
//! notification". The ledger is only ever advanced forward; it is never
//! rolled back, and a single notifier instance is assumed to own it
//! (no file lock is taken — concurrent writers are out of scope).

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger I/O failed at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Single-slot durable store for the last-notified version.
pub struct VersionLedger {
    path: PathBuf,
}

impl VersionLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the last notified version. A missing file yields `None`.
    pub fn read_last_notified(&self) -> Result<Option<String>, LedgerError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No ledger file, no prior notification");
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path).map_err(|e| self.io_err(e))?;
        let version = contents.trim().to_string();
        if version.is_empty() {
            return Ok(None);
        }
        Ok(Some(version))
    }

    /// Overwrite the stored version. Atomic from the caller's
    /// perspective: the value is written to a sibling temp file and
    /// renamed into place, so no partial write is ever observable.
    pub fn write_last_notified(&self, version: &str) -> Result<(), LedgerError> {
        let tmp = self
            .path
            .with_extension(format!("tmp.{}", uuid::Uuid::new_v4()));

        std::fs::write(&tmp, version).map_err(|e| self.io_err(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_err(e))?;

        debug!(path = %self.path.display(), version, "Ledger advanced");
        Ok(())
    }

    fn io_err(&self, source: std::io::Error) -> LedgerError {
        LedgerError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
