//! HERALD — Autonomous Release Notification Agent
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod facts;
pub mod source;
pub mod ledger;
pub mod message;
pub mod directory;
pub mod delivery;
pub mod notifier;
