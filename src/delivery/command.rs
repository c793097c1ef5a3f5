//! External-command delivery channel.
//!
//! Spawns a messenger CLI once per recipient with the address and
//! message body as positional arguments. Success is exit code 0;
//! stdout/stderr are captured and surfaced in the ack or error.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::{DeliveryAck, DeliveryChannel, DeliveryError};

const CHANNEL_NAME: &str = "command";

/// Delivery via an external program: `program <address> <message>`.
pub struct CommandChannel {
    program: String,
}

impl CommandChannel {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl DeliveryChannel for CommandChannel {
    async fn send(&self, address: &str, message: &str) -> Result<DeliveryAck, DeliveryError> {
        debug!(program = %self.program, address, "Invoking delivery command");

        let output = Command::new(&self.program)
            .arg(address)
            .arg(message)
            .output()
            .await
            .map_err(|e| DeliveryError {
                address: address.to_string(),
                exit_code: None,
                diagnostics: format!("failed to spawn {}: {e}", self.program),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if output.status.success() {
            Ok(DeliveryAck {
                address: address.to_string(),
                detail: stdout,
            })
        } else {
            Err(DeliveryError {
                address: address.to_string(),
                exit_code: output.status.code(),
                diagnostics: if stderr.is_empty() { stdout } else { stderr },
            })
        }
    }

    fn name(&self) -> &str {
        CHANNEL_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
