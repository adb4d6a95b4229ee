pub mod response;
pub mod router;
pub mod runner;

use std::fmt;

use thiserror::Error;
use tracing::{error, info};

use crate::server::config::Config;

use self::runner::{CommandRunner, RunError};

/// Program plus arguments for one run of the packet-sending tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// `<command> [-i <broadcast_address>] <mac>`
    pub fn wake(command: &str, mac: &str, broadcast_address: Option<&str>) -> Self {
        let mut args = vec![];
        if let Some(address) = broadcast_address.filter(|address| !address.is_empty()) {
            args.push("-i".to_string());
            args.push(address.to_string());
        }
        args.push(mac.to_string());

        Self::new(command, args)
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn argv(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.argv().join(" "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WolSuccess {
    pub mac: String,
    pub details: String,
}

impl WolSuccess {
    pub fn message(&self) -> String {
        format!("WoL packet sent to {}", self.mac)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WolError {
    #[error("Server configuration error: WOL_TARGET_MAC not set")]
    MissingTargetMac,
    #[error("'{program}' command not found")]
    CommandNotFound { program: String },
    #[error("Failed to send WoL packet to {mac}.")]
    CommandFailed { mac: String, details: String },
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl WolError {
    pub fn details(&self) -> Option<&str> {
        match self {
            WolError::CommandFailed { details, .. } => Some(details),
            _ => None,
        }
    }
}

/// Runs the packet-sending tool once for the configured target.
pub async fn send_wake(
    config: &Config,
    runner: &dyn CommandRunner,
) -> Result<WolSuccess, WolError> {
    let Some(mac) = config.target_mac.as_deref() else {
        error!("WOL_TARGET_MAC environment variable not set");
        return Err(WolError::MissingTargetMac);
    };

    let invocation = Invocation::wake(&config.command, mac, config.broadcast_address.as_deref());
    info!(command = %invocation, "Executing command");

    let output = runner.run(&invocation).await.map_err(|e| match e {
        RunError::NotFound { program } => {
            error!("'{program}' command not found. Is it installed and in PATH?");
            WolError::CommandNotFound { program }
        }
        other => {
            error!("An unexpected error occurred: {other}");
            WolError::Unexpected(other.to_string())
        }
    })?;

    let stdout = output.stdout.trim();
    let stderr = output.stderr.trim();

    if output.success() {
        info!(mac, output = stdout, "WoL command successful");
        return Ok(WolSuccess {
            mac: mac.to_string(),
            details: stdout.to_string(),
        });
    }

    error!(
        mac,
        exit_code = ?output.exit_code,
        stderr,
        stdout,
        "WoL command failed"
    );
    let details = if stderr.is_empty() { stdout } else { stderr };
    Err(WolError::CommandFailed {
        mac: mac.to_string(),
        details: details.to_string(),
    })
}
