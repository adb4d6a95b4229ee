use std::{io, process::Stdio, time::Duration};

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

use super::Invocation;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// `None` when the child was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("'{program}' command not found")]
    NotFound { program: String },
    #[error("'{program}' timed out after {secs}s")]
    TimedOut { program: String, secs: u64 },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Executes an [`Invocation`] to completion. A nonzero exit is not an error
/// at this level; callers inspect [`CommandOutput::exit_code`].
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, RunError>;
}

#[derive(Debug, Clone)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, RunError> {
        let mut command = construct_command(invocation);

        let child = command.spawn().map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => RunError::NotFound {
                program: invocation.program().to_string(),
            },
            _ => RunError::Io(e),
        })?;

        // Dropping the wait future drops the child, which kills it.
        let output = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, child.wait_with_output())
                .await
                .map_err(|_| RunError::TimedOut {
                    program: invocation.program().to_string(),
                    secs: timeout.as_secs(),
                })??,
            None => child.wait_with_output().await?,
        };

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

fn construct_command(invocation: &Invocation) -> Command {
    let mut command = Command::new(invocation.program());
    command.stdin(Stdio::null());
    command.stdout(Stdio::piped());
    command.stderr(Stdio::piped());
    command.kill_on_drop(true);

    command.args(invocation.args());

    command
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Invocation {
        Invocation::new("sh", vec!["-c".to_string(), script.to_string()])
    }

    #[tokio::test]
    async fn captures_stdout_on_success() {
        let output = ProcessRunner::new(None)
            .run(&sh("echo 'Sending magic packet...'"))
            .await
            .unwrap();

        assert!(output.success());
        assert_eq!(output.stdout, "Sending magic packet...\n");
        assert_eq!(output.stderr, "");
    }

    #[tokio::test]
    async fn nonzero_exit_is_not_an_error() {
        let output = ProcessRunner::new(None)
            .run(&sh("echo 'bad address' >&2; exit 3"))
            .await
            .unwrap();

        assert!(!output.success());
        assert_eq!(output.exit_code, Some(3));
        assert_eq!(output.stderr, "bad address\n");
    }

    #[tokio::test]
    async fn missing_program_is_not_found() {
        let invocation = Invocation::new("/nonexistent/wakeonlan", vec![]);
        let err = ProcessRunner::new(None).run(&invocation).await.unwrap_err();

        assert!(matches!(err, RunError::NotFound { ref program } if program == "/nonexistent/wakeonlan"));
        assert_eq!(err.to_string(), "'/nonexistent/wakeonlan' command not found");
    }

    #[tokio::test]
    async fn slow_program_times_out() {
        let err = ProcessRunner::new(Some(Duration::from_millis(200)))
            .run(&sh("sleep 5"))
            .await
            .unwrap_err();

        assert!(matches!(err, RunError::TimedOut { secs: 0, .. }));
    }
}
