//! Running the network command and capturing its outcome.

use std::future::Future;
use std::io;
use std::process::Stdio;

use thiserror::Error;

use super::NetshCommand;

/// What the command reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Numeric exit status, or `None` if it could not be determined.
    pub exit_code: Option<i32>,
    /// Combined stdout and stderr.
    pub output: String,
}

impl CommandOutcome {
    /// Creates an outcome.
    #[must_use]
    pub fn new(exit_code: Option<i32>, output: impl Into<String>) -> Self {
        Self {
            exit_code,
            output: output.into(),
        }
    }
}

/// Failure to run the command at all.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The elevated context was declined or could not be started.
    #[error("Elevation failed: {reason}")]
    ElevationFailed {
        /// Cause reported by the consent mechanism.
        reason: String,
    },

    /// The process could not be spawned.
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Temporary artifacts could not be written.
    #[error("Failed to write temporary files: {0}")]
    Artifacts(#[source] io::Error),
}

/// Executes a [`NetshCommand`] in a context allowed to change adapter settings.
///
/// Implementations only report what happened; interpreting the exit code is
/// left to the caller.
pub trait CommandRunner: Send + Sync {
    /// Runs the command to completion.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the command could not be launched.
    fn run(
        &self,
        command: &NetshCommand,
    ) -> impl Future<Output = Result<CommandOutcome, RunnerError>> + Send;
}

/// Runs the command as a direct child process.
///
/// Requires the current process to already hold administrative rights.
/// Output is captured through pipes and the exit status is the real one.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectRunner;

impl CommandRunner for DirectRunner {
    async fn run(&self, command: &NetshCommand) -> Result<CommandOutcome, RunnerError> {
        let output = command
            .to_process()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| RunnerError::Spawn {
                program: command.program().to_string(),
                source,
            })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(CommandOutcome::new(output.status.code(), combined))
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;
    use crate::ipconfig::IpConfigurationRequest;

    fn command(program: &str) -> NetshCommand {
        let req = IpConfigurationRequest::new(
            "Ethernet",
            Ipv4Addr::new(192, 168, 1, 50),
            Ipv4Addr::new(255, 255, 255, 0),
        );
        NetshCommand::static_address(program, "Ethernet", &req)
    }

    #[tokio::test]
    async fn direct_runner_reports_spawn_failure() {
        let err = DirectRunner
            .run(&command("nodus-ip-no-such-program"))
            .await
            .unwrap_err();

        assert!(matches!(err, RunnerError::Spawn { ref program, .. } if program == "nodus-ip-no-such-program"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn direct_runner_captures_output_and_exit_code() {
        // `echo` prints the arguments and exits 0.
        let outcome = DirectRunner.run(&command("echo")).await.unwrap();

        assert_eq!(outcome.exit_code, Some(0));
        assert!(outcome.output.contains("name=Ethernet static 192.168.1.50"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn direct_runner_reports_nonzero_exit() {
        let outcome = DirectRunner.run(&command("false")).await.unwrap();

        assert_eq!(outcome.exit_code, Some(1));
    }

    #[test]
    fn elevation_error_names_cause() {
        let err = RunnerError::ElevationFailed {
            reason: "The operation was canceled by the user".to_string(),
        };

        assert!(err.to_string().contains("canceled by the user"));
    }
}
