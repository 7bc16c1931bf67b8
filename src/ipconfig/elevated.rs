//! Running the command through an OS consent prompt.
//!
//! The elevated process cannot be piped to, so the command is wrapped in a
//! runner script that records its combined output and exit status in two
//! files. After the prompt returns and a settle interval passes, both files
//! are read back. All three artifacts carry the same fresh identifier and
//! are removed when the run finishes, whatever the outcome.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use uuid::Uuid;

use super::{CommandOutcome, CommandRunner, NetshCommand, RunnerError};
use crate::time::{Sleeper, TokioSleeper};

/// Default wait between the prompt returning and reading the artifacts.
pub const DEFAULT_ARTIFACT_SETTLE: Duration = Duration::from_millis(1500);

/// Launches a script in an elevated context and waits for it to exit.
pub trait Elevator: Send + Sync {
    /// Runs `script` elevated, returning once it has terminated.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::ElevationFailed`] if consent is refused or the
    /// prompt cannot be shown.
    fn launch(&self, script: &Path) -> impl Future<Output = Result<(), RunnerError>> + Send;
}

/// Script dialect for the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptFlavor {
    /// `cmd.exe` batch file.
    Batch,
    /// POSIX `sh` script.
    Shell,
}

impl ScriptFlavor {
    /// The dialect of the current platform.
    #[must_use]
    pub const fn native() -> Self {
        if cfg!(windows) { Self::Batch } else { Self::Shell }
    }

    const fn extension(self) -> &'static str {
        match self {
            Self::Batch => "bat",
            Self::Shell => "sh",
        }
    }

    /// Renders a runner that redirects the command's combined output into
    /// `output` and its exit status into `result`.
    #[must_use]
    pub fn render(self, command: &NetshCommand, output: &Path, result: &Path) -> String {
        match self {
            Self::Batch => format!(
                "@echo off\r\n{} > \"{}\" 2>&1\r\necho %ERRORLEVEL% > \"{}\"\r\n",
                command.command_line().replace('%', "%%"),
                output.display(),
                result.display(),
            ),
            Self::Shell => {
                // Single-quoted words are never expanded
                let words: Vec<String> = std::iter::once(command.program().to_string())
                    .chain(command.unquoted_args())
                    .map(|word| shell_quote(&word))
                    .collect();
                format!(
                    "#!/bin/sh\n{} > {} 2>&1\necho $? > {}\n",
                    words.join(" "),
                    shell_quote(&output.display().to_string()),
                    shell_quote(&result.display().to_string()),
                )
            }
        }
    }
}

fn shell_quote(word: &str) -> String {
    format!("'{}'", word.replace('\'', r"'\''"))
}

/// The three files belonging to one run.
#[derive(Debug)]
struct Artifacts {
    script: PathBuf,
    result: PathBuf,
    output: PathBuf,
}

impl Artifacts {
    fn new(dir: &Path, flavor: ScriptFlavor) -> Self {
        let id = Uuid::new_v4().simple();
        Self {
            script: dir.join(format!("setip_{id}.{}", flavor.extension())),
            result: dir.join(format!("setip_result_{id}.txt")),
            output: dir.join(format!("setip_output_{id}.txt")),
        }
    }

    async fn read_exit_code(&self) -> Option<i32> {
        let text = tokio::fs::read_to_string(&self.result).await.ok()?;
        text.trim().parse().ok()
    }

    async fn read_output(&self) -> String {
        tokio::fs::read(&self.output)
            .await
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default()
    }

    async fn remove(&self) {
        for path in [&self.script, &self.result, &self.output] {
            if let Err(e) = tokio::fs::remove_file(path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::debug!("Failed to remove {}: {e}", path.display());
                }
            }
        }
    }
}

/// [`CommandRunner`] that goes through an [`Elevator`] using temp artifacts.
#[derive(Debug)]
pub struct ElevatedScriptRunner<E, S = TokioSleeper> {
    elevator: E,
    sleeper: S,
    temp_dir: PathBuf,
    flavor: ScriptFlavor,
    artifact_settle: Duration,
}

impl<E: Elevator> ElevatedScriptRunner<E> {
    /// Creates a runner writing to the platform temp directory.
    #[must_use]
    pub fn new(elevator: E) -> Self {
        Self {
            elevator,
            sleeper: TokioSleeper,
            temp_dir: std::env::temp_dir(),
            flavor: ScriptFlavor::native(),
            artifact_settle: DEFAULT_ARTIFACT_SETTLE,
        }
    }
}

impl<E: Elevator, S: Sleeper> ElevatedScriptRunner<E, S> {
    /// Uses another directory for the artifacts.
    #[must_use]
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = dir.into();
        self
    }

    /// Overrides the script dialect.
    #[must_use]
    pub const fn with_flavor(mut self, flavor: ScriptFlavor) -> Self {
        self.flavor = flavor;
        self
    }

    /// Sets the wait before reading the artifacts. Zero disables it.
    #[must_use]
    pub const fn with_artifact_settle(mut self, settle: Duration) -> Self {
        self.artifact_settle = settle;
        self
    }

    /// Replaces the sleeper.
    #[must_use]
    pub fn with_sleeper<S2: Sleeper>(self, sleeper: S2) -> ElevatedScriptRunner<E, S2> {
        ElevatedScriptRunner {
            elevator: self.elevator,
            sleeper,
            temp_dir: self.temp_dir,
            flavor: self.flavor,
            artifact_settle: self.artifact_settle,
        }
    }
}

impl<E: Elevator, S: Sleeper> CommandRunner for ElevatedScriptRunner<E, S> {
    async fn run(&self, command: &NetshCommand) -> Result<CommandOutcome, RunnerError> {
        let artifacts = Artifacts::new(&self.temp_dir, self.flavor);
        let outcome = self.run_with(command, &artifacts).await;
        artifacts.remove().await;
        outcome
    }
}

impl<E: Elevator, S: Sleeper> ElevatedScriptRunner<E, S> {
    async fn run_with(
        &self,
        command: &NetshCommand,
        artifacts: &Artifacts,
    ) -> Result<CommandOutcome, RunnerError> {
        let script = self
            .flavor
            .render(command, &artifacts.output, &artifacts.result);

        tokio::fs::write(&artifacts.script, script)
            .await
            .map_err(RunnerError::Artifacts)?;

        self.elevator.launch(&artifacts.script).await?;
        self.sleeper.sleep(self.artifact_settle).await;

        let exit_code = artifacts.read_exit_code().await;
        let output = artifacts.read_output().await;

        Ok(CommandOutcome::new(exit_code, output))
    }
}

/// [`Elevator`] using the platform consent prompt.
///
/// - **Windows**: `Start-Process -Verb RunAs -Wait` through PowerShell (UAC).
/// - **Unix**: `pkexec sh <script>` (polkit).
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsentPromptElevator;

impl Elevator for ConsentPromptElevator {
    async fn launch(&self, script: &Path) -> Result<(), RunnerError> {
        let (program, mut cmd) = consent_command(script);

        let status = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| RunnerError::ElevationFailed {
                reason: format!("could not start {program}: {e}"),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(RunnerError::ElevationFailed {
                reason: format!("the request was declined or could not start ({status})"),
            })
        }
    }
}

#[cfg(windows)]
fn consent_command(script: &Path) -> (&'static str, Command) {
    let script = script.display().to_string().replace('\'', "''");
    let mut cmd = Command::new("powershell");
    cmd.args([
        "-NoProfile",
        "-NonInteractive",
        "-Command",
        &format!(
            "Start-Process -FilePath '{script}' -Verb RunAs -Wait -WindowStyle Hidden -ErrorAction Stop"
        ),
    ]);
    ("powershell", cmd)
}

#[cfg(not(windows))]
fn consent_command(script: &Path) -> (&'static str, Command) {
    let mut cmd = Command::new("pkexec");
    cmd.arg("sh").arg(script);
    ("pkexec", cmd)
}

#[cfg(test)]
#[path = "elevated_tests.rs"]
mod tests;
