//! Applying a static IPv4 configuration to one adapter.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::OwnedMutexGuard;

use super::{
    CommandOutcome, CommandRunner, DEFAULT_NETSH, IpConfigurationRequest, IpConfigurationResult,
    NetshCommand, check_adapter_name,
};
use crate::time::{Sleeper, TokioSleeper};

/// Default wait after a successful change before returning.
pub const DEFAULT_APPLY_SETTLE: Duration = Duration::from_millis(1500);

/// Message returned on success.
pub const SUCCESS_MESSAGE: &str = "IP address changed successfully";

/// One async mutex per adapter name.
///
/// Names are compared case-insensitively, as the OS does. Entries nobody
/// holds or waits for are pruned on the next acquisition.
#[derive(Debug, Default)]
struct AdapterLocks {
    inner: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl AdapterLocks {
    async fn acquire(&self, adapter: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(adapter.to_lowercase()).or_default())
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Reconfigures adapters through the OS network utility.
///
/// Never fails: every problem is reported as an unsuccessful
/// [`IpConfigurationResult`] carrying a descriptive message. Concurrent calls
/// for the same adapter run one after another, including the settle delay;
/// calls for different adapters run independently.
///
/// # Example
///
/// ```no_run
/// use nodus_ip::ipconfig::{DirectRunner, IpConfigurationCommander, IpConfigurationRequest};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let commander = IpConfigurationCommander::new(DirectRunner);
/// let req = IpConfigurationRequest::parse("Ethernet", "192.168.1.50", "255.255.255.0", "")?;
///
/// let result = commander.apply_static_address(&req).await;
/// println!("{}", result.message);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct IpConfigurationCommander<R, S = TokioSleeper> {
    runner: R,
    sleeper: S,
    program: String,
    apply_settle: Duration,
    locks: AdapterLocks,
}

impl<R: CommandRunner> IpConfigurationCommander<R> {
    /// Creates a commander invoking `netsh` through `runner`.
    #[must_use]
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            sleeper: TokioSleeper,
            program: DEFAULT_NETSH.to_string(),
            apply_settle: DEFAULT_APPLY_SETTLE,
            locks: AdapterLocks::default(),
        }
    }
}

impl<R: CommandRunner, S: Sleeper> IpConfigurationCommander<R, S> {
    /// Uses another network configuration utility.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Sets the wait after a successful change. Zero disables it.
    #[must_use]
    pub const fn with_apply_settle(mut self, settle: Duration) -> Self {
        self.apply_settle = settle;
        self
    }

    /// Replaces the sleeper.
    #[must_use]
    pub fn with_sleeper<S2: Sleeper>(self, sleeper: S2) -> IpConfigurationCommander<R, S2> {
        IpConfigurationCommander {
            runner: self.runner,
            sleeper,
            program: self.program,
            apply_settle: self.apply_settle,
            locks: self.locks,
        }
    }

    /// Assigns the requested static address.
    ///
    /// The adapter name is recovered from `req.adapter_id`. On success the
    /// call waits for the settle delay before returning so the network stack
    /// has applied the change.
    pub async fn apply_static_address(&self, req: &IpConfigurationRequest) -> IpConfigurationResult {
        let adapter = req.adapter_name();
        if let Err(reason) = check_adapter_name(adapter) {
            tracing::warn!("Refusing to configure adapter: {reason}");
            return IpConfigurationResult::failed(format!("Error: {reason}"));
        }

        let command = NetshCommand::static_address(self.program.as_str(), adapter, req);
        let _guard = self.locks.acquire(adapter).await;

        tracing::info!(
            adapter,
            command = %command,
            "Applying static IPv4 configuration"
        );

        let outcome = match self.runner.run(&command).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(adapter, "Configuration could not run: {e}");
                return IpConfigurationResult::failed(format!("Error: {e}"));
            }
        };

        match outcome {
            CommandOutcome {
                exit_code: Some(0), ..
            } => {
                tracing::debug!(adapter, "Configuration succeeded, settling");
                self.sleeper.sleep(self.apply_settle).await;
                IpConfigurationResult::succeeded(SUCCESS_MESSAGE)
            }
            CommandOutcome {
                exit_code: Some(code),
                output,
            } => {
                tracing::warn!(adapter, code, "Configuration failed");
                IpConfigurationResult::failed(failure_message(&command, code, &output))
            }
            CommandOutcome {
                exit_code: None,
                output,
            } => {
                tracing::warn!(adapter, "Configuration result undetermined");
                IpConfigurationResult::failed(undetermined_message(&command, &output))
            }
        }
    }
}

fn failure_message(command: &NetshCommand, code: i32, output: &str) -> String {
    let mut message = format!("Error: {} failed with exit code {code}", command.program());
    push_details(&mut message, output);
    push_context(&mut message, command);
    message
}

fn undetermined_message(command: &NetshCommand, output: &str) -> String {
    let mut message = format!(
        "Error: result undetermined, {} did not record a result",
        command.program()
    );
    push_details(&mut message, output);
    push_context(&mut message, command);
    message
}

fn push_details(message: &mut String, output: &str) {
    let output = output.trim();
    if !output.is_empty() {
        message.push_str("\nDetails: ");
        message.push_str(output);
    }
}

fn push_context(message: &mut String, command: &NetshCommand) {
    message.push_str(&format!(
        "\nAdapter: '{}'\nCommand: {command}",
        command.adapter()
    ));
}

#[cfg(test)]
#[path = "commander_tests.rs"]
mod tests;
