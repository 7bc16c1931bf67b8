//! Subcommand execution.
//!
//! This module wires the library layers together from the validated config
//! and dispatches each subcommand, printing user-facing results.

use std::io::Write;
use std::path::Path;

use thiserror::Error;

use nodus_ip::config::{
    Command, ConfigError, ConnectionsCommand, ValidatedConfig, write_default_config,
};
use nodus_ip::ipconfig::{
    CommandOutcome, CommandRunner, ConsentPromptElevator, DirectRunner, ElevatedScriptRunner,
    ElevationMode, IpConfigurationCommander, IpConfigurationRequest, NetshCommand, RequestError,
    RunnerError,
};
use nodus_ip::network::platform::PlatformFetcher;
use nodus_ip::network::{AdapterEnumerator, AdapterFetcher};
use nodus_ip::probe::{ConnectivityProbe, EchoTransport, IcmpTransport};
use nodus_ip::profiles::{
    ConnectionRecord, ConnectionStore, FileConnectionStore, LoadResult, StoreError, find_record,
};
use nodus_ip::update::{CURRENT_VERSION, HttpClient, ReqwestClient, UpdateChecker};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for subcommand failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// The address, mask or gateway could not be parsed.
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] RequestError),

    /// The configuration attempt reported failure.
    #[error("IP configuration failed: {0}")]
    ConfigurationFailed(String),

    /// The probe target did not reply.
    #[error("{target} is not responding")]
    Unreachable { target: String },

    /// No saved connection carries the requested name.
    #[error("No saved connection named '{0}'")]
    UnknownConnection(String),

    /// The connections file exists but cannot be read.
    #[error("Connections file is corrupted ({reason}), refusing to modify it")]
    CorruptedStore { reason: String },

    /// No connections file location was configured or found.
    #[error("No location for the connections file, pass --connections-file")]
    NoConnectionsFile,

    /// Failed to save the connections file.
    #[error("Failed to save connections: {0}")]
    StoreSave(#[source] StoreError),

    /// Failed to write the configuration template.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Failed to write to stdout.
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Command runner chosen by the configured elevation mode.
#[derive(Debug)]
pub enum AppRunner {
    /// Spawn the utility directly; the process is already elevated.
    Direct(DirectRunner),
    /// Run it through the consent prompt and the temp-file protocol.
    Prompt(ElevatedScriptRunner<ConsentPromptElevator>),
}

impl CommandRunner for AppRunner {
    async fn run(&self, command: &NetshCommand) -> Result<CommandOutcome, RunnerError> {
        match self {
            Self::Direct(runner) => runner.run(command).await,
            Self::Prompt(runner) => runner.run(command).await,
        }
    }
}

/// The library services a subcommand may need.
pub struct Services<F, R, T, St, C> {
    enumerator: AdapterEnumerator<F>,
    commander: IpConfigurationCommander<R>,
    probe: ConnectivityProbe<T>,
    store: Option<St>,
    updater: UpdateChecker<C>,
    include_inactive: bool,
}

/// Services backed by the platform and the network.
pub type AppServices =
    Services<PlatformFetcher, AppRunner, IcmpTransport, FileConnectionStore, ReqwestClient>;

impl AppServices {
    /// Builds the production services from the validated config.
    pub fn from_config(config: ValidatedConfig) -> Self {
        let enumerator = AdapterEnumerator::new(PlatformFetcher::new())
            .with_keywords(config.keywords)
            .with_exclude_patterns(config.exclude_patterns);

        let runner = match config.elevation {
            ElevationMode::Direct => AppRunner::Direct(DirectRunner),
            ElevationMode::Prompt => AppRunner::Prompt(
                ElevatedScriptRunner::new(ConsentPromptElevator)
                    .with_artifact_settle(config.artifact_settle),
            ),
        };
        let commander = IpConfigurationCommander::new(runner)
            .with_program(config.netsh)
            .with_apply_settle(config.apply_settle);

        let probe = ConnectivityProbe::new(IcmpTransport::new()).with_timeout(config.probe_timeout);
        let store = config.connections_file.map(FileConnectionStore::new);
        let updater = UpdateChecker::new(ReqwestClient::new(), config.update_url);

        Services::new(enumerator, commander, probe, store, updater)
            .with_include_inactive(config.include_inactive)
    }
}

impl<F, R, T, St, C> Services<F, R, T, St, C>
where
    F: AdapterFetcher,
    R: CommandRunner,
    T: EchoTransport,
    St: ConnectionStore,
    C: HttpClient,
{
    /// Assembles services from their parts.
    pub const fn new(
        enumerator: AdapterEnumerator<F>,
        commander: IpConfigurationCommander<R>,
        probe: ConnectivityProbe<T>,
        store: Option<St>,
        updater: UpdateChecker<C>,
    ) -> Self {
        Self {
            enumerator,
            commander,
            probe,
            store,
            updater,
            include_inactive: false,
        }
    }

    /// Lists inactive adapters even without `--all`.
    #[must_use]
    pub const fn with_include_inactive(mut self, include_inactive: bool) -> Self {
        self.include_inactive = include_inactive;
        self
    }

    /// Runs one subcommand, writing its results to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if the subcommand fails; see [`RunError`].
    pub async fn dispatch(&self, command: Command, out: &mut impl Write) -> Result<(), RunError> {
        match command {
            Command::Adapters { all } => self.list_adapters(all || self.include_inactive, out),
            Command::CurrentIp { adapter } => {
                writeln!(out, "{}", self.enumerator.current_ipv4(&adapter))?;
                Ok(())
            }
            Command::SetIp {
                adapter,
                ip,
                mask,
                gateway,
                probe,
            } => {
                let request = IpConfigurationRequest::parse(
                    &adapter,
                    &ip,
                    &mask,
                    gateway.as_deref().unwrap_or_default(),
                )?;
                self.apply(&request, out).await?;
                match probe {
                    Some(target) => self.report_probe(&target, out).await,
                    None => Ok(()),
                }
            }
            Command::Ping { target } => self.report_probe(&target, out).await,
            Command::Connect { name, no_probe } => self.connect(&name, no_probe, out).await,
            Command::Connections { action } => self.manage_connections(action, out).await,
            Command::CheckUpdate => self.check_update(out).await,
            Command::Init { output } => init(&output, out),
        }
    }

    fn list_adapters(&self, include_inactive: bool, out: &mut impl Write) -> Result<(), RunError> {
        let adapters = self.enumerator.list_adapters(include_inactive);
        if adapters.is_empty() {
            writeln!(out, "No network adapters found")?;
        }
        for adapter in adapters {
            writeln!(out, "{adapter}")?;
        }
        Ok(())
    }

    async fn apply(
        &self,
        request: &IpConfigurationRequest,
        out: &mut impl Write,
    ) -> Result<(), RunError> {
        let result = self.commander.apply_static_address(request).await;
        if !result.success {
            let reason = result
                .message
                .strip_prefix("Error: ")
                .unwrap_or(&result.message);
            return Err(RunError::ConfigurationFailed(reason.to_string()));
        }

        writeln!(
            out,
            "{}: {}/{} on '{}'",
            result.message,
            request.target_ip,
            request.subnet_mask,
            request.adapter_name()
        )?;
        Ok(())
    }

    async fn report_probe(&self, target: &str, out: &mut impl Write) -> Result<(), RunError> {
        if !self.probe.probe(target).await {
            return Err(RunError::Unreachable {
                target: target.to_string(),
            });
        }
        writeln!(out, "{target} is online")?;
        Ok(())
    }

    async fn connect(&self, name: &str, no_probe: bool, out: &mut impl Write) -> Result<(), RunError> {
        let (store, mut records) = self.load_records()?;
        let record = find_record(&mut records, name)
            .ok_or_else(|| RunError::UnknownConnection(name.to_string()))?;

        let request = record.to_request()?;
        let applied = self.apply(&request, out).await;

        let target = record.probe_target().to_string();
        let reachable = if applied.is_ok() && !no_probe && !target.is_empty() {
            Some(self.probe.probe(&target).await)
        } else {
            None
        };
        record.record_attempt(applied.is_ok(), reachable);

        if let Err(e) = store.save(&records).await {
            tracing::warn!("Failed to save connection status: {e}");
        }

        applied?;
        match reachable {
            Some(false) => Err(RunError::Unreachable { target }),
            Some(true) => {
                writeln!(out, "{target} is online")?;
                Ok(())
            }
            None => Ok(()),
        }
    }

    async fn manage_connections(
        &self,
        action: ConnectionsCommand,
        out: &mut impl Write,
    ) -> Result<(), RunError> {
        let (store, mut records) = self.load_records()?;

        match action {
            ConnectionsCommand::List => {
                if records.is_empty() {
                    writeln!(out, "No saved connections")?;
                }
                for record in &records {
                    writeln!(
                        out,
                        "{}\t[{}]\t{}\t{}\t{} -> {}",
                        record.name,
                        record.building,
                        record.status,
                        record.network_adapter,
                        record.my_ip_address,
                        record.plc_ip_address
                    )?;
                }
                Ok(())
            }
            ConnectionsCommand::Add {
                name,
                adapter,
                ip,
                plc,
                mask,
                gateway,
                building,
                notes,
            } => {
                let mut record = ConnectionRecord::new(name, adapter, ip, plc);
                record.subnet_mask = mask;
                record.gateway = gateway.unwrap_or_default();
                if let Some(building) = building {
                    record.building = building;
                }
                record.notes = notes.unwrap_or_default();

                // Reject records that could never be applied
                record.to_request()?;

                let replaced = records.iter().position(|r| r.is_named(&record.name));
                let message = match replaced {
                    Some(index) => {
                        records[index] = record.clone();
                        "Updated"
                    }
                    None => {
                        records.push(record.clone());
                        "Saved"
                    }
                };

                store.save(&records).await.map_err(RunError::StoreSave)?;
                writeln!(out, "{message} connection '{}'", record.name)?;
                Ok(())
            }
            ConnectionsCommand::Remove { name } => {
                let before = records.len();
                records.retain(|r| !r.is_named(&name));
                if records.len() == before {
                    return Err(RunError::UnknownConnection(name));
                }

                store.save(&records).await.map_err(RunError::StoreSave)?;
                writeln!(out, "Removed connection '{name}'")?;
                Ok(())
            }
        }
    }

    /// Loads the saved records; a missing file is an empty list.
    fn load_records(&self) -> Result<(&St, Vec<ConnectionRecord>), RunError> {
        let store = self.store.as_ref().ok_or(RunError::NoConnectionsFile)?;

        match store.load() {
            LoadResult::Loaded(records) => Ok((store, records)),
            LoadResult::NotFound => Ok((store, Vec::new())),
            LoadResult::Corrupted { reason } => Err(RunError::CorruptedStore { reason }),
        }
    }

    async fn check_update(&self, out: &mut impl Write) -> Result<(), RunError> {
        let status = self.updater.check().await;

        if status.update_available {
            writeln!(
                out,
                "Update available: {} (current {CURRENT_VERSION})",
                status.latest_version
            )?;
            writeln!(out, "Download: {}", status.download_url)?;
        } else {
            writeln!(
                out,
                "No update available (latest: {})",
                status.latest_version
            )?;
        }
        Ok(())
    }
}

/// Writes the configuration template for the `init` subcommand.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn init(output: &Path, out: &mut impl Write) -> Result<(), RunError> {
    write_default_config(output)?;
    writeln!(out, "Configuration template written to: {}", output.display())?;
    Ok(())
}

/// Executes one subcommand against the real platform.
///
/// # Errors
///
/// Returns an error if the subcommand fails.
///
/// # Coverage Note
///
/// This function is excluded from coverage because it requires
/// platform adapters, elevation and raw sockets.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig, command: Command) -> Result<(), RunError> {
    let services = AppServices::from_config(config);
    let mut out = std::io::stdout();
    services.dispatch(command, &mut out).await
}
