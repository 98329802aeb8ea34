mod cli;
mod config;

use alloy::network::EthereumWallet;
use alloy::primitives::U256;
use alloy::providers::ProviderBuilder;
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::{Client, Http};
use clap::Parser;
use cli::ProvisionerCli;
use config::{Config, Secrets};
use eth::{fetch_pool_balance, validators_to_process, PrecheckError, SsvPoolGateway};
use operator_directory::HttpOperatorRegistry;
use orchestrator::{
    encode_metrics, FileKeystoreStore, KeystoreStore, ProvisioningError, Provisioner,
    RegistrationProgress, RunReport,
};
use std::fmt::Display;
use std::path::Path;
use std::process::ExitCode;
use std::str::FromStr;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// Dependencies whose request logging drowns out the provisioner's own output
const QUIET_TARGETS: &str =
    "hyper=off,hyper_util=off,alloy_transport_http=off,reqwest=off,alloy_rpc_client=off";

// Errors that end the process before or instead of a report
#[derive(Debug)]
enum RunError {
    Config(String),
    Precheck(PrecheckError),
    Provisioning(ProvisioningError),
    Report(String),
}

impl RunError {
    // The operator set is unusable whether the registry is down or returns too few operators
    fn exit_code(&self) -> ExitCode {
        match self {
            RunError::Provisioning(
                ProvisioningError::DirectoryUnavailable(_) | ProvisioningError::NoCommittees { .. },
            ) => ExitCode::from(2),
            _ => ExitCode::FAILURE,
        }
    }
}

impl Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl From<PrecheckError> for RunError {
    fn from(e: PrecheckError) -> Self {
        RunError::Precheck(e)
    }
}

impl From<ProvisioningError> for RunError {
    fn from(e: ProvisioningError) -> Self {
        RunError::Provisioning(e)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let mut cli = ProvisionerCli::parse();

    let filter = match EnvFilter::builder().parse(format!("{},{QUIET_TARGETS}", cli.debug_level)) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("Invalid log level {}: {e}", cli.debug_level);
            return ExitCode::FAILURE;
        }
    };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let secrets = Secrets::take_from_cli(&mut cli);
    let config = match Config::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    drop(cli);

    let code = match run(&config, secrets).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "Provisioning aborted");
            e.exit_code()
        }
    };
    write_metrics(config.metrics_file.as_deref());
    code
}

async fn run(config: &Config, secrets: Secrets) -> Result<ExitCode, RunError> {
    info!(?config, "Starting provisioner");

    let signer = PrivateKeySigner::from_str(&secrets.signer_private_key)
        .map_err(|e| RunError::Config(format!("Invalid signer private key: {e}")))?;
    info!(signer = %signer.address(), "Loaded transaction signer");
    let provider = ProviderBuilder::new()
        .with_recommended_fillers()
        .wallet(EthereumWallet::from(signer))
        .on_http(config.execution_url.full.clone());

    let store = FileKeystoreStore::new(config.keystore_dir.clone(), config.deposit_dir.clone());
    let count = match config.count {
        Some(count) => count,
        None => {
            let balance =
                fetch_pool_balance::<Http<Client>, _>(&provider, config.pool_address).await?;
            fundable_validators(balance, &store, config.provisioning.first_index)?
        }
    };
    info!(count, "Validators to provision");

    let previous = load_previous_report(config.previous_report.as_deref())?;
    let registry = HttpOperatorRegistry::new(&config.directory)
        .map_err(|e| RunError::Config(format!("Failed to build operator client: {e}")))?;
    let gateway: SsvPoolGateway<Http<Client>, _> =
        SsvPoolGateway::new(config.pool_address, provider, config.ssv_fee);
    let provisioner = Provisioner::new(
        config.provisioning.clone(),
        registry,
        store,
        gateway.clone(),
        gateway,
    );

    let report = provisioner
        .run(count, &secrets.keystore_password, &previous)
        .await?;
    println!("{report}");
    if let Some(path) = &config.report {
        write_report(path, &report)?;
    }

    Ok(exit_code(&report))
}

// Validators the pool balance funds, checked against the keystores from `first_index` on
fn fundable_validators(
    balance: U256,
    store: &impl KeystoreStore,
    first_index: usize,
) -> Result<usize, RunError> {
    let keystores = store
        .count_from(first_index)
        .map_err(|e| RunError::Config(format!("Failed to count prepared keystores: {e}")))?;
    Ok(validators_to_process(balance, keystores)?)
}

// Nothing to do counts as success
fn exit_code(report: &RunReport) -> ExitCode {
    if report.any_success() || report.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

// Progress of earlier runs. A missing file means there was no earlier run.
fn load_previous_report(path: Option<&Path>) -> Result<RegistrationProgress, RunError> {
    let Some(path) = path else {
        return Ok(RegistrationProgress::default());
    };
    if !path.exists() {
        warn!(path = %path.display(), "Previous report not found, starting without progress");
        return Ok(RegistrationProgress::default());
    }

    let contents = std::fs::read_to_string(path)
        .map_err(|e| RunError::Report(format!("Failed to read {}: {e}", path.display())))?;
    let report: RunReport = serde_json::from_str(&contents)
        .map_err(|e| RunError::Report(format!("Malformed report {}: {e}", path.display())))?;
    info!(
        registered = report.progress.registered().count(),
        awaiting_registration = report.progress.awaiting_count(),
        "Loaded previous report"
    );
    Ok(report.progress)
}

fn write_report(path: &Path, report: &RunReport) -> Result<(), RunError> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| RunError::Report(format!("Failed to serialize report: {e}")))?;
    std::fs::write(path, json)
        .map_err(|e| RunError::Report(format!("Failed to write {}: {e}", path.display())))?;
    info!(path = %path.display(), "Wrote run report");
    Ok(())
}

// Metrics go to a textfile collector when a path is given, otherwise to the debug log
fn write_metrics(path: Option<&Path>) {
    let text = match encode_metrics() {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "Failed to encode metrics");
            return;
        }
    };
    match path {
        Some(path) => match std::fs::write(path, text) {
            Ok(()) => info!(path = %path.display(), "Wrote metrics"),
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to write metrics"),
        },
        None => debug!(metrics = %text, "Run metrics"),
    }
}
