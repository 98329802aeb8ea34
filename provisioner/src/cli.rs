use clap::Parser;
use operator_directory::{DEFAULT_PER_PAGE, DEFAULT_REGISTRY_URL};
use std::path::PathBuf;

/// Split prepared validator keys across SSV operators and register them through the staking pool
#[derive(Parser, Clone, Debug)]
#[command(name = "provisioner", version)]
pub struct ProvisionerCli {
    /// Base url of the SSV operator API
    #[arg(long, env = "SSV_API_URL", default_value = DEFAULT_REGISTRY_URL)]
    pub operators_url: String,

    /// Page of the operator listing to request
    #[arg(long, default_value_t = 1)]
    pub operators_page: u32,

    /// Amount of operators to request
    #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
    pub operators_per_page: u32,

    /// Number of operators per committee, of the form 3f+1
    #[arg(long, default_value_t = 4)]
    pub committee_size: usize,

    /// Assign every validator to this committee
    #[arg(long, default_value_t = 0, conflicts_with = "round_robin")]
    pub committee_index: usize,

    /// Rotate validators over all committees instead of using a single one
    #[arg(long)]
    pub round_robin: bool,

    /// Directory holding keystore<i>.json files
    #[arg(long, default_value = "./keystores")]
    pub keystore_dir: PathBuf,

    /// Directory holding deposit<i>.json files
    #[arg(long, default_value = "./deposits")]
    pub deposit_dir: PathBuf,

    /// Index of the first prepared validator
    #[arg(long, default_value_t = 1)]
    pub first_index: usize,

    /// Number of validators to provision. Derived from the pool balance when absent.
    #[arg(long)]
    pub count: Option<usize>,

    /// Execution client endpoint
    #[arg(long, env = "PROVIDER_URL", default_value = "http://localhost:8545")]
    pub execution_url: String,

    /// Address of the staking pool contract
    #[arg(long, env = "STADER_SSV_STAKING_POOL")]
    pub pool_address: String,

    /// SSV token fee paid per registered validator, in ether units
    #[arg(long, default_value = "10")]
    pub ssv_fee: String,

    /// Password of the validator keystores
    #[arg(long, env = "KEYSTORE_PASSWORD", hide_env_values = true)]
    pub keystore_password: String,

    /// Hex private key of the account submitting transactions
    #[arg(long, env = "SIGNER_PRIVATE_KEY", hide_env_values = true)]
    pub signer_private_key: String,

    /// Write the run report as JSON to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Report of an earlier run. Registered validators are skipped, deposited ones are only
    /// registered.
    #[arg(long)]
    pub previous_report: Option<PathBuf>,

    /// Write the run's metrics in the Prometheus text format to this file
    #[arg(long)]
    pub metrics_file: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    pub debug_level: String,
}
