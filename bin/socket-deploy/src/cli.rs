use std::path::PathBuf;

use alloy_core::primitives::Address;
use clap::Parser;
use serde::Serialize;
use socket_deploy::{ChainSlug, DeploymentMode};
use tracing::level_filters::LevelFilter;
use url::Url;

/// The default name of the configuration file.
pub const DEFAULT_CONFIG_FILENAME: &str = "Socket.toml";

#[derive(Parser)]
#[command(name = "socket-deploy")]
#[command(
    author,
    version,
    about = "Deploy the Socket messaging contracts onto a chain, resuming any previous run"
)]
pub struct Cli {
    /// The verbosity level.
    #[arg(short, long, env = "SOCKET_VERBOSITY", default_value_t = LevelFilter::INFO)]
    pub verbosity: LevelFilter,

    /// Path to the configuration file.
    ///
    /// Values from the file are overridden by `SOCKET_*` environment variables,
    /// which are in turn overridden by command line flags.
    #[arg(long, alias = "conf", env = "SOCKET_CONFIG", default_value = DEFAULT_CONFIG_FILENAME)]
    pub config: PathBuf,

    #[clap(flatten)]
    pub overrides: Overrides,
}

/// Settings that can be given on the command line instead of the config file.
#[derive(Debug, Clone, Default, Parser, Serialize)]
pub struct Overrides {
    /// JSON-RPC endpoint of the target chain. The node must hold the deployer account.
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<Url>,

    /// Chain slug of the target chain.
    ///
    /// If not provided, the chain id reported by the node is used.
    #[arg(long, alias = "chain")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_slug: Option<ChainSlug>,

    /// Deployment mode (dev, surge or prod).
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<DeploymentMode>,

    /// Account the node deploys from.
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployer: Option<Address>,

    /// Owner of the deployed contracts.
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Address>,

    /// Directory of compiled contract artifacts.
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<PathBuf>,

    /// Directory where address and verification files are kept.
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployments: Option<PathBuf>,

    /// Seconds to wait for each creation transaction to be mined.
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation_timeout: Option<u64>,

    /// Skip the trailing batcher and example plug contracts.
    #[arg(long)]
    #[serde(skip)]
    pub no_plugs: bool,

    #[arg(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deploy_plugs: Option<bool>,
}

impl Overrides {
    /// Fold flag-only switches into the serialized shape of the settings.
    pub fn normalized(mut self) -> Self {
        if self.no_plugs {
            self.deploy_plugs = Some(false);
        }
        self
    }
}
