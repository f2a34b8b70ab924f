//! Layered run settings: config file, then `SOCKET_*` env vars, then flags.

use std::path::{Path, PathBuf};

use alloy_core::primitives::Address;
use anyhow::Context;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::Deserialize;
use socket_deploy::{ChainSlug, DEFAULT_CONFIRMATION_TIMEOUT, DeployConfig, DeploymentMode};
use url::Url;

use crate::cli::Overrides;

fn default_artifacts() -> PathBuf {
    PathBuf::from("artifacts")
}

fn default_deployments() -> PathBuf {
    PathBuf::from("deployments")
}

fn default_confirmation_timeout() -> u64 {
    DEFAULT_CONFIRMATION_TIMEOUT.as_secs()
}

/// Everything a run needs.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub rpc_url: Url,
    #[serde(default)]
    pub chain_slug: Option<ChainSlug>,
    #[serde(default)]
    pub mode: DeploymentMode,
    pub deployer: Address,
    #[serde(default = "default_artifacts")]
    pub artifacts: PathBuf,
    #[serde(default = "default_deployments")]
    pub deployments: PathBuf,
    /// Seconds to wait for each creation transaction.
    #[serde(default = "default_confirmation_timeout")]
    pub confirmation_timeout: u64,
    #[serde(flatten)]
    pub deploy: DeployConfig,
}

impl Settings {
    /// Merge the config file (if present), the environment and the flags.
    pub fn load(config_path: &Path, overrides: Overrides) -> anyhow::Result<Self> {
        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "No config file, using env and flags only");
        }

        let settings: Self = Figment::new()
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("SOCKET_"))
            .merge(Serialized::defaults(overrides.normalized()))
            .extract()
            .context("Invalid deployment settings")?;

        tracing::info!(
            path = %config_path.display(),
            rpc_url = %settings.rpc_url,
            mode = %settings.mode,
            "Configuration loaded"
        );
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    const CONFIG: &str = r#"
        rpc_url = "http://localhost:8545"
        deployer = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        owner = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        mode = "surge"
        chain_slug = 31337

        [[switchboards]]
        name = "FastSwitchboard"
        source_path = "contracts/switchboard/default-switchboards/FastSwitchboard.sol"
        args = ["owner", { contract = "Socket" }]
    "#;

    #[test]
    fn test_file_values_and_defaults() {
        let dir = TempDir::new("settings").unwrap();
        let path = dir.path().join("Socket.toml");
        std::fs::write(&path, CONFIG).unwrap();

        let settings = Settings::load(&path, Overrides::default()).unwrap();

        assert_eq!(settings.mode, DeploymentMode::Surge);
        assert_eq!(settings.chain_slug, Some(ChainSlug(31337)));
        assert_eq!(settings.artifacts, PathBuf::from("artifacts"));
        assert_eq!(settings.confirmation_timeout, 120);
        assert!(settings.deploy.deploy_plugs);
        assert_eq!(settings.deploy.switchboards.len(), 1);
    }

    #[test]
    fn test_flags_override_file() {
        let dir = TempDir::new("settings").unwrap();
        let path = dir.path().join("Socket.toml");
        std::fs::write(&path, CONFIG).unwrap();

        let overrides = Overrides {
            mode: Some(DeploymentMode::Prod),
            chain_slug: Some(ChainSlug(5)),
            no_plugs: true,
            ..Default::default()
        };
        let settings = Settings::load(&path, overrides).unwrap();

        assert_eq!(settings.mode, DeploymentMode::Prod);
        assert_eq!(settings.chain_slug, Some(ChainSlug(5)));
        assert!(!settings.deploy.deploy_plugs);
    }
}
