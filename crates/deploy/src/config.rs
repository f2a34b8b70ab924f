//! Deployment parameters that shape constructor arguments and the step list.

use std::{collections::BTreeMap, path::Path};

use alloy_core::primitives::Address;
use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{ChainSlug, SwitchboardSpec};

/// Seal gas limit used for chains without an explicit entry.
pub const DEFAULT_SEAL_GAS_LIMIT: u64 = 200_000;

fn default_seal_gas_limit() -> u64 {
    DEFAULT_SEAL_GAS_LIMIT
}

fn default_deploy_plugs() -> bool {
    true
}

/// Protocol-level deployment parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Owner passed to every ownable contract.
    pub owner: Address,

    /// Seal gas limit for chains missing from `seal_gas_limits`.
    #[serde(default = "default_seal_gas_limit")]
    pub default_seal_gas_limit: u64,

    /// Per-chain seal gas limit handed to the transmit manager.
    #[serde(default)]
    pub seal_gas_limits: BTreeMap<ChainSlug, u64>,

    /// Deploy the trailing batcher and example plug after the core.
    #[serde(default = "default_deploy_plugs")]
    pub deploy_plugs: bool,

    /// Switchboards deployed once the socket is in place.
    #[serde(default)]
    pub switchboards: Vec<SwitchboardSpec>,
}

impl DeployConfig {
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            default_seal_gas_limit: DEFAULT_SEAL_GAS_LIMIT,
            seal_gas_limits: BTreeMap::new(),
            deploy_plugs: true,
            switchboards: Vec::new(),
        }
    }

    pub fn seal_gas_limit(&self, chain_slug: ChainSlug) -> u64 {
        self.seal_gas_limits
            .get(&chain_slug)
            .copied()
            .unwrap_or(self.default_seal_gas_limit)
    }

    /// Load the configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).context("Failed to parse config file as TOML")?;
        tracing::info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ArgSpec;

    #[test]
    fn test_parse_full_config() {
        let config: DeployConfig = toml::from_str(
            r#"
            owner = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8"
            default_seal_gas_limit = 150000
            deploy_plugs = false

            [seal_gas_limits]
            5 = 300000
            80001 = 250000

            [[switchboards]]
            name = "FastSwitchboard"
            source_path = "contracts/switchboard/default-switchboards/FastSwitchboard.sol"
            args = ["owner", { contract = "Socket" }, "chain-slug", { uint = 7200 }]
            "#,
        )
        .unwrap();

        assert!(!config.deploy_plugs);
        assert_eq!(config.seal_gas_limit(ChainSlug(5)), 300_000);
        assert_eq!(config.seal_gas_limit(ChainSlug(80001)), 250_000);
        assert_eq!(config.seal_gas_limit(ChainSlug(1)), 150_000);
        assert_eq!(config.switchboards.len(), 1);
        assert_eq!(
            config.switchboards[0].args[1],
            ArgSpec::Contract("Socket".to_string())
        );
    }

    #[test]
    fn test_defaults() {
        let config: DeployConfig =
            toml::from_str(r#"owner = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8""#).unwrap();

        assert!(config.deploy_plugs);
        assert!(config.switchboards.is_empty());
        assert_eq!(config.seal_gas_limit(ChainSlug(1)), DEFAULT_SEAL_GAS_LIMIT);
    }
}
