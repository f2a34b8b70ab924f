//! Delegated deployment of the switchboard contracts.

use std::future::Future;

use alloy_core::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::{
    AddressRegistry, ChainConnector, ChainSlug, ConstructorArg, DeployConfig, DeployError,
    DeploymentContext, DeploymentMode, VerificationLedger,
};

/// Registry and ledger handed back by a switchboard deployer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwitchboardOutput {
    pub source_config: AddressRegistry,
    pub verification_details: VerificationLedger,
}

/// A switchboard deployment that stopped part way.
///
/// `partial` carries whatever was deployed before the failure so the caller
/// can still persist it.
#[derive(Debug, thiserror::Error)]
#[error("switchboard deployment stopped")]
pub struct SwitchboardFailure {
    pub partial: SwitchboardOutput,
    #[source]
    pub source: anyhow::Error,
}

/// Deploys the switchboard set once the core contracts exist.
///
/// The address registry and verification ledger are moved in and must be
/// returned, extended with whatever the deployer added.
pub trait SwitchboardDeployer: Send + Sync {
    fn deploy<C: ChainConnector>(
        &self,
        chain_slug: ChainSlug,
        connector: &C,
        addresses: AddressRegistry,
        verification: VerificationLedger,
        mode: DeploymentMode,
    ) -> impl Future<Output = Result<SwitchboardOutput, SwitchboardFailure>> + Send;
}

/// How to produce one switchboard constructor argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArgSpec {
    /// The deployment owner.
    Owner,
    /// The target chain slug.
    ChainSlug,
    /// Address of a contract already in the registry.
    Contract(String),
    /// A literal address.
    Address(Address),
    /// A literal unsigned integer.
    Uint(u64),
}

impl ArgSpec {
    fn resolve(
        &self,
        switchboard: &str,
        registry: &AddressRegistry,
        owner: Address,
        chain_slug: ChainSlug,
    ) -> Result<ConstructorArg, DeployError> {
        Ok(match self {
            Self::Owner => ConstructorArg::Address(owner),
            Self::ChainSlug => ConstructorArg::uint(chain_slug.0.into()),
            Self::Contract(name) => ConstructorArg::Address(registry.address_of(name).ok_or_else(
                || DeployError::MissingDependency {
                    contract: switchboard.to_string(),
                    dependency: name.clone(),
                },
            )?),
            Self::Address(address) => ConstructorArg::Address(*address),
            Self::Uint(value) => ConstructorArg::uint(*value),
        })
    }
}

/// One switchboard contract to deploy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchboardSpec {
    pub name: String,
    pub source_path: String,
    #[serde(default)]
    pub args: Vec<ArgSpec>,
}

/// Deploys a fixed list of switchboards taken from configuration, in order,
/// with the same deploy-or-reuse rule as the core contracts.
#[derive(Debug, Clone)]
pub struct ConfiguredSwitchboards {
    owner: Address,
    switchboards: Vec<SwitchboardSpec>,
}

impl ConfiguredSwitchboards {
    pub fn new(owner: Address, switchboards: Vec<SwitchboardSpec>) -> Self {
        Self {
            owner,
            switchboards,
        }
    }

    pub fn from_config(config: &DeployConfig) -> Self {
        Self::new(config.owner, config.switchboards.clone())
    }
}

impl SwitchboardDeployer for ConfiguredSwitchboards {
    async fn deploy<C: ChainConnector>(
        &self,
        chain_slug: ChainSlug,
        connector: &C,
        addresses: AddressRegistry,
        verification: VerificationLedger,
        mode: DeploymentMode,
    ) -> Result<SwitchboardOutput, SwitchboardFailure> {
        let mut ctx = DeploymentContext {
            registry: addresses,
            ledger: verification,
            mode,
            connector,
            chain_slug,
        };

        for spec in &self.switchboards {
            let result = match spec
                .args
                .iter()
                .map(|arg| arg.resolve(&spec.name, &ctx.registry, self.owner, chain_slug))
                .collect::<Result<Vec<_>, _>>()
            {
                Ok(args) => ctx.ensure_deployed(&spec.name, &spec.source_path, args).await,
                Err(e) => Err(e),
            };

            if let Err(e) = result {
                return Err(SwitchboardFailure {
                    partial: SwitchboardOutput {
                        source_config: ctx.registry,
                        verification_details: ctx.ledger,
                    },
                    source: e.into(),
                });
            }
        }

        tracing::debug!(
            chain_slug = %chain_slug,
            count = self.switchboards.len(),
            "Switchboards ready"
        );

        Ok(SwitchboardOutput {
            source_config: ctx.registry,
            verification_details: ctx.ledger,
        })
    }
}
