//! The fixed, ordered list of deployment steps.
//!
//! The order of [`DeploymentPlan::standard`] is the dependency graph: every
//! contract whose constructor takes another contract's address comes after it.
//! Nothing reorders the list at runtime.

use alloy_core::primitives::Address;

use crate::{AddressRegistry, ChainSlug, ConstructorArg, DeployConfig, DeployError};

/// Names of the contracts deployed by the core plan.
pub mod contracts {
    pub const SIGNATURE_VERIFIER: &str = "SignatureVerifier";
    pub const HASHER: &str = "Hasher";
    pub const CAPACITOR_FACTORY: &str = "CapacitorFactory";
    pub const GAS_PRICE_ORACLE: &str = "GasPriceOracle";
    pub const EXECUTION_MANAGER: &str = "ExecutionManager";
    pub const TRANSMIT_MANAGER: &str = "TransmitManager";
    pub const SOCKET: &str = "Socket";
    pub const SOCKET_BATCHER: &str = "SocketBatcher";
    pub const COUNTER: &str = "Counter";
}

use contracts::*;

/// What an argument builder can see when it runs.
pub struct StepInputs<'a> {
    pub contract: &'a str,
    pub registry: &'a AddressRegistry,
    pub config: &'a DeployConfig,
    pub chain_slug: ChainSlug,
}

impl StepInputs<'_> {
    /// Address of an earlier contract this step depends on.
    pub fn address_of(&self, dependency: &str) -> Result<Address, DeployError> {
        self.registry
            .address_of(dependency)
            .ok_or_else(|| DeployError::MissingDependency {
                contract: self.contract.to_string(),
                dependency: dependency.to_string(),
            })
    }

    pub fn owner(&self) -> ConstructorArg {
        ConstructorArg::Address(self.config.owner)
    }

    pub fn chain_slug(&self) -> ConstructorArg {
        ConstructorArg::uint(self.chain_slug.0.into())
    }

    fn dependency(&self, dependency: &str) -> Result<ConstructorArg, DeployError> {
        self.address_of(dependency).map(ConstructorArg::Address)
    }
}

/// Builds constructor arguments from the addresses deployed so far.
pub type ArgBuilder = fn(&StepInputs<'_>) -> Result<Vec<ConstructorArg>, DeployError>;

/// One contract in the plan.
#[derive(Clone, Copy)]
pub struct StepDescriptor {
    pub name: &'static str,
    pub source_path: &'static str,
    /// Contracts whose addresses [`Self::args`] reads.
    pub dependencies: &'static [&'static str],
    pub args: ArgBuilder,
}

impl std::fmt::Debug for StepDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepDescriptor")
            .field("name", &self.name)
            .field("source_path", &self.source_path)
            .field("dependencies", &self.dependencies)
            .finish()
    }
}

/// A position in the plan.
#[derive(Debug, Clone, Copy)]
pub enum Step {
    Contract(StepDescriptor),
    /// Hand over to the switchboard deployer.
    Switchboards,
}

fn no_args(_: &StepInputs<'_>) -> Result<Vec<ConstructorArg>, DeployError> {
    Ok(vec![])
}

fn owner_only(inputs: &StepInputs<'_>) -> Result<Vec<ConstructorArg>, DeployError> {
    Ok(vec![inputs.owner()])
}

fn gas_price_oracle_args(inputs: &StepInputs<'_>) -> Result<Vec<ConstructorArg>, DeployError> {
    Ok(vec![inputs.owner(), inputs.chain_slug()])
}

fn execution_manager_args(inputs: &StepInputs<'_>) -> Result<Vec<ConstructorArg>, DeployError> {
    Ok(vec![inputs.dependency(GAS_PRICE_ORACLE)?, inputs.owner()])
}

fn transmit_manager_args(inputs: &StepInputs<'_>) -> Result<Vec<ConstructorArg>, DeployError> {
    Ok(vec![
        inputs.dependency(SIGNATURE_VERIFIER)?,
        inputs.dependency(GAS_PRICE_ORACLE)?,
        inputs.owner(),
        inputs.chain_slug(),
        ConstructorArg::uint(inputs.config.seal_gas_limit(inputs.chain_slug)),
    ])
}

fn socket_args(inputs: &StepInputs<'_>) -> Result<Vec<ConstructorArg>, DeployError> {
    Ok(vec![
        inputs.chain_slug(),
        inputs.dependency(HASHER)?,
        inputs.dependency(TRANSMIT_MANAGER)?,
        inputs.dependency(EXECUTION_MANAGER)?,
        inputs.dependency(CAPACITOR_FACTORY)?,
        inputs.owner(),
    ])
}

fn counter_args(inputs: &StepInputs<'_>) -> Result<Vec<ConstructorArg>, DeployError> {
    Ok(vec![inputs.dependency(SOCKET)?])
}

/// Core messaging contracts, in deployment order.
pub const CORE_STEPS: [StepDescriptor; 7] = [
    StepDescriptor {
        name: SIGNATURE_VERIFIER,
        source_path: "contracts/utils/SignatureVerifier.sol",
        dependencies: &[],
        args: no_args,
    },
    StepDescriptor {
        name: HASHER,
        source_path: "contracts/utils/Hasher.sol",
        dependencies: &[],
        args: no_args,
    },
    StepDescriptor {
        name: CAPACITOR_FACTORY,
        source_path: "contracts/CapacitorFactory.sol",
        dependencies: &[],
        args: owner_only,
    },
    StepDescriptor {
        name: GAS_PRICE_ORACLE,
        source_path: "contracts/GasPriceOracle.sol",
        dependencies: &[],
        args: gas_price_oracle_args,
    },
    StepDescriptor {
        name: EXECUTION_MANAGER,
        source_path: "contracts/ExecutionManager.sol",
        dependencies: &[GAS_PRICE_ORACLE],
        args: execution_manager_args,
    },
    StepDescriptor {
        name: TRANSMIT_MANAGER,
        source_path: "contracts/TransmitManager.sol",
        dependencies: &[SIGNATURE_VERIFIER, GAS_PRICE_ORACLE],
        args: transmit_manager_args,
    },
    StepDescriptor {
        name: SOCKET,
        source_path: "contracts/socket/Socket.sol",
        dependencies: &[HASHER, TRANSMIT_MANAGER, EXECUTION_MANAGER, CAPACITOR_FACTORY],
        args: socket_args,
    },
];

/// Trailing utility and example plug contracts.
pub const PLUG_STEPS: [StepDescriptor; 2] = [
    StepDescriptor {
        name: SOCKET_BATCHER,
        source_path: "contracts/socket/SocketBatcher.sol",
        dependencies: &[],
        args: owner_only,
    },
    StepDescriptor {
        name: COUNTER,
        source_path: "contracts/examples/Counter.sol",
        dependencies: &[SOCKET],
        args: counter_args,
    },
];

/// Ordered list of steps for one run.
#[derive(Debug, Clone)]
pub struct DeploymentPlan {
    steps: Vec<Step>,
}

impl DeploymentPlan {
    /// Core contracts, then switchboards, then (optionally) the plugs.
    pub fn standard(deploy_plugs: bool) -> Self {
        let mut steps: Vec<Step> = CORE_STEPS.into_iter().map(Step::Contract).collect();
        steps.push(Step::Switchboards);
        if deploy_plugs {
            steps.extend(PLUG_STEPS.into_iter().map(Step::Contract));
        }
        Self { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Names of the contracts deployed directly by the plan, in order.
    pub fn contract_names(&self) -> Vec<&'static str> {
        self.steps
            .iter()
            .filter_map(|step| match step {
                Step::Contract(descriptor) => Some(descriptor.name),
                Step::Switchboards => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_core::primitives::address;

    fn config() -> DeployConfig {
        DeployConfig::new(address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8"))
    }

    #[test]
    fn test_dependencies_precede_dependents() {
        let plan = DeploymentPlan::standard(true);
        let names = plan.contract_names();

        for (position, name) in names.iter().enumerate() {
            let step = plan
                .steps()
                .iter()
                .find_map(|s| match s {
                    Step::Contract(d) if d.name == *name => Some(d),
                    _ => None,
                })
                .unwrap();
            for dependency in step.dependencies {
                let dep_position = names.iter().position(|n| n == dependency).unwrap();
                assert!(dep_position < position, "{dependency} must precede {name}");
            }
        }
    }

    #[test]
    fn test_switchboards_run_after_socket_and_before_plugs() {
        let plan = DeploymentPlan::standard(true);
        let steps = plan.steps();
        let switchboards = steps
            .iter()
            .position(|s| matches!(s, Step::Switchboards))
            .unwrap();

        assert!(matches!(steps[switchboards - 1], Step::Contract(d) if d.name == SOCKET));
        assert!(matches!(steps[switchboards + 1], Step::Contract(d) if d.name == SOCKET_BATCHER));
        assert_eq!(steps.len(), 10);
    }

    #[test]
    fn test_plugs_can_be_left_out() {
        let plan = DeploymentPlan::standard(false);
        assert_eq!(plan.contract_names().len(), 7);
        assert!(matches!(plan.steps().last(), Some(Step::Switchboards)));
    }

    #[test]
    fn test_declared_dependencies_match_argument_builders() {
        let config = config();
        let empty = AddressRegistry::new();

        for step in CORE_STEPS.iter().chain(PLUG_STEPS.iter()) {
            let inputs = StepInputs {
                contract: step.name,
                registry: &empty,
                config: &config,
                chain_slug: ChainSlug(5),
            };
            let result = (step.args)(&inputs);
            match step.dependencies.first() {
                None => assert!(result.is_ok(), "{} needs no addresses", step.name),
                Some(_) => assert!(
                    matches!(result, Err(DeployError::MissingDependency { .. })),
                    "{} must refuse to build without its dependencies",
                    step.name
                ),
            }
        }
    }

    #[test]
    fn test_transmit_manager_uses_chain_seal_gas_limit() {
        let mut config = config();
        config.seal_gas_limits.insert(ChainSlug(5), 123_456);

        let registry: AddressRegistry = [
            (SIGNATURE_VERIFIER.to_string(), address!("0x1000000000000000000000000000000000000001")),
            (GAS_PRICE_ORACLE.to_string(), address!("0x2000000000000000000000000000000000000002")),
        ]
        .into_iter()
        .collect();
        let inputs = StepInputs {
            contract: TRANSMIT_MANAGER,
            registry: &registry,
            config: &config,
            chain_slug: ChainSlug(5),
        };

        let args = transmit_manager_args(&inputs).unwrap();
        assert_eq!(args.len(), 5);
        assert_eq!(args[3], ConstructorArg::uint(5));
        assert_eq!(args[4], ConstructorArg::uint(123_456));
    }
}
