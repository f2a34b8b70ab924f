//! Per-run deployment state and the deploy-or-reuse primitive.

use crate::{
    AddressRegistry, ChainConnector, ChainSlug, ConstructorArg, ContractHandle, DeployConfig,
    DeployError, DeploymentMode, VerificationEntry, VerificationLedger,
    plan::{StepDescriptor, StepInputs},
};

/// State threaded through every step of one run.
///
/// The context exclusively owns the registry and the ledger for the duration
/// of the run.
pub struct DeploymentContext<'a, C> {
    pub registry: AddressRegistry,
    pub ledger: VerificationLedger,
    pub mode: DeploymentMode,
    pub connector: &'a C,
    pub chain_slug: ChainSlug,
}

impl<'a, C: ChainConnector> DeploymentContext<'a, C> {
    pub fn new(
        connector: &'a C,
        chain_slug: ChainSlug,
        mode: DeploymentMode,
        registry: AddressRegistry,
    ) -> Self {
        Self {
            registry,
            ledger: VerificationLedger::new(),
            mode,
            connector,
            chain_slug,
        }
    }

    /// Deploy `name` unless the registry already has it.
    ///
    /// A registered name is attached to and returned without sending a
    /// transaction or touching the ledger. Otherwise the contract is deployed,
    /// its address recorded and a verification entry appended.
    pub async fn ensure_deployed(
        &mut self,
        name: &str,
        source_path: &str,
        args: Vec<ConstructorArg>,
    ) -> Result<ContractHandle, DeployError> {
        if let Some(address) = self.registry.address_of(name) {
            let handle = self
                .connector
                .attach(name, address)
                .await
                .map_err(|source| DeployError::Lookup {
                    name: name.to_string(),
                    address,
                    source,
                })?;

            tracing::info!(
                contract = %name,
                chain_slug = %self.chain_slug,
                mode = %self.mode,
                address = %handle.address,
                "Contract found"
            );
            return Ok(handle);
        }

        let address = self
            .connector
            .deploy_new(name, source_path, &args)
            .await
            .map_err(|source| DeployError::Transaction {
                name: name.to_string(),
                source,
            })?;

        self.registry.insert(name, address)?;
        self.ledger.record(VerificationEntry {
            address,
            name: name.to_string(),
            source_path: source_path.to_string(),
            constructor_args: args,
        });

        tracing::info!(
            contract = %name,
            chain_slug = %self.chain_slug,
            mode = %self.mode,
            address = %address,
            "Contract deployed"
        );

        Ok(ContractHandle {
            name: name.to_string(),
            address,
        })
    }

    /// Build a step's constructor arguments from the current registry and
    /// ensure it is deployed.
    pub async fn run_step(
        &mut self,
        step: &StepDescriptor,
        config: &DeployConfig,
    ) -> Result<ContractHandle, DeployError> {
        let args = (step.args)(&StepInputs {
            contract: step.name,
            registry: &self.registry,
            config,
            chain_slug: self.chain_slug,
        })?;

        self.ensure_deployed(step.name, step.source_path, args).await
    }
}
