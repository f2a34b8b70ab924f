//! Top-level deployment run.

use serde::Serialize;

use crate::{
    AddressRegistry, ChainConnector, ChainSlug, DeployConfig, DeployError, DeploymentContext,
    DeploymentMode, PersistenceStore, SwitchboardDeployer, SwitchboardOutput, VerificationLedger,
    plan::{DeploymentPlan, Step},
};

/// Outcome of [`SocketDeployer::deploy`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentResult {
    /// One entry per contract freshly deployed during this run.
    pub verification_details: VerificationLedger,
    /// True only if every step completed.
    pub all_deployed: bool,
    /// Registry as it stood when the run ended, including pre-seeded entries.
    pub deployed_addresses: AddressRegistry,
    /// Whether the registry reached the persistence store.
    pub persisted: bool,
    /// The failure that stopped the run, if any.
    pub error: Option<String>,
}

/// Deploys the socket protocol onto one chain.
///
/// `C` submits transactions, `S` deploys the switchboard set and `P` stores
/// the resulting registry.
pub struct SocketDeployer<C, S, P> {
    connector: C,
    switchboards: S,
    store: P,
    config: DeployConfig,
    plan: DeploymentPlan,
}

impl<C, S, P> SocketDeployer<C, S, P>
where
    C: ChainConnector,
    S: SwitchboardDeployer,
    P: PersistenceStore,
{
    pub fn new(connector: C, switchboards: S, store: P, config: DeployConfig) -> Self {
        let plan = DeploymentPlan::standard(config.deploy_plugs);
        Self {
            connector,
            switchboards,
            store,
            config,
            plan,
        }
    }

    pub fn plan(&self) -> &DeploymentPlan {
        &self.plan
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    /// Walk the plan, deploying whatever `initial_addresses` is missing.
    ///
    /// Never fails: the first step error stops the run, is logged and reported
    /// through [`DeploymentResult::all_deployed`] and
    /// [`DeploymentResult::error`]. Whatever was deployed stays deployed, and
    /// the registry is saved exactly once either way.
    pub async fn deploy(
        &self,
        chain_slug: ChainSlug,
        mode: DeploymentMode,
        initial_addresses: AddressRegistry,
    ) -> DeploymentResult {
        tracing::info!(
            chain_slug = %chain_slug,
            mode = %mode,
            known_contracts = initial_addresses.len(),
            "Starting socket deployment..."
        );

        let mut ctx = DeploymentContext::new(&self.connector, chain_slug, mode, initial_addresses);

        let error = match self.run_steps(&mut ctx).await {
            Ok(()) => {
                tracing::info!(addresses = ?ctx.registry, "Contracts deployed!");
                None
            }
            Err(e) => {
                let report = e.report();
                tracing::error!(
                    chain_slug = %chain_slug,
                    mode = %mode,
                    error = %report,
                    "Error in deploying setup contracts"
                );
                Some(report)
            }
        };

        let persisted = match self.store.save(&ctx.registry, chain_slug, mode).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(
                    chain_slug = %chain_slug,
                    mode = %mode,
                    error = ?e,
                    "Failed to persist deployed addresses"
                );
                false
            }
        };

        DeploymentResult {
            verification_details: ctx.ledger,
            all_deployed: error.is_none(),
            deployed_addresses: ctx.registry,
            persisted,
            error,
        }
    }

    async fn run_steps(&self, ctx: &mut DeploymentContext<'_, C>) -> Result<(), DeployError> {
        for step in self.plan.steps() {
            match step {
                Step::Contract(descriptor) => {
                    ctx.run_step(descriptor, &self.config).await?;
                }
                Step::Switchboards => self.deploy_switchboards(ctx).await?,
            }
        }
        Ok(())
    }

    /// Move the registry and ledger into the switchboard deployer and take
    /// back what it returns, even when it fails part way.
    async fn deploy_switchboards(&self, ctx: &mut DeploymentContext<'_, C>) -> Result<(), DeployError> {
        let registry = std::mem::take(&mut ctx.registry);
        let ledger = std::mem::take(&mut ctx.ledger);
        let registry_before = registry.clone();
        let ledger_before = ledger.clone();

        let outcome = self
            .switchboards
            .deploy(ctx.chain_slug, ctx.connector, registry, ledger, ctx.mode)
            .await;

        match outcome {
            Ok(output) => {
                absorb(ctx, registry_before, ledger_before, output);
                Ok(())
            }
            Err(failure) => {
                absorb(ctx, registry_before, ledger_before, failure.partial);
                Err(DeployError::Dependency {
                    source: failure.source,
                })
            }
        }
    }
}

/// Merge a switchboard deployer's output into the running state.
///
/// Entries present before the hand-over always win; the returned ledger must
/// extend the one handed over.
fn absorb<C>(
    ctx: &mut DeploymentContext<'_, C>,
    registry_before: AddressRegistry,
    ledger_before: VerificationLedger,
    output: SwitchboardOutput,
) {
    ctx.registry = registry_before;
    for name in ctx.registry.merge(output.source_config) {
        tracing::warn!(
            contract = %name,
            "Switchboard deployer returned a different address for an existing entry, keeping the original"
        );
    }

    let returned = output.verification_details;
    if returned.starts_with(&ledger_before) {
        ctx.ledger = returned;
    } else {
        tracing::warn!("Switchboard deployer dropped verification entries, restoring them");
        ctx.ledger = ledger_before;
        for entry in returned.into_entries() {
            if !ctx.ledger.contains(&entry) {
                ctx.ledger.record(entry);
            }
        }
    }
}
