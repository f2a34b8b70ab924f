//! socket-deploy is a CLI tool to deploy the Socket protocol contracts onto a chain.

mod cli;
mod settings;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use comfy_table::{Table, presets::UTF8_FULL};

use cli::Cli;
use settings::Settings;
use socket_deploy::{
    ArtifactStore, ChainSlug, ConfiguredSwitchboards, DeploymentResult, JsonFileStore,
    RpcConnector, SocketDeployer,
};

/// Render the final registry, marking which contracts this run deployed.
fn summary_table(result: &DeploymentResult) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Contract", "Address", "Status"]);

    for (name, address) in result.deployed_addresses.iter() {
        let fresh = result
            .verification_details
            .iter()
            .any(|entry| &entry.name == name);
        table.add_row(vec![
            name.clone(),
            address.to_string(),
            if fresh { "deployed" } else { "found" }.to_string(),
        ]);
    }

    table
}

/// Turn an incomplete or partly unsaved run into a non-zero exit.
fn check_outcome(result: &DeploymentResult, verification_saved: bool) -> Result<()> {
    if !result.all_deployed {
        anyhow::bail!(
            "Deployment incomplete, rerun to resume: {}",
            result.error.as_deref().unwrap_or("unknown error")
        );
    }
    if !result.persisted {
        anyhow::bail!("Contracts deployed but addresses were not saved, see logs above");
    }
    if !verification_saved {
        anyhow::bail!("Contracts deployed but verification details were not saved, see logs above");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize the logger.
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity)
        .init();

    let settings = Settings::load(&cli.config, cli.overrides)?;

    let connector = RpcConnector::new(
        settings.rpc_url.clone(),
        settings.deployer,
        ArtifactStore::new(&settings.artifacts),
    )?
    .confirmation_timeout(Duration::from_secs(settings.confirmation_timeout));

    let chain_slug = match settings.chain_slug {
        Some(slug) => slug,
        None => {
            let chain_id = connector
                .chain_id()
                .await
                .context("Failed to query chain id, pass --chain-slug explicitly")?;
            ChainSlug(u32::try_from(chain_id).context("Chain id does not fit a chain slug")?)
        }
    };

    let store = JsonFileStore::new(&settings.deployments);
    let seed = store
        .load(chain_slug, settings.mode)
        .await
        .context("Failed to load previously deployed addresses")?;

    tracing::info!(
        chain_slug = %chain_slug,
        mode = %settings.mode,
        rpc_url = %settings.rpc_url,
        deployer = %settings.deployer,
        owner = %settings.deploy.owner,
        known_contracts = seed.len(),
        "Loading deployment..."
    );

    let switchboards = ConfiguredSwitchboards::from_config(&settings.deploy);
    let deployer = SocketDeployer::new(connector, switchboards, store, settings.deploy);

    let result = deployer.deploy(chain_slug, settings.mode, seed).await;

    println!("{}", summary_table(&result));

    let verification = deployer
        .store()
        .save_verification(&result.verification_details, chain_slug, settings.mode)
        .await;
    if let Err(e) = &verification {
        tracing::error!(error = ?e, "Failed to save verification details");
    }

    check_outcome(&result, verification.is_ok())?;

    tracing::info!("✓ Deployment complete!");

    Ok(())
}
