//! socket-deploy - Deployment library for the Socket messaging protocol.
//!
//! This crate deploys the core Socket contracts onto one chain, in a fixed
//! dependency order, skipping whatever a previous run already deployed.
//!
//! # Example
//!
//! ```no_run
//! use socket_deploy::{
//!     AddressRegistry, ArtifactStore, ChainSlug, ConfiguredSwitchboards, DeployConfig,
//!     DeploymentMode, JsonFileStore, RpcConnector, SocketDeployer,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let owner = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse()?;
//! let config = DeployConfig::new(owner);
//! let connector = RpcConnector::new(
//!     "http://localhost:8545".parse()?,
//!     owner,
//!     ArtifactStore::new("artifacts"),
//! )?;
//! let store = JsonFileStore::new("deployments");
//! let seed = store.load(ChainSlug(31337), DeploymentMode::Dev).await?;
//!
//! let deployer = SocketDeployer::new(
//!     connector,
//!     ConfiguredSwitchboards::from_config(&config),
//!     store,
//!     config,
//! );
//! let result = deployer.deploy(ChainSlug(31337), DeploymentMode::Dev, seed).await;
//! assert!(result.all_deployed);
//! # Ok(())
//! # }
//! ```

mod addresses;
mod args;
mod artifacts;
mod config;
mod connector;
mod context;
mod error;
mod orchestrator;
pub mod plan;
mod rpc;
mod rpc_connector;
mod store;
mod switchboard;
mod verification;

pub use addresses::{AddressRegistry, ChainSlug, DeploymentMode};
pub use args::{ConstructorArg, encode_constructor_args};
pub use artifacts::ArtifactStore;
pub use config::{DEFAULT_SEAL_GAS_LIMIT, DeployConfig};
pub use connector::{ChainConnector, ContractHandle};
pub use context::DeploymentContext;
pub use error::DeployError;
pub use orchestrator::{DeploymentResult, SocketDeployer};
pub use plan::{DeploymentPlan, Step, StepDescriptor};
pub use rpc_connector::{DEFAULT_CONFIRMATION_TIMEOUT, RpcConnector};
pub use store::{JsonFileStore, PersistenceStore};
pub use switchboard::{
    ArgSpec, ConfiguredSwitchboards, SwitchboardDeployer, SwitchboardFailure, SwitchboardOutput,
    SwitchboardSpec,
};
pub use verification::{VerificationEntry, VerificationLedger};
