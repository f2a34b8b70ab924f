//! Failure taxonomy for a deployment run.

use alloy_core::primitives::Address;

/// Why a deployment run stopped.
///
/// Any of these halts the remaining steps. They are caught once, at the top
/// of [`crate::SocketDeployer::deploy`], and never propagate past it.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// A fresh deployment's transaction was rejected or never confirmed.
    #[error("failed to deploy {name}")]
    Transaction {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    /// Attaching to an address already recorded in the registry failed.
    #[error("failed to attach to {name} at {address}")]
    Lookup {
        name: String,
        address: Address,
        #[source]
        source: anyhow::Error,
    },

    /// The switchboard sub-deployment failed.
    #[error("switchboard deployment failed")]
    Dependency {
        #[source]
        source: anyhow::Error,
    },

    /// A step referenced a contract that has no address yet.
    #[error("{contract} requires {dependency}, which is not deployed")]
    MissingDependency {
        contract: String,
        dependency: String,
    },

    /// Attempted to record a second address for a name.
    #[error("{name} is already recorded at {existing}, refusing to overwrite with {attempted}")]
    Registry {
        name: String,
        existing: Address,
        attempted: Address,
    },
}

impl DeployError {
    /// Render the error with its full source chain on one line.
    pub fn report(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = std::error::Error::source(cause);
        }
        message
    }
}
