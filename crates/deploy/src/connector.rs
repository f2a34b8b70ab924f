//! The seam between the orchestrator and the chain it deploys to.

use std::future::Future;

use alloy_core::primitives::Address;
use anyhow::Result;

use crate::ConstructorArg;

/// Callable handle to a contract living at a known address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractHandle {
    pub name: String,
    pub address: Address,
}

/// Submits contract creations and attaches to existing contracts.
///
/// Implementations own the signer and the network connection. They are
/// responsible for waiting on confirmation; the orchestrator adds no timeout
/// of its own.
pub trait ChainConnector: Send + Sync {
    /// Deploy `name` with `args`, returning the address once the creation is
    /// confirmed.
    fn deploy_new(
        &self,
        name: &str,
        source_path: &str,
        args: &[ConstructorArg],
    ) -> impl Future<Output = Result<Address>> + Send;

    /// Produce a handle to `name` already deployed at `address`.
    fn attach(&self, name: &str, address: Address)
    -> impl Future<Output = Result<ContractHandle>> + Send;
}
