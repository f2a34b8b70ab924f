//! [`ChainConnector`] backed by a JSON-RPC node that manages the deployer key.

use std::time::Duration;

use alloy_core::primitives::{Address, B256};
use anyhow::Context;
use serde::Deserialize;
use url::Url;

use crate::{
    ArtifactStore, ChainConnector, ConstructorArg, ContractHandle,
    args::encode_constructor_args,
    rpc::{create_client, json_rpc_call, poll_until},
};

/// Default time to wait for a creation transaction to be mined.
pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Interval between receipt polls.
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionReceipt {
    transaction_hash: B256,
    status: Option<String>,
    contract_address: Option<Address>,
}

/// Deploys through `eth_sendTransaction`.
///
/// The node signs and estimates gas for `from`, so this only works against
/// nodes holding that account (Anvil, Hardhat, a local Geth with an unlocked
/// key, or a signing proxy).
#[derive(Debug, Clone)]
pub struct RpcConnector {
    client: reqwest::Client,
    rpc_url: Url,
    from: Address,
    artifacts: ArtifactStore,
    confirmation_timeout: Duration,
}

impl RpcConnector {
    pub fn new(rpc_url: Url, from: Address, artifacts: ArtifactStore) -> anyhow::Result<Self> {
        Ok(Self {
            client: create_client()?,
            rpc_url,
            from,
            artifacts,
            confirmation_timeout: DEFAULT_CONFIRMATION_TIMEOUT,
        })
    }

    pub fn confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout = timeout;
        self
    }

    /// Chain id reported by the node.
    pub async fn chain_id(&self) -> anyhow::Result<u64> {
        let hex_id: String =
            json_rpc_call(&self.client, self.rpc_url.as_str(), "eth_chainId", vec![]).await?;
        u64::from_str_radix(hex_id.trim_start_matches("0x"), 16)
            .with_context(|| format!("Invalid chain id from node: {}", hex_id))
    }

    async fn wait_for_receipt(&self, name: &str, tx_hash: B256) -> anyhow::Result<TransactionReceipt> {
        poll_until(
            &format!("{} creation receipt {}", name, tx_hash),
            self.confirmation_timeout,
            RECEIPT_POLL_INTERVAL,
            || {
                json_rpc_call::<Option<TransactionReceipt>>(
                    &self.client,
                    self.rpc_url.as_str(),
                    "eth_getTransactionReceipt",
                    vec![serde_json::json!(tx_hash)],
                )
            },
        )
        .await
    }
}

impl ChainConnector for RpcConnector {
    async fn deploy_new(
        &self,
        name: &str,
        source_path: &str,
        args: &[ConstructorArg],
    ) -> anyhow::Result<Address> {
        let mut data = self.artifacts.bytecode(name, source_path).await?;
        data.extend(encode_constructor_args(args));

        let tx_hash: B256 = json_rpc_call(
            &self.client,
            self.rpc_url.as_str(),
            "eth_sendTransaction",
            vec![serde_json::json!({
                "from": self.from,
                "data": format!("0x{}", hex::encode(&data)),
            })],
        )
        .await
        .with_context(|| format!("Failed to submit creation of {}", name))?;

        tracing::debug!(contract = %name, tx_hash = %tx_hash, "Creation transaction submitted");

        let receipt = self.wait_for_receipt(name, tx_hash).await?;

        if receipt.status.as_deref() == Some("0x0") {
            anyhow::bail!("Creation of {} reverted in {}", name, receipt.transaction_hash);
        }

        receipt.contract_address.with_context(|| {
            format!(
                "Receipt {} for {} has no contract address",
                receipt.transaction_hash, name
            )
        })
    }

    async fn attach(&self, name: &str, address: Address) -> anyhow::Result<ContractHandle> {
        let code: String = json_rpc_call(
            &self.client,
            self.rpc_url.as_str(),
            "eth_getCode",
            vec![serde_json::json!(address), serde_json::json!("latest")],
        )
        .await
        .with_context(|| format!("Failed to fetch code of {} at {}", name, address))?;

        if code.trim_start_matches("0x").is_empty() {
            anyhow::bail!("No contract code at {} for {}", address, name);
        }

        Ok(ContractHandle {
            name: name.to_string(),
            address,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_parses_node_shape() {
        let receipt: TransactionReceipt = serde_json::from_value(serde_json::json!({
            "transactionHash": "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b",
            "status": "0x1",
            "contractAddress": "0x5fbdb2315678afecb367f032d93f642f64180aa3",
            "blockNumber": "0x1",
            "logs": []
        }))
        .unwrap();

        assert_eq!(receipt.status.as_deref(), Some("0x1"));
        assert!(receipt.contract_address.is_some());
    }

    #[test]
    fn test_receipt_without_contract_address() {
        let receipt: TransactionReceipt = serde_json::from_value(serde_json::json!({
            "transactionHash": "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b",
            "status": "0x0",
            "contractAddress": null
        }))
        .unwrap();

        assert!(receipt.contract_address.is_none());
    }
}
