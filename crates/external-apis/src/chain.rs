// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! JSON-RPC chain client
//!
//! The client only exists in a useful form when an RPC URL is configured. It has
//! no fallback: when the node cannot be reached the error reaches the caller.
//! Every RPC call carries the same deadline as the HTTP fetcher.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use alloy_primitives::{Address, B256, U64, U256};
use api_client::{ApiClient, DEFAULT_FETCH_DEADLINE, FetchError, HealthStatus, UnavailableReason};
use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use shared_types::Network;
use tokio::time::timeout;
use tracing::{debug, warn};
use url::Url;
use utoipa::ToSchema;

/// Service name used in logs and health output
pub const CHAIN_SERVICE: &str = "chain";

const JSONRPC_VERSION: &str = "2.0";
const GET_TRANSACTION: &str = "eth_getTransactionByHash";
const GET_RECEIPT: &str = "eth_getTransactionReceipt";

/// Chain client configuration
#[derive(Debug, Clone)]
pub struct ChainConfig {
    /// JSON-RPC endpoint; the client is unavailable without one
    pub rpc_url: Option<Url>,
    /// Block explorer base, e.g. `https://etherscan.io`
    pub block_explorer_url: Option<Url>,
    /// Configured network
    pub network: Network,
    /// Per-call deadline
    pub deadline: Duration,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: None,
            block_explorer_url: None,
            network: Network::default(),
            deadline: DEFAULT_FETCH_DEADLINE,
        }
    }
}

/// Outcome of a mined transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    /// Receipt status is 1
    Success,
    /// Receipt status is 0, or no receipt yet
    Failed,
}

/// A transaction as read from the node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChainTransaction {
    /// Transaction hash
    #[schema(value_type = String)]
    pub hash: B256,
    /// Sender
    #[schema(value_type = String)]
    pub from: Address,
    /// Recipient; `None` for contract creation
    #[schema(value_type = Option<String>)]
    pub to: Option<Address>,
    /// Transferred value in wei
    #[schema(value_type = String)]
    pub value: U256,
    /// Including block, `None` while pending
    pub block_number: Option<u64>,
    /// Gas consumed, from the receipt
    pub gas_used: Option<u64>,
    /// Created contract, from the receipt
    #[schema(value_type = Option<String>)]
    pub contract_address: Option<Address>,
    /// Derived from the receipt status
    pub status: TxStatus,
    /// Explorer link, when configured
    pub explorer_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcTransaction {
    hash: B256,
    from: Address,
    to: Option<Address>,
    value: U256,
    block_number: Option<U64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcReceipt {
    status: Option<U64>,
    gas_used: Option<U64>,
    contract_address: Option<Address>,
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: [B256; 1],
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug)]
struct RpcProvider {
    client: Client,
    url: Url,
    deadline: Duration,
    next_id: AtomicU64,
}

impl RpcProvider {
    async fn call<T: DeserializeOwned>(&self, method: &str, hash: B256) -> Result<Option<T>, FetchError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(method, id, %hash, "sending JSON-RPC request");

        let request = self.client.post(self.url.clone()).json(&RpcRequest {
            jsonrpc: JSONRPC_VERSION,
            id,
            method,
            params: [hash],
        });
        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, body))
        };

        let (status, body) = timeout(self.deadline, exchange)
            .await
            .map_err(|_| FetchError::Unavailable {
                endpoint: method.to_string(),
                reason: UnavailableReason::Timeout(self.deadline),
            })?
            .map_err(|e| FetchError::Unavailable {
                endpoint: method.to_string(),
                reason: UnavailableReason::Transport(e.to_string()),
            })?;

        if !status.is_success() {
            return Err(FetchError::RequestFailed {
                endpoint: method.to_string(),
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("Unknown Status").to_string(),
            });
        }

        let response: RpcResponse<T> =
            serde_json::from_slice(&body).map_err(|e| FetchError::ParseFailure {
                endpoint: method.to_string(),
                message: e.to_string(),
            })?;

        if let Some(error) = response.error {
            warn!(method, code = error.code, message = %error.message, "JSON-RPC error");
            return Err(FetchError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        Ok(response.result)
    }
}

/// Optional JSON-RPC accessor
#[derive(Debug)]
pub struct ChainClient {
    provider: Option<RpcProvider>,
    block_explorer_url: Option<Url>,
    network: Network,
}

impl ChainClient {
    /// Create a chain client; without an RPC URL it is created unavailable
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn new(config: ChainConfig) -> Result<Self, FetchError> {
        let provider = match config.rpc_url {
            Some(url) => {
                let client = Client::builder()
                    .user_agent("carbon-explorer/0.1.0")
                    .build()
                    .map_err(|e| FetchError::InvalidRequest {
                        message: format!("failed to build RPC client: {e}"),
                    })?;
                debug!(%url, network = %config.network, "created chain client");
                Some(RpcProvider {
                    client,
                    url,
                    deadline: config.deadline,
                    next_id: AtomicU64::new(1),
                })
            }
            None => {
                debug!("no RPC URL configured, chain client unavailable");
                None
            }
        };

        Ok(Self {
            provider,
            block_explorer_url: config.block_explorer_url,
            network: config.network,
        })
    }

    /// A client with no provider
    pub fn unavailable(network: Network) -> Self {
        Self {
            provider: None,
            block_explorer_url: None,
            network,
        }
    }

    /// Whether a provider is configured; does not contact the node
    pub fn is_available(&self) -> bool {
        self.provider.is_some()
    }

    /// Configured network
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Look up a transaction and its receipt
    ///
    /// Returns `Ok(None)` if the node does not know the transaction.
    ///
    /// # Errors
    ///
    /// - [`FetchError::ProviderNotConfigured`] without an RPC URL
    /// - [`FetchError::Unavailable`] when the node does not answer in time
    /// - [`FetchError::Rpc`] when the node returns an error object
    pub async fn get_transaction(&self, hash: B256) -> Result<Option<ChainTransaction>, FetchError> {
        let provider = self
            .provider
            .as_ref()
            .ok_or(FetchError::ProviderNotConfigured)?;

        let (tx, receipt) = tokio::try_join!(
            provider.call::<RpcTransaction>(GET_TRANSACTION, hash),
            provider.call::<RpcReceipt>(GET_RECEIPT, hash),
        )?;

        let Some(tx) = tx else {
            debug!(%hash, "transaction not found on chain");
            return Ok(None);
        };

        let status = if receipt
            .as_ref()
            .and_then(|r| r.status)
            .is_some_and(|s| s == U64::from(1))
        {
            TxStatus::Success
        } else {
            TxStatus::Failed
        };

        Ok(Some(ChainTransaction {
            hash: tx.hash,
            from: tx.from,
            to: tx.to,
            value: tx.value,
            block_number: tx.block_number.map(|n| n.to::<u64>()),
            gas_used: receipt.as_ref().and_then(|r| r.gas_used).map(|g| g.to::<u64>()),
            contract_address: receipt.and_then(|r| r.contract_address),
            status,
            explorer_url: self.get_block_explorer_url(&format!("{:#x}", tx.hash)),
        }))
    }

    /// `<explorer>/tx/<hash>`
    ///
    /// `None` when no explorer is configured, or when the chain itself is
    /// unavailable, since the link would point at data this client cannot read.
    pub fn get_block_explorer_url(&self, tx_hash: &str) -> Option<String> {
        if !self.is_available() {
            return None;
        }
        let base = self.block_explorer_url.as_ref()?;
        Some(format!(
            "{}/tx/{tx_hash}",
            base.as_str().trim_end_matches('/')
        ))
    }
}

impl ApiClient for ChainClient {
    async fn health_check(&self) -> Result<HealthStatus, FetchError> {
        if self.is_available() {
            Ok(HealthStatus::Up)
        } else {
            Ok(HealthStatus::Down {
                reason: FetchError::ProviderNotConfigured.to_string(),
            })
        }
    }

    fn name(&self) -> &'static str {
        CHAIN_SERVICE
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_partial_json, method},
    };

    use super::*;

    const TX_HASH: &str = "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b";

    fn hash() -> B256 {
        TX_HASH.parse().unwrap()
    }

    fn client_for(rpc: &str, explorer: Option<&str>) -> ChainClient {
        ChainClient::new(ChainConfig {
            rpc_url: Some(Url::parse(rpc).unwrap()),
            block_explorer_url: explorer.map(|e| Url::parse(e).unwrap()),
            network: Network::new("11155111"),
            deadline: Duration::from_millis(200),
        })
        .unwrap()
    }

    async fn mount_rpc(server: &MockServer, rpc_method: &str, result: serde_json::Value) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": rpc_method})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": result
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn unconfigured_client() {
        let client = ChainClient::new(ChainConfig::default()).unwrap();
        assert!(!client.is_available());
        assert_eq!(client.get_block_explorer_url(TX_HASH), None);
        assert!(matches!(
            client.get_transaction(hash()).await,
            Err(FetchError::ProviderNotConfigured)
        ));
        assert!(!client.health_check().await.unwrap().is_available());
    }

    #[test]
    fn explorer_links() {
        let client = client_for("http://127.0.0.1:1", Some("https://sepolia.etherscan.io/"));
        assert_eq!(
            client.get_block_explorer_url("0xabc").as_deref(),
            Some("https://sepolia.etherscan.io/tx/0xabc")
        );
        let no_explorer = client_for("http://127.0.0.1:1", None);
        assert_eq!(no_explorer.get_block_explorer_url("0xabc"), None);
    }

    #[tokio::test]
    async fn successful_transaction() {
        let server = MockServer::start().await;
        mount_rpc(
            &server,
            GET_TRANSACTION,
            json!({
                "hash": TX_HASH,
                "from": "0x1234567890123456789012345678901234567890",
                "to": "0x0987654321098765432109876543210987654321",
                "value": "0xde0b6b3a7640000",
                "blockNumber": "0xbc614e",
                "nonce": "0x1",
                "input": "0x"
            }),
        )
        .await;
        mount_rpc(
            &server,
            GET_RECEIPT,
            json!({"status": "0x1", "gasUsed": "0x5208", "contractAddress": null, "logs": []}),
        )
        .await;

        let client = client_for(&server.uri(), Some("https://sepolia.etherscan.io"));
        let tx = client.get_transaction(hash()).await.unwrap().unwrap();
        assert_eq!(tx.status, TxStatus::Success);
        assert_eq!(tx.block_number, Some(12_345_678));
        assert_eq!(tx.gas_used, Some(21_000));
        assert_eq!(tx.value, U256::from(1_000_000_000_000_000_000_u64));
        assert_eq!(
            tx.explorer_url.as_deref(),
            Some(format!("https://sepolia.etherscan.io/tx/{TX_HASH}").as_str())
        );
    }

    #[tokio::test]
    async fn reverted_transaction_is_failed() {
        let server = MockServer::start().await;
        mount_rpc(
            &server,
            GET_TRANSACTION,
            json!({
                "hash": TX_HASH,
                "from": "0x1234567890123456789012345678901234567890",
                "to": null,
                "value": "0x0",
                "blockNumber": null
            }),
        )
        .await;
        mount_rpc(&server, GET_RECEIPT, json!({"status": "0x0"})).await;

        let tx = client_for(&server.uri(), None)
            .get_transaction(hash())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(tx.status, TxStatus::Failed);
        assert_eq!(tx.explorer_url, None);
    }

    #[tokio::test]
    async fn unknown_transaction() {
        let server = MockServer::start().await;
        mount_rpc(&server, GET_TRANSACTION, serde_json::Value::Null).await;
        mount_rpc(&server, GET_RECEIPT, serde_json::Value::Null).await;

        let tx = client_for(&server.uri(), None)
            .get_transaction(hash())
            .await
            .unwrap();
        assert!(tx.is_none());
    }

    #[tokio::test]
    async fn rpc_error_object() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": {"code": -32602, "message": "invalid argument"}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server.uri(), None)
            .get_transaction(hash())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Rpc { code: -32602, .. }));
    }

    #[tokio::test]
    async fn hung_node_hits_deadline() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"jsonrpc": "2.0", "id": 1, "result": null}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let err = client_for(&server.uri(), None)
            .get_transaction(hash())
            .await
            .unwrap_err();
        assert!(err.is_unavailable());
    }
}
