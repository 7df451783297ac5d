//! Wallet implementations
//!
//! `RpcWallet` drives an external wallet through its EIP-1193 JSON-RPC
//! bridge; `NoWallet` stands in when none is configured.

use crate::domain::repositories::WalletProvider;
use crate::shared::error::AdminError;
use crate::shared::types::WalletStatus;
use async_trait::async_trait;
use ethers::providers::{Http, Middleware, Provider};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::TxHash;
use serde_json::json;

/// External wallet reached over JSON-RPC.
pub struct RpcWallet {
    provider: Provider<Http>,
    url: String,
}

impl RpcWallet {
    pub fn connect(url: &str) -> Result<Self, AdminError> {
        let provider = Provider::<Http>::try_from(url)
            .map_err(|e| AdminError::config(format!("Invalid wallet RPC URL '{}': {}", url, e)))?;
        Ok(Self {
            provider,
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl WalletProvider for RpcWallet {
    async fn status(&self) -> Result<WalletStatus, AdminError> {
        let accounts = self.provider.get_accounts().await?;
        let Some(account) = accounts.first().copied() else {
            return Ok(WalletStatus::disconnected());
        };
        let chain_id = self.provider.get_chainid().await?;
        Ok(WalletStatus::connected(chain_id.low_u64(), Some(account)))
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), AdminError> {
        let params = [json!({ "chainId": format!("0x{:x}", chain_id) })];
        self.provider
            .request::<_, serde_json::Value>("wallet_switchEthereumChain", params)
            .await?;
        log::debug!("Wallet at {} switched to chain {}", self.url, chain_id);
        Ok(())
    }

    async fn send_transaction(&self, tx: TypedTransaction) -> Result<TxHash, AdminError> {
        let pending = self.provider.send_transaction(tx, None).await?;
        Ok(pending.tx_hash())
    }
}

/// Provider used when no wallet is configured; never connected.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoWallet;

impl NoWallet {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WalletProvider for NoWallet {
    async fn status(&self) -> Result<WalletStatus, AdminError> {
        Ok(WalletStatus::disconnected())
    }

    async fn switch_chain(&self, _chain_id: u64) -> Result<(), AdminError> {
        Err(AdminError::wallet("No wallet connected"))
    }

    async fn send_transaction(&self, _tx: TypedTransaction) -> Result<TxHash, AdminError> {
        Err(AdminError::wallet("No wallet connected"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::error::USER_REJECTED_CODE;
    use crate::shared::test_http::serve_json_rpc;
    use serde_json::Value;

    async fn wallet_declining_switches() -> RpcWallet {
        let url = serve_json_rpc(|method, _params| match method {
            "eth_accounts" => Ok(json!(["0x00000000000000000000000000000000000000aa"])),
            "eth_chainId" => Ok(json!("0x2105")),
            "wallet_switchEthereumChain" => Err((USER_REJECTED_CODE, "User rejected the request.".to_string())),
            other => Err((-32601, format!("Method {} not found", other))),
        })
        .await;
        RpcWallet::connect(&url).unwrap()
    }

    #[test]
    fn test_rpc_wallet_rejects_bad_url() {
        assert!(matches!(RpcWallet::connect("not a url"), Err(AdminError::Config(_))));
        assert!(RpcWallet::connect("http://127.0.0.1:1248").is_ok());
    }

    #[tokio::test]
    async fn test_rpc_wallet_reports_status() {
        let wallet = wallet_declining_switches().await;
        let status = wallet.status().await.unwrap();
        assert!(status.connected);
        assert_eq!(status.chain_id, Some(8453));
    }

    #[tokio::test]
    async fn test_rpc_wallet_maps_declined_switch_to_rejection() {
        let wallet = wallet_declining_switches().await;
        let err = wallet.switch_chain(42220).await.unwrap_err();
        assert!(matches!(err, AdminError::WalletRejected(ref message) if message == "User rejected the request."));
        assert!(err.is_user_rejection());
    }

    #[tokio::test]
    async fn test_rpc_wallet_other_errors_are_not_rejections() {
        let url = serve_json_rpc(|_, params: &Value| {
            assert_eq!(params[0]["chainId"], "0xa4ec");
            Err((4902, "Unrecognized chain ID".to_string()))
        })
        .await;
        let wallet = RpcWallet::connect(&url).unwrap();

        let err = wallet.switch_chain(42220).await.unwrap_err();
        assert!(!err.is_user_rejection());
        assert!(matches!(err, AdminError::Network(ref message) if message.contains("4902")));
    }

    #[test]
    fn test_no_wallet_is_disconnected() {
        let wallet = NoWallet::new();
        let status = tokio_test::block_on(wallet.status()).unwrap();
        assert!(!status.connected);
        tokio_test::assert_err!(tokio_test::block_on(wallet.switch_chain(8453)));
    }
}
