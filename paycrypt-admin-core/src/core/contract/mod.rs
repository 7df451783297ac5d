//! Payment contract access
//!
//! Reads go straight to the chain's RPC endpoint. Writes are encoded here and
//! handed to the operator's wallet for signing and broadcast.

pub mod abi;
pub mod calls;
pub mod decoder;

pub use abi::*;
pub use calls::*;
pub use decoder::*;

use crate::domain::entities::{ChainDescriptor, TokenDetails, TokenInfo};
use crate::domain::repositories::WalletProvider;
use crate::shared::error::AdminError;
use crate::shared::utils::format_token_amount;
use ethers::contract::Contract;
use ethers::providers::{Http, Provider};
use ethers::types::{Address, TransactionRequest, TxHash, U256};
use futures::future::join_all;
use std::sync::Arc;

/// The payment contract on one chain.
#[derive(Clone)]
pub struct PaycryptContract {
    address: Address,
    chain_id: u64,
    provider: Arc<Provider<Http>>,
    contract: Contract<Provider<Http>>,
}

impl PaycryptContract {
    pub fn new(address: Address, chain_id: u64, provider: Arc<Provider<Http>>) -> Result<Self, AdminError> {
        let contract = Contract::new(address, paycrypt_abi()?, provider.clone());
        Ok(Self {
            address,
            chain_id,
            provider,
            contract,
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn abi(&self) -> &ethers::abi::Abi {
        self.contract.abi()
    }

    pub fn inspector(&self) -> TransactionInspector {
        TransactionInspector::new(self.provider.clone(), self.abi().clone(), self.address)
    }

    pub async fn is_admin(&self, account: Address) -> Result<bool, AdminError> {
        Ok(self.contract.method::<_, bool>("isAdmin", account)?.call().await?)
    }

    pub async fn is_paused(&self) -> Result<bool, AdminError> {
        Ok(self.contract.method::<_, bool>("paused", ())?.call().await?)
    }

    pub async fn is_blacklisted(&self, account: Address) -> Result<bool, AdminError> {
        Ok(self.contract.method::<_, bool>("isBlacklisted", account)?.call().await?)
    }

    pub async fn token_balance(&self, token: Address) -> Result<U256, AdminError> {
        Ok(self.contract.method::<_, U256>("getBalance", token)?.call().await?)
    }

    pub async fn token_volume(&self, token: Address) -> Result<U256, AdminError> {
        Ok(self.contract.method::<_, U256>("getTotalVolume", token)?.call().await?)
    }

    pub async fn supported_token_addresses(&self) -> Result<Vec<Address>, AdminError> {
        Ok(self
            .contract
            .method::<_, Vec<Address>>("getSupportedTokens", ())?
            .call()
            .await?)
    }

    pub async fn token_details(&self, token: Address) -> Result<TokenDetails, AdminError> {
        let (is_supported, is_enabled, order_limit, total_volume, symbol, decimals): (
            bool,
            bool,
            U256,
            U256,
            String,
            u8,
        ) = self.contract.method("getTokenDetails", token)?.call().await?;

        Ok(TokenDetails {
            address: token,
            symbol,
            decimals,
            is_supported,
            is_enabled,
            order_limit,
            total_volume,
        })
    }

    /// Every supported token with its details, in contract order.
    pub async fn supported_tokens(&self) -> Result<Vec<TokenDetails>, AdminError> {
        let addresses = self.supported_token_addresses().await?;
        join_all(addresses.into_iter().map(|token| self.token_details(token)))
            .await
            .into_iter()
            .collect()
    }

    /// Supported tokens with display amounts and explorer links.
    pub async fn supported_token_infos(
        &self,
        chain: &ChainDescriptor,
    ) -> Result<Vec<TokenInfo>, AdminError> {
        self.supported_tokens()
            .await?
            .into_iter()
            .map(|details| {
                Ok(TokenInfo {
                    order_limit_display: format_token_amount(details.order_limit, details.decimals)?,
                    total_volume_display: format_token_amount(details.total_volume, details.decimals)?,
                    explorer_url: chain.token_url(&format!("{:?}", details.address)),
                    details,
                })
            })
            .collect()
    }

    /// Unsigned transaction for `call`, bound to this chain.
    pub fn transaction(&self, call: &AdminCall, from: Option<Address>) -> Result<TransactionRequest, AdminError> {
        call.validate()?;
        let mut tx = TransactionRequest::new()
            .to(self.address)
            .data(call.encode(self.abi())?)
            .chain_id(self.chain_id);
        if let Some(from) = from {
            tx = tx.from(from);
        }
        Ok(tx)
    }

    /// Have the wallet sign and broadcast `call`.
    pub async fn submit(&self, call: &AdminCall, wallet: &dyn WalletProvider) -> Result<TxHash, AdminError> {
        let status = wallet.status().await?;
        if !status.connected {
            return Err(AdminError::wallet("Connect a wallet to submit transactions"));
        }
        if let Some(chain_id) = status.chain_id.filter(|id| *id != self.chain_id) {
            return Err(AdminError::wallet(format!(
                "Wallet is on network {} but the selected chain is {}",
                chain_id, self.chain_id
            )));
        }

        let tx = self.transaction(call, status.account)?;
        let hash = wallet.send_transaction(tx.into()).await?;
        log::info!("{} submitted on chain {}: {:?}", call.description(), self.chain_id, hash);
        Ok(hash)
    }
}
