//! Wallet repository
//!
//! The externally-owned wallet: network switching and transaction
//! signing/broadcast are delegated to it entirely.

use crate::shared::error::AdminError;
use crate::shared::types::WalletStatus;
use async_trait::async_trait;
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::TxHash;

/// Wallet provider trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Current connection state and network
    async fn status(&self) -> Result<WalletStatus, AdminError>;

    /// Ask the wallet to switch its active network.
    /// A user decline is reported as `AdminError::WalletRejected`.
    async fn switch_chain(&self, chain_id: u64) -> Result<(), AdminError>;

    /// Sign and broadcast a transaction, returning its hash
    async fn send_transaction(&self, tx: TypedTransaction) -> Result<TxHash, AdminError>;
}
