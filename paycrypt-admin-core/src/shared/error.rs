//! Error handling for the admin core
//!
//! This module defines the error types used throughout the admin core.

use thiserror::Error;

/// JSON-RPC code an EIP-1193 wallet returns when the user declines a request.
pub const USER_REJECTED_CODE: i64 = 4001;

/// Admin core error type
#[derive(Error, Debug, Clone)]
pub enum AdminError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Contract error: {0}")]
    Contract(String),

    #[error("Request rejected in wallet: {0}")]
    WalletRejected(String),

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AdminError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Create an API error from a backend status code
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api { status, message: message.into() }
    }

    /// Create a contract error
    pub fn contract(message: impl Into<String>) -> Self {
        Self::Contract(message.into())
    }

    /// Create a wallet rejection (the user declined)
    pub fn wallet_rejected(message: impl Into<String>) -> Self {
        Self::WalletRejected(message.into())
    }

    /// Create a wallet error
    pub fn wallet(message: impl Into<String>) -> Self {
        Self::Wallet(message.into())
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// True when the user declined a wallet prompt. Such failures are
    /// informational, not alarming.
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, Self::WalletRejected(_))
    }

    /// True for backend 401/403 responses.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401 | 403, .. })
    }
}

// Standard library error conversions
impl From<std::io::Error> for AdminError {
    fn from(err: std::io::Error) -> Self {
        Self::storage(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AdminError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(format!("JSON error: {}", err))
    }
}

impl From<hex::FromHexError> for AdminError {
    fn from(err: hex::FromHexError) -> Self {
        Self::validation(format!("Hex decoding error: {}", err))
    }
}

impl From<tokio::task::JoinError> for AdminError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::internal(format!("Task join error: {}", err))
    }
}

// HTTP client error conversions
impl From<reqwest::Error> for AdminError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::api(status.as_u16(), err.to_string()),
            None if err.is_decode() => Self::decode(format!("Invalid response body: {}", err)),
            None => Self::network(format!("Request failed: {}", err)),
        }
    }
}

// Blockchain error conversions
impl From<ethers::providers::ProviderError> for AdminError {
    fn from(err: ethers::providers::ProviderError) -> Self {
        use ethers::providers::RpcError;

        match err.as_error_response() {
            Some(rpc) if rpc.code == USER_REJECTED_CODE => Self::wallet_rejected(rpc.message.clone()),
            Some(rpc) => Self::network(format!("RPC error {}: {}", rpc.code, rpc.message)),
            None => Self::network(format!("Provider error: {}", err)),
        }
    }
}

impl From<ethers::abi::Error> for AdminError {
    fn from(err: ethers::abi::Error) -> Self {
        Self::decode(format!("ABI error: {}", err))
    }
}

impl From<ethers::abi::AbiError> for AdminError {
    fn from(err: ethers::abi::AbiError) -> Self {
        Self::decode(format!("ABI error: {}", err))
    }
}

impl<M: ethers::providers::Middleware> From<ethers::contract::ContractError<M>> for AdminError {
    fn from(err: ethers::contract::ContractError<M>) -> Self {
        use ethers::contract::ContractError;

        if let Some(reason) = err.decode_revert::<String>() {
            return Self::contract(format!("Execution reverted: {}", reason));
        }
        match err {
            ContractError::ProviderError { e } => e.into(),
            other => Self::contract(other.to_string()),
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for AdminError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::internal(format!("Spreadsheet error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_error_creation() {
        let config_error = AdminError::config("Duplicate chain id");
        let validation_error = AdminError::validation("Token address is required");
        let api_error = AdminError::api(502, "Bad gateway");

        assert!(matches!(config_error, AdminError::Config(_)));
        assert!(matches!(validation_error, AdminError::Validation(_)));
        assert!(matches!(api_error, AdminError::Api { status: 502, .. }));
    }

    #[test]
    fn test_error_conversions() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let admin_error: AdminError = io_error.into();

        assert!(matches!(admin_error, AdminError::Storage(_)));
    }

    #[test]
    fn test_user_rejection_classification() {
        assert!(AdminError::wallet_rejected("User rejected the request").is_user_rejection());
        assert!(!AdminError::wallet("Unrecognized chain").is_user_rejection());
        assert!(AdminError::api(401, "jwt expired").is_unauthorized());
        assert!(!AdminError::api(500, "boom").is_unauthorized());
    }

    #[test]
    fn test_error_display() {
        let error = AdminError::api(404, "Order not found");
        let display = format!("{}", error);

        assert!(display.contains("404"));
        assert!(display.contains("Order not found"));
    }
}
