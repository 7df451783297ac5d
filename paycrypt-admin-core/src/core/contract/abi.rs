//! Payment contract interface

use crate::shared::error::AdminError;
use ethers::abi::{parse_abi, Abi};

/// Human-readable ABI of the Paycrypt payment contract.
pub const PAYCRYPT_ABI: &[&str] = &[
    // Reads
    "function isAdmin(address account) external view returns (bool)",
    "function paused() external view returns (bool)",
    "function getSupportedTokens() external view returns (address[])",
    "function getTokenDetails(address token) external view returns (bool isSupported, bool isEnabled, uint256 orderLimit, uint256 totalVolume, string symbol, uint8 decimals)",
    "function isBlacklisted(address account) external view returns (bool)",
    "function getBalance(address token) external view returns (uint256)",
    "function getTotalVolume(address token) external view returns (uint256)",
    // Orders
    "function createOrder(address token, uint256 amount, string requestId) external returns (bytes32)",
    "function markOrderSuccessful(bytes32 orderId) external",
    "function markOrderFailed(bytes32 orderId, string reason) external",
    // Administration
    "function addAdmin(address account) external",
    "function removeAdmin(address account) external",
    "function pause() external",
    "function unpause() external",
    "function emergencyWithdrawToken(address token, uint256 amount) external",
    "function addSupportedToken(address token, uint256 orderLimit) external",
    "function updateOrderLimit(address token, uint256 newLimit) external",
    "function setTokenStatus(address token, bool enabled) external",
    "function addToBlacklist(address account) external",
    "function removeFromBlacklist(address account) external",
    // Events
    "event OrderCreated(bytes32 indexed orderId, address indexed user, address indexed token, uint256 amount, string requestId)",
    "event OrderSuccessful(bytes32 indexed orderId, address indexed user, uint256 amount)",
    "event OrderFailed(bytes32 indexed orderId, address indexed user, string reason)",
];

pub fn paycrypt_abi() -> Result<Abi, AdminError> {
    parse_abi(PAYCRYPT_ABI).map_err(|e| AdminError::config(format!("Invalid contract ABI: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abi_parses() {
        let abi = paycrypt_abi().unwrap();
        assert!(abi.function("getTokenDetails").is_ok());
        assert!(abi.function("emergencyWithdrawToken").is_ok());
        assert_eq!(abi.events().count(), 3);
        assert_eq!(abi.event("OrderCreated").unwrap().inputs.len(), 5);
    }
}
