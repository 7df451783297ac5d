//! Utility functions for the admin core
//!
//! This module contains common utility functions used throughout the admin core.

use crate::shared::constants::ADDRESS_LENGTH;
use crate::shared::error::AdminError;
use ethers::types::{Address, U256};
use serde::{Deserialize, Deserializer};
use std::env;
use std::str::FromStr;

/// Validate Ethereum address format
pub fn validate_ethereum_address(address: &str) -> Result<(), AdminError> {
    if !address.starts_with("0x") {
        return Err(AdminError::validation("Address must start with 0x"));
    }

    if address.len() != ADDRESS_LENGTH {
        return Err(AdminError::validation("Address must be 42 characters long"));
    }

    // Check if all characters after 0x are valid hex
    if !address[2..].chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AdminError::validation("Address contains invalid hex characters"));
    }

    Ok(())
}

/// Parse an address, rejecting malformed input.
pub fn parse_address(address: &str) -> Result<Address, AdminError> {
    let address = address.trim();
    validate_ethereum_address(address)?;
    Address::from_str(address)
        .map_err(|e| AdminError::validation(format!("Invalid address '{}': {}", address, e)))
}

/// `0x1234…abcd` rendering for tables and notices.
pub fn short_address(address: &str) -> String {
    if address.len() <= 12 || !address.is_ascii() {
        return address.to_string();
    }
    format!("{}…{}", &address[..6], &address[address.len() - 4..])
}

/// Format a raw token amount with the token's decimals.
pub fn format_token_amount(amount: U256, decimals: u8) -> Result<String, AdminError> {
    ethers::utils::format_units(amount, decimals as u32)
        .map_err(|e| AdminError::validation(format!("Cannot format amount: {}", e)))
}

/// Parse a human amount ("12.5") into raw token units.
pub fn parse_token_amount(amount: &str, decimals: u8) -> Result<U256, AdminError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(AdminError::validation("Amount is required"));
    }
    ethers::utils::parse_units(amount, decimals as u32)
        .map(Into::into)
        .map_err(|e| AdminError::validation(format!("Invalid amount '{}': {}", amount, e)))
}

/// Read an environment variable, treating empty values as unset.
pub fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Read an environment variable with a fallback.
pub fn env_or(key: &str, fallback: &str) -> String {
    env_non_empty(key).unwrap_or_else(|| fallback.to_string())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

/// Backends emit amounts both as JSON numbers and as numeric strings.
pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom),
    }
}

/// Optional variant of [`deserialize_amount`]; unparsable text becomes `None`.
pub fn deserialize_optional_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumberOrString>::deserialize(deserializer)? {
        Some(NumberOrString::Number(n)) => Some(n),
        Some(NumberOrString::Text(s)) => s.trim().parse::<f64>().ok(),
        None => None,
    })
}
