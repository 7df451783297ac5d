//! Administrative contract writes

use crate::shared::constants::ZERO_ADDRESS;
use crate::shared::error::AdminError;
use crate::shared::utils::{parse_address, parse_token_amount};
use ethers::abi::{Abi, Token};
use ethers::types::{Address, Bytes, H256, U256};
use serde::{Deserialize, Serialize};

/// One state-changing call on the payment contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum AdminCall {
    AddAdmin { account: Address },
    RemoveAdmin { account: Address },
    Pause,
    Unpause,
    EmergencyWithdrawToken { token: Address, amount: U256 },
    MarkOrderSuccessful { order_id: H256 },
    MarkOrderFailed { order_id: H256, reason: String },
    AddSupportedToken { token: Address, order_limit: U256 },
    UpdateOrderLimit { token: Address, new_limit: U256 },
    SetTokenStatus { token: Address, enabled: bool },
    AddToBlacklist { account: Address },
    RemoveFromBlacklist { account: Address },
}

/// Loosely-typed form input for an [`AdminCall`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminCallParams {
    pub account: Option<String>,
    pub token: Option<String>,
    /// Human-readable amount, scaled by `decimals`.
    pub amount: Option<String>,
    pub decimals: Option<u8>,
    pub order_id: Option<String>,
    pub reason: Option<String>,
    pub enabled: Option<bool>,
}

impl AdminCallParams {
    fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, AdminError> {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AdminError::validation(format!("{} is required", field)))
    }

    fn account(&self) -> Result<Address, AdminError> {
        parse_address(Self::required(&self.account, "Account address")?)
    }

    fn token(&self) -> Result<Address, AdminError> {
        parse_address(Self::required(&self.token, "Token address")?)
    }

    fn amount(&self) -> Result<U256, AdminError> {
        let amount = Self::required(&self.amount, "Amount")?;
        parse_token_amount(amount, self.decimals.unwrap_or(18))
    }

    fn order_id(&self) -> Result<H256, AdminError> {
        let raw = Self::required(&self.order_id, "Order id")?;
        let bytes = hex::decode(raw.trim_start_matches("0x"))?;
        if bytes.len() != 32 {
            return Err(AdminError::validation("Order id must be 32 bytes"));
        }
        Ok(H256::from_slice(&bytes))
    }

    fn reason(&self) -> Result<String, AdminError> {
        Ok(Self::required(&self.reason, "Reason")?.to_string())
    }
}

impl AdminCall {
    /// Build a call from its contract function name and form input.
    pub fn build(action: &str, params: &AdminCallParams) -> Result<Self, AdminError> {
        let call = match action {
            "addAdmin" => Self::AddAdmin { account: params.account()? },
            "removeAdmin" => Self::RemoveAdmin { account: params.account()? },
            "pause" => Self::Pause,
            "unpause" => Self::Unpause,
            "emergencyWithdrawToken" => Self::EmergencyWithdrawToken {
                token: params.token()?,
                amount: params.amount()?,
            },
            "markOrderSuccessful" => Self::MarkOrderSuccessful { order_id: params.order_id()? },
            "markOrderFailed" => Self::MarkOrderFailed {
                order_id: params.order_id()?,
                reason: params.reason()?,
            },
            "addSupportedToken" => Self::AddSupportedToken {
                token: params.token()?,
                order_limit: params.amount()?,
            },
            "updateOrderLimit" => Self::UpdateOrderLimit {
                token: params.token()?,
                new_limit: params.amount()?,
            },
            "setTokenStatus" => Self::SetTokenStatus {
                token: params.token()?,
                enabled: params
                    .enabled
                    .ok_or_else(|| AdminError::validation("Enabled flag is required"))?,
            },
            "addToBlacklist" => Self::AddToBlacklist { account: params.account()? },
            "removeFromBlacklist" => Self::RemoveFromBlacklist { account: params.account()? },
            other => return Err(AdminError::not_found(format!("Unknown admin action '{}'", other))),
        };
        call.validate()?;
        Ok(call)
    }

    pub fn function_name(&self) -> &'static str {
        match self {
            Self::AddAdmin { .. } => "addAdmin",
            Self::RemoveAdmin { .. } => "removeAdmin",
            Self::Pause => "pause",
            Self::Unpause => "unpause",
            Self::EmergencyWithdrawToken { .. } => "emergencyWithdrawToken",
            Self::MarkOrderSuccessful { .. } => "markOrderSuccessful",
            Self::MarkOrderFailed { .. } => "markOrderFailed",
            Self::AddSupportedToken { .. } => "addSupportedToken",
            Self::UpdateOrderLimit { .. } => "updateOrderLimit",
            Self::SetTokenStatus { .. } => "setTokenStatus",
            Self::AddToBlacklist { .. } => "addToBlacklist",
            Self::RemoveFromBlacklist { .. } => "removeFromBlacklist",
        }
    }

    /// Label used in notices.
    pub fn description(&self) -> String {
        match self {
            Self::AddAdmin { account } => format!("Add admin {:?}", account),
            Self::RemoveAdmin { account } => format!("Remove admin {:?}", account),
            Self::Pause => "Pause contract".to_string(),
            Self::Unpause => "Unpause contract".to_string(),
            Self::EmergencyWithdrawToken { token, .. } => format!("Emergency withdraw of {:?}", token),
            Self::MarkOrderSuccessful { order_id } => format!("Mark order {:?} successful", order_id),
            Self::MarkOrderFailed { order_id, .. } => format!("Mark order {:?} failed", order_id),
            Self::AddSupportedToken { token, .. } => format!("Add supported token {:?}", token),
            Self::UpdateOrderLimit { token, .. } => format!("Update order limit of {:?}", token),
            Self::SetTokenStatus { token, enabled } => format!(
                "{} token {:?}",
                if *enabled { "Enable" } else { "Disable" },
                token
            ),
            Self::AddToBlacklist { account } => format!("Blacklist {:?}", account),
            Self::RemoveFromBlacklist { account } => format!("Remove {:?} from blacklist", account),
        }
    }

    /// Reject calls with missing or meaningless inputs.
    pub fn validate(&self) -> Result<(), AdminError> {
        let zero = |address: &Address, field: &str| {
            if *address == Address::zero() {
                Err(AdminError::validation(format!("{} must not be {}", field, ZERO_ADDRESS)))
            } else {
                Ok(())
            }
        };

        match self {
            Self::AddAdmin { account }
            | Self::RemoveAdmin { account }
            | Self::AddToBlacklist { account }
            | Self::RemoveFromBlacklist { account } => zero(account, "Account address"),
            Self::Pause | Self::Unpause => Ok(()),
            Self::EmergencyWithdrawToken { token, amount } => {
                zero(token, "Token address")?;
                if amount.is_zero() {
                    return Err(AdminError::validation("Amount must be greater than zero"));
                }
                Ok(())
            }
            Self::MarkOrderSuccessful { order_id } => {
                if order_id.is_zero() {
                    return Err(AdminError::validation("Order id is required"));
                }
                Ok(())
            }
            Self::MarkOrderFailed { order_id, reason } => {
                if order_id.is_zero() {
                    return Err(AdminError::validation("Order id is required"));
                }
                if reason.trim().is_empty() {
                    return Err(AdminError::validation("Reason is required"));
                }
                Ok(())
            }
            Self::AddSupportedToken { token, order_limit: limit }
            | Self::UpdateOrderLimit { token, new_limit: limit } => {
                zero(token, "Token address")?;
                if limit.is_zero() {
                    return Err(AdminError::validation("Order limit must be greater than zero"));
                }
                Ok(())
            }
            Self::SetTokenStatus { token, .. } => zero(token, "Token address"),
        }
    }

    fn tokens(&self) -> Vec<Token> {
        match self {
            Self::AddAdmin { account }
            | Self::RemoveAdmin { account }
            | Self::AddToBlacklist { account }
            | Self::RemoveFromBlacklist { account } => vec![Token::Address(*account)],
            Self::Pause | Self::Unpause => vec![],
            Self::EmergencyWithdrawToken { token, amount } => {
                vec![Token::Address(*token), Token::Uint(*amount)]
            }
            Self::MarkOrderSuccessful { order_id } => {
                vec![Token::FixedBytes(order_id.as_bytes().to_vec())]
            }
            Self::MarkOrderFailed { order_id, reason } => vec![
                Token::FixedBytes(order_id.as_bytes().to_vec()),
                Token::String(reason.clone()),
            ],
            Self::AddSupportedToken { token, order_limit } => {
                vec![Token::Address(*token), Token::Uint(*order_limit)]
            }
            Self::UpdateOrderLimit { token, new_limit } => {
                vec![Token::Address(*token), Token::Uint(*new_limit)]
            }
            Self::SetTokenStatus { token, enabled } => {
                vec![Token::Address(*token), Token::Bool(*enabled)]
            }
        }
    }

    /// ABI-encoded calldata.
    pub fn encode(&self, abi: &Abi) -> Result<Bytes, AdminError> {
        let function = abi.function(self.function_name())?;
        Ok(function.encode_input(&self.tokens())?.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::contract::abi::paycrypt_abi;

    const ACCOUNT: &str = "0x1111111111111111111111111111111111111111";
    const TOKEN: &str = "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913";

    #[test]
    fn test_build_reports_missing_fields() {
        let err = AdminCall::build("addAdmin", &AdminCallParams::default()).unwrap_err();
        assert!(matches!(err, AdminError::Validation(_)));
        assert!(err.to_string().contains("Account address is required"));

        let params = AdminCallParams {
            order_id: Some(format!("0x{}", "ab".repeat(32))),
            reason: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            AdminCall::build("markOrderFailed", &params),
            Err(AdminError::Validation(_))
        ));
    }

    #[test]
    fn test_build_rejects_zero_values() {
        let params = AdminCallParams {
            account: Some(ZERO_ADDRESS.to_string()),
            ..Default::default()
        };
        assert!(matches!(
            AdminCall::build("addToBlacklist", &params),
            Err(AdminError::Validation(_))
        ));

        let params = AdminCallParams {
            token: Some(TOKEN.to_string()),
            amount: Some("0".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            AdminCall::build("updateOrderLimit", &params),
            Err(AdminError::Validation(_))
        ));
    }

    #[test]
    fn test_unknown_action() {
        assert!(matches!(
            AdminCall::build("selfDestruct", &AdminCallParams::default()),
            Err(AdminError::NotFound(_))
        ));
    }

    #[test]
    fn test_amount_uses_decimals() {
        let params = AdminCallParams {
            token: Some(TOKEN.to_string()),
            amount: Some("1000".to_string()),
            decimals: Some(6),
            ..Default::default()
        };
        let call = AdminCall::build("addSupportedToken", &params).unwrap();
        assert_eq!(
            call,
            AdminCall::AddSupportedToken {
                token: TOKEN.parse().unwrap(),
                order_limit: U256::from(1_000_000_000u64),
            }
        );
    }

    #[test]
    fn test_encode_uses_function_selector() {
        let abi = paycrypt_abi().unwrap();
        let call = AdminCall::build(
            "addAdmin",
            &AdminCallParams { account: Some(ACCOUNT.to_string()), ..Default::default() },
        )
        .unwrap();
        let data = call.encode(&abi).unwrap();
        let selector = abi.function("addAdmin").unwrap().short_signature();
        assert_eq!(&data[..4], &selector);
        assert_eq!(data.len(), 4 + 32);

        assert_eq!(AdminCall::Pause.encode(&abi).unwrap().len(), 4);
    }
}
