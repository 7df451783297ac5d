//! Transaction decoding and order correlation
//!
//! Turns a transaction hash into the order it belongs to: calldata is decoded
//! first, emitted events second. Anything that fails to decode is treated as
//! absent.

use crate::domain::entities::Order;
use crate::shared::error::AdminError;
use ethers::abi::{Abi, RawLog, Token};
use ethers::providers::{Http, Middleware, Provider};
use ethers::types::{Address, Log, TxHash, H256};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedParam {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedCall {
    pub function: String,
    pub params: Vec<DecodedParam>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedEvent {
    pub event: String,
    pub params: Vec<DecodedParam>,
}

fn param<'a>(params: &'a [DecodedParam], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|p| p.name == name)
        .map(|p| p.value.as_str())
        .filter(|v| !v.is_empty())
}

impl DecodedCall {
    pub fn param(&self, name: &str) -> Option<&str> {
        param(&self.params, name)
    }
}

impl DecodedEvent {
    pub fn param(&self, name: &str) -> Option<&str> {
        param(&self.params, name)
    }
}

/// Display form of a decoded ABI value.
pub fn format_token(token: &Token) -> String {
    match token {
        Token::Address(address) => format!("{:?}", address),
        Token::FixedBytes(bytes) | Token::Bytes(bytes) => format!("0x{}", hex::encode(bytes)),
        Token::Int(value) | Token::Uint(value) => value.to_string(),
        Token::Bool(value) => value.to_string(),
        Token::String(value) => value.clone(),
        Token::FixedArray(items) | Token::Array(items) | Token::Tuple(items) => format!(
            "[{}]",
            items.iter().map(format_token).collect::<Vec<_>>().join(", ")
        ),
    }
}

/// Decode calldata against `abi`, matching on the 4-byte selector.
pub fn decode_function_data(abi: &Abi, input: &[u8]) -> Result<DecodedCall, AdminError> {
    if input.len() < 4 {
        return Err(AdminError::decode("Calldata shorter than a function selector"));
    }
    let (selector, data) = input.split_at(4);
    let function = abi
        .functions()
        .find(|f| f.short_signature() == selector)
        .ok_or_else(|| {
            AdminError::decode(format!("Unknown function selector 0x{}", hex::encode(selector)))
        })?;

    let tokens = function.decode_input(data)?;
    let params = function
        .inputs
        .iter()
        .zip(tokens.iter())
        .map(|(input, token)| DecodedParam {
            name: input.name.clone(),
            value: format_token(token),
        })
        .collect();

    Ok(DecodedCall {
        function: function.name.clone(),
        params,
    })
}

/// Decode a receipt log against `abi`, matching on topic 0.
pub fn decode_event_log(abi: &Abi, log: &Log) -> Result<DecodedEvent, AdminError> {
    let topic = log
        .topics
        .first()
        .ok_or_else(|| AdminError::decode("Log has no topics"))?;
    let event = abi
        .events()
        .find(|e| e.signature() == *topic)
        .ok_or_else(|| AdminError::decode(format!("Unknown event topic {:?}", topic)))?;

    let parsed = event.parse_log(RawLog {
        topics: log.topics.clone(),
        data: log.data.to_vec(),
    })?;

    Ok(DecodedEvent {
        event: event.name.clone(),
        params: parsed
            .params
            .into_iter()
            .map(|p| DecodedParam {
                name: p.name,
                value: format_token(&p.value),
            })
            .collect(),
    })
}

/// Everything learned about one transaction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInsight {
    pub tx_hash: TxHash,
    pub from: Address,
    pub to: Option<Address>,
    pub block_number: Option<u64>,
    /// Receipt status: 1 success, 0 reverted, `None` while pending.
    pub status: Option<u64>,
    pub call: Option<DecodedCall>,
    pub events: Vec<DecodedEvent>,
}

impl TransactionInsight {
    /// Request id from calldata, falling back to emitted events.
    pub fn request_id(&self) -> Option<&str> {
        self.call
            .as_ref()
            .and_then(|c| c.param("requestId"))
            .or_else(|| self.events.iter().find_map(|e| e.param("requestId")))
    }

    /// On-chain order id from calldata, falling back to emitted events.
    pub fn order_id(&self) -> Option<&str> {
        self.call
            .as_ref()
            .and_then(|c| c.param("orderId"))
            .or_else(|| self.events.iter().find_map(|e| e.param("orderId")))
    }
}

/// Fetches and decodes transactions sent to one payment contract.
#[derive(Clone)]
pub struct TransactionInspector {
    provider: Arc<Provider<Http>>,
    abi: Abi,
    contract: Address,
}

impl TransactionInspector {
    pub fn new(provider: Arc<Provider<Http>>, abi: Abi, contract: Address) -> Self {
        Self { provider, abi, contract }
    }

    pub async fn inspect(&self, tx_hash: TxHash) -> Result<TransactionInsight, AdminError> {
        let tx = self
            .provider
            .get_transaction(tx_hash)
            .await?
            .ok_or_else(|| AdminError::not_found(format!("Transaction {:?} not found", tx_hash)))?;
        let receipt = self.provider.get_transaction_receipt(tx_hash).await?;

        let call = if tx.to == Some(self.contract) {
            match decode_function_data(&self.abi, &tx.input) {
                Ok(call) => Some(call),
                Err(e) => {
                    log::debug!("Calldata of {:?} not decodable: {}", tx_hash, e);
                    None
                }
            }
        } else {
            log::debug!("Transaction {:?} was not sent to the payment contract", tx_hash);
            None
        };

        let mut status = None;
        let mut events = Vec::new();
        if let Some(receipt) = receipt {
            status = receipt.status.map(|s| s.as_u64());
            events = self.decode_logs(&receipt.logs);
        }

        Ok(TransactionInsight {
            tx_hash,
            from: tx.from,
            to: tx.to,
            block_number: tx.block_number.map(|n| n.as_u64()),
            status,
            call,
            events,
        })
    }

    fn decode_logs(&self, logs: &[Log]) -> Vec<DecodedEvent> {
        logs.iter()
            .filter(|entry| entry.address == self.contract)
            .filter_map(|entry| match decode_event_log(&self.abi, entry) {
                Ok(event) => Some(event),
                Err(e) => {
                    log::debug!("Skipping undecodable log: {}", e);
                    None
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchedBy {
    RequestId,
    OrderId,
    TxHash,
}

#[derive(Debug, Clone, Copy)]
pub struct Correlation<'a> {
    pub order: &'a Order,
    pub matched_by: MatchedBy,
}

fn same_hex(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Find the backend order a transaction belongs to: by request id, then by
/// on-chain order id, then by transaction hash.
pub fn correlate<'a>(insight: &TransactionInsight, orders: &'a [Order]) -> Option<Correlation<'a>> {
    if let Some(request_id) = insight.request_id() {
        let found = orders
            .iter()
            .find(|o| o.request_id.as_deref().map(str::trim) == Some(request_id.trim()));
        if let Some(order) = found {
            return Some(Correlation { order, matched_by: MatchedBy::RequestId });
        }
        log::debug!("No order with request id '{}'", request_id);
    }

    if let Some(order_id) = insight.order_id() {
        let found = orders
            .iter()
            .find(|o| o.order_id.as_deref().is_some_and(|id| same_hex(id, order_id)));
        if let Some(order) = found {
            return Some(Correlation { order, matched_by: MatchedBy::OrderId });
        }
    }

    let tx_hash = format!("{:?}", insight.tx_hash);
    orders
        .iter()
        .find(|o| o.tx_hash.as_deref().is_some_and(|h| same_hex(h, &tx_hash)))
        .map(|order| Correlation { order, matched_by: MatchedBy::TxHash })
}

/// `0x`-prefixed 32-byte hash from user input.
pub fn parse_tx_hash(value: &str) -> Result<TxHash, AdminError> {
    let bytes = hex::decode(value.trim().trim_start_matches("0x"))?;
    if bytes.len() != 32 {
        return Err(AdminError::validation("Transaction hash must be 32 bytes"));
    }
    Ok(H256::from_slice(&bytes))
}
