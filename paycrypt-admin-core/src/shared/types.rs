use chrono::{DateTime, Utc};
use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::shared::error::AdminError;

/// Supported chains. The set is closed; anything else is unrecognized.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ChainKey {
    Base,
    Lisk,
    Celo,
}

impl ChainKey {
    pub const ALL: [ChainKey; 3] = [ChainKey::Base, ChainKey::Lisk, ChainKey::Celo];
    pub const COUNT: usize = Self::ALL.len();

    pub fn as_str(&self) -> &'static str {
        match self {
            ChainKey::Base => "base",
            ChainKey::Lisk => "lisk",
            ChainKey::Celo => "celo",
        }
    }

    /// Position in `ALL`.
    pub fn index(&self) -> usize {
        match self {
            ChainKey::Base => 0,
            ChainKey::Lisk => 1,
            ChainKey::Celo => 2,
        }
    }

    /// Lenient parse used for persisted and user-supplied values.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.as_str().eq_ignore_ascii_case(value))
    }

    /// Upper-case form used in environment variable names.
    pub fn env_prefix(&self) -> String {
        format!("PAYCRYPT_{}", self.as_str().to_ascii_uppercase())
    }
}

impl fmt::Display for ChainKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChainKey {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| AdminError::not_found(format!("Unsupported chain key '{}'", s)))
    }
}

// Notifications

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A user-facing notice (toast).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    pub id: Uuid,
    pub level: NoticeLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }
}

// Wallet

/// Snapshot of the externally-owned wallet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WalletStatus {
    pub connected: bool,
    pub chain_id: Option<u64>,
    pub account: Option<Address>,
}

impl WalletStatus {
    pub fn disconnected() -> Self {
        Self::default()
    }

    pub fn connected(chain_id: u64, account: Option<Address>) -> Self {
        Self {
            connected: true,
            chain_id: Some(chain_id),
            account,
        }
    }
}

// Query parameters

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum TimeRange {
    #[serde(rename = "24h")]
    Day,
    #[serde(rename = "7d")]
    #[default]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "1y")]
    Year,
    #[serde(rename = "all")]
    All,
}

impl TimeRange {
    pub fn as_query(&self) -> &'static str {
        match self {
            TimeRange::Day => "24h",
            TimeRange::Week => "7d",
            TimeRange::Month => "30d",
            TimeRange::Year => "1y",
            TimeRange::All => "all",
        }
    }

    /// Earliest timestamp inside the range, `None` for `All`.
    pub fn start(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let span = match self {
            TimeRange::Day => chrono::Duration::hours(24),
            TimeRange::Week => chrono::Duration::days(7),
            TimeRange::Month => chrono::Duration::days(30),
            TimeRange::Year => chrono::Duration::days(365),
            TimeRange::All => return None,
        };
        Some(now - span)
    }
}

impl FromStr for TimeRange {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "24h" | "day" => Ok(TimeRange::Day),
            "7d" | "week" => Ok(TimeRange::Week),
            "30d" | "month" => Ok(TimeRange::Month),
            "1y" | "year" => Ok(TimeRange::Year),
            "all" => Ok(TimeRange::All),
            other => Err(AdminError::validation(format!("Unknown time range '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_query(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}
