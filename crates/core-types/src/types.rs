// In crates/core-types/src/types.rs

use crate::{Error, Result, lenient};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// A validated Solana wallet address (base58, 32 to 44 characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WalletAddress(pub String);

impl WalletAddress {
    /// Validates and wraps a raw address string.
    pub fn parse(raw: &str) -> Result<Self> {
        let address = raw.trim();
        if address.is_empty() {
            return Err(Error::MissingAddress);
        }
        if !(32..=44).contains(&address.len()) {
            return Err(Error::InvalidAddress {
                address: address.to_string(),
                reason: format!("expected 32-44 characters, got {}", address.len()),
            });
        }
        if let Some(bad) = address.chars().find(|c| !BASE58_ALPHABET.contains(*c)) {
            return Err(Error::InvalidAddress {
                address: address.to_string(),
                reason: format!("'{}' is not a base58 character", bad),
            });
        }
        Ok(Self(address.to_string()))
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// --- Dune query rows ---

/// One row of the per-token trading query, one row per token the wallet touched.
///
/// Numeric columns are parsed leniently: anything that is not a number or a
/// numeric string becomes `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenRow {
    /// HTML anchor such as `<a href="...">BONK</a>`.
    #[serde(default, deserialize_with = "lenient::text")]
    pub token_address: Option<String>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub buy: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub sell: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub total_pnl: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub token_balance: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub initial_buy_price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub initial_buy_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub initial_buy_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub latest_price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub latest_block_time: Option<DateTime<Utc>>,
}

/// Response of queueing a query execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuneExecution {
    pub execution_id: String,
    pub state: String,
}

/// The rows and metadata of a finished execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DuneQueryResult {
    #[serde(default)]
    pub rows: Vec<TokenRow>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Polling view of a query execution. `result` appears once the query finishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionStatus {
    pub execution_id: String,
    #[serde(default)]
    pub is_execution_finished: bool,
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<DuneQueryResult>,
}

// --- Normalised on-chain activity ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    #[default]
    Success,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferDirection {
    In,
    Out,
}

/// Mint of wrapped SOL. Legs in this mint are valued as native SOL.
pub const WRAPPED_SOL_MINT: &str = "So11111111111111111111111111111111111111112";

/// A single token movement into or out of the analysed wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTransfer {
    pub mint: String,
    pub symbol: Option<String>,
    /// Token units, already scaled by the mint's decimals.
    pub amount: f64,
    pub direction: TransferDirection,
}

impl TokenTransfer {
    pub fn is_wrapped_sol(&self) -> bool {
        self.mint == WRAPPED_SOL_MINT
    }

    /// Token units signed from the wallet's point of view.
    pub fn signed_amount(&self) -> f64 {
        match self.direction {
            TransferDirection::In => self.amount.abs(),
            TransferDirection::Out => -self.amount.abs(),
        }
    }
}

/// A decoded swap event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapEvent {
    /// DEX or aggregator that routed the swap (e.g. "JUPITER").
    pub dex: String,
    pub token_in: String,
    pub token_out: String,
    pub amount_in: f64,
    pub amount_out: f64,
    /// Quoted output, when the upstream exposes it. Required for slippage.
    pub expected_amount_out: Option<f64>,
}

/// One wallet transaction, as produced by the data adapters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTransaction {
    pub signature: String,
    /// Block time in unix seconds.
    pub timestamp: i64,
    pub status: TxStatus,
    /// SOL moved by the wallet in this transaction.
    pub amount: f64,
    /// Net SOL the wallet received (positive) or sent (negative), fee excluded.
    #[serde(default)]
    pub sol_change: f64,
    /// Fee in SOL.
    pub fee: f64,
    /// Program or venue label reported by the indexer ("UNKNOWN" if none).
    pub source: String,
    /// Transaction type label ("SWAP", "TRANSFER", ...).
    pub kind: String,
    pub swap: Option<SwapEvent>,
    #[serde(default)]
    pub token_transfers: Vec<TokenTransfer>,
    #[serde(default)]
    pub programs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalance {
    pub mint: String,
    pub symbol: Option<String>,
    pub amount: f64,
    pub price_usd: Option<f64>,
}

/// Balance snapshot of a wallet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletBalance {
    /// Native balance in SOL.
    pub sol: f64,
    #[serde(default)]
    pub tokens: Vec<TokenBalance>,
}

impl WalletBalance {
    pub fn is_empty(&self) -> bool {
        self.sol == 0.0 && self.tokens.iter().all(|t| t.amount == 0.0)
    }

    /// Held amount of `mint`, zero when the wallet holds none.
    pub fn amount_of(&self, mint: &str) -> f64 {
        self.tokens
            .iter()
            .filter(|t| t.mint == mint)
            .map(|t| t.amount)
            .sum()
    }
}
