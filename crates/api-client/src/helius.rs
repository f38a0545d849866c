// In crates/api-client/src/helius.rs

use crate::retry::{read_json, RetryPolicy};
use crate::types::{HeliusBalances, HeliusTransaction, NativeAmount, TokenAmount};
use crate::{Error, Result};
use app_config::HeliusSettings;
use core_types::{
    SwapEvent, TokenBalance, TokenTransfer, TransferDirection, TxStatus, WalletTransaction,
    WRAPPED_SOL_MINT,
};
use reqwest::Client;
use tracing::debug;

const SERVICE: &str = "helius";
pub(crate) const LAMPORTS_PER_SOL: f64 = 1_000_000_000.0;
const SOL: &str = "SOL";

/// Client for the Helius parsed-transaction and balance APIs.
#[derive(Debug, Clone)]
pub struct HeliusClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    limit: u32,
    retry: RetryPolicy,
}

impl HeliusClient {
    pub fn new(http_client: Client, settings: &HeliusSettings, retry: RetryPolicy) -> Self {
        Self {
            http_client,
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            limit: settings.transaction_limit,
            retry,
        }
    }

    fn key(&self) -> Result<&str> {
        if self.api_key.is_empty() {
            return Err(Error::MissingApiKey(SERVICE));
        }
        Ok(&self.api_key)
    }

    /// Fetches the most recent parsed transactions for `address`.
    ///
    /// This corresponds to `GET /v0/addresses/{address}/transactions`.
    pub async fn get_transactions(&self, address: &str) -> Result<Vec<HeliusTransaction>> {
        let url = format!(
            "{}/v0/addresses/{}/transactions?api-key={}&limit={}",
            self.base_url,
            address,
            self.key()?,
            self.limit
        );
        let raw: Vec<HeliusTransaction> = self
            .retry
            .run("helius.transactions", || async {
                let response = self.http_client.get(&url).send().await?;
                read_json(SERVICE, response).await
            })
            .await?;
        debug!(address, count = raw.len(), "Fetched parsed transactions");
        Ok(raw)
    }

    /// Token balances held by `address`, scaled by each token's decimals.
    ///
    /// This corresponds to `GET /v0/addresses/{address}/balances`.
    pub async fn get_token_balances(&self, address: &str) -> Result<Vec<TokenBalance>> {
        let url = format!(
            "{}/v0/addresses/{}/balances?api-key={}",
            self.base_url,
            address,
            self.key()?
        );
        let raw: HeliusBalances = self
            .retry
            .run("helius.balances", || async {
                let response = self.http_client.get(&url).send().await?;
                read_json(SERVICE, response).await
            })
            .await?;
        Ok(map_token_balances(&raw))
    }
}

/// Converts a Helius parsed transaction into the wallet's view of it.
pub fn map_transaction(wallet: &str, raw: &HeliusTransaction) -> WalletTransaction {
    let status = if raw.transaction_error.as_ref().is_some_and(|e| !e.is_null()) {
        TxStatus::Failed
    } else {
        TxStatus::Success
    };

    let (mut lamports_moved, mut lamports_net) = (0u64, 0i128);
    for transfer in &raw.native_transfers {
        let incoming = transfer.to_user_account == wallet;
        let outgoing = transfer.from_user_account == wallet;
        if incoming || outgoing {
            lamports_moved += transfer.amount;
        }
        if incoming {
            lamports_net += i128::from(transfer.amount);
        }
        if outgoing {
            lamports_net -= i128::from(transfer.amount);
        }
    }

    let token_transfers = raw
        .token_transfers
        .iter()
        .filter_map(|t| {
            let direction = if t.to_user_account == wallet {
                TransferDirection::In
            } else if t.from_user_account == wallet {
                TransferDirection::Out
            } else {
                return None;
            };
            Some(TokenTransfer {
                mint: t.mint.clone(),
                symbol: (t.mint == WRAPPED_SOL_MINT).then(|| SOL.to_string()),
                amount: t.token_amount,
                direction,
            })
        })
        .collect();

    let mut programs: Vec<String> = Vec::new();
    for ix in &raw.instructions {
        if !ix.program_id.is_empty() && !programs.contains(&ix.program_id) {
            programs.push(ix.program_id.clone());
        }
    }

    let swap = raw.events.swap.as_ref().and_then(|event| {
        let (token_in, amount_in) = leg(event.native_input.as_ref(), &event.token_inputs)?;
        let (token_out, amount_out) = leg(event.native_output.as_ref(), &event.token_outputs)?;
        let dex = event
            .inner_swaps
            .iter()
            .find_map(|s| s.program_info.as_ref().map(|p| p.source.clone()))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| raw.source.clone());
        Some(SwapEvent {
            dex,
            token_in,
            token_out,
            amount_in,
            amount_out,
            expected_amount_out: None,
        })
    });

    WalletTransaction {
        signature: raw.signature.clone(),
        timestamp: raw.timestamp,
        status,
        amount: lamports_moved as f64 / LAMPORTS_PER_SOL,
        sol_change: lamports_net as f64 / LAMPORTS_PER_SOL,
        fee: raw.fee as f64 / LAMPORTS_PER_SOL,
        source: raw.source.clone(),
        kind: raw.kind.clone(),
        swap,
        token_transfers,
        programs,
    }
}

fn leg(native: Option<&NativeAmount>, tokens: &[TokenAmount]) -> Option<(String, f64)> {
    if let Some(token) = tokens.first() {
        let raw: f64 = token.raw_token_amount.token_amount.parse().unwrap_or(0.0);
        let scaled = raw / 10f64.powi(token.raw_token_amount.decimals as i32);
        let name = if token.mint == WRAPPED_SOL_MINT { SOL } else { token.mint.as_str() };
        return Some((name.to_string(), scaled));
    }
    let native = native?;
    let lamports = match &native.amount {
        serde_json::Value::String(s) => s.parse::<f64>().ok()?,
        serde_json::Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    Some((SOL.to_string(), lamports / LAMPORTS_PER_SOL))
}

pub fn map_token_balances(raw: &HeliusBalances) -> Vec<TokenBalance> {
    raw.tokens
        .iter()
        .filter(|t| t.amount > 0)
        .map(|t| TokenBalance {
            mint: t.mint.clone(),
            symbol: None,
            amount: t.amount as f64 / 10f64.powi(t.decimals as i32),
            price_usd: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const WALLET: &str = "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU";

    fn swap_fixture() -> HeliusTransaction {
        serde_json::from_value(json!({
            "signature": "5sig",
            "timestamp": 1_700_000_000,
            "type": "SWAP",
            "source": "JUPITER",
            "fee": 5000,
            "transactionError": null,
            "nativeTransfers": [
                { "fromUserAccount": WALLET, "toUserAccount": "pool", "amount": 1_500_000_000u64 },
                { "fromUserAccount": "a", "toUserAccount": "b", "amount": 999u64 }
            ],
            "tokenTransfers": [
                { "fromUserAccount": "pool", "toUserAccount": WALLET, "mint": "BONK", "tokenAmount": 1200.5 },
                { "fromUserAccount": "x", "toUserAccount": "y", "mint": "OTHER", "tokenAmount": 1.0 }
            ],
            "instructions": [
                { "programId": "JUP6Lkb" },
                { "programId": "JUP6Lkb" },
                { "programId": "TokenkegQ" }
            ],
            "events": {
                "swap": {
                    "nativeInput": { "account": WALLET, "amount": "1500000000" },
                    "nativeOutput": null,
                    "tokenInputs": [],
                    "tokenOutputs": [
                        { "mint": "BONK", "rawTokenAmount": { "tokenAmount": "120050", "decimals": 2 } }
                    ],
                    "innerSwaps": [ { "programInfo": { "source": "RAYDIUM" } } ]
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn maps_swap_transaction_from_wallet_perspective() {
        let tx = map_transaction(WALLET, &swap_fixture());

        assert_eq!(tx.signature, "5sig");
        assert_eq!(tx.status, TxStatus::Success);
        assert!((tx.amount - 1.5).abs() < 1e-12);
        assert!((tx.sol_change + 1.5).abs() < 1e-12);
        assert!((tx.fee - 0.000005).abs() < 1e-12);
        assert_eq!(tx.kind, "SWAP");
        assert_eq!(tx.programs, vec!["JUP6Lkb".to_string(), "TokenkegQ".to_string()]);

        assert_eq!(tx.token_transfers.len(), 1);
        assert_eq!(tx.token_transfers[0].direction, TransferDirection::In);

        let swap = tx.swap.expect("swap event");
        assert_eq!(swap.dex, "RAYDIUM");
        assert_eq!(swap.token_in, "SOL");
        assert_eq!(swap.token_out, "BONK");
        assert!((swap.amount_in - 1.5).abs() < 1e-12);
        assert!((swap.amount_out - 1200.5).abs() < 1e-9);
    }

    #[test]
    fn wrapped_sol_legs_read_as_sol() {
        let mut raw = swap_fixture();
        raw.native_transfers.clear();
        raw.token_transfers = serde_json::from_value(json!([
            { "fromUserAccount": WALLET, "toUserAccount": "pool", "mint": "BONK", "tokenAmount": 1200.5 },
            { "fromUserAccount": "pool", "toUserAccount": WALLET, "mint": WRAPPED_SOL_MINT, "tokenAmount": 1.75 }
        ]))
        .unwrap();
        raw.events.swap = serde_json::from_value(json!({
            "tokenInputs": [{ "mint": "BONK", "rawTokenAmount": { "tokenAmount": "120050", "decimals": 2 } }],
            "tokenOutputs": [{ "mint": WRAPPED_SOL_MINT, "rawTokenAmount": { "tokenAmount": "1750000000", "decimals": 9 } }]
        }))
        .unwrap();

        let tx = map_transaction(WALLET, &raw);
        assert_eq!(tx.sol_change, 0.0);
        assert_eq!(tx.token_transfers[1].symbol.as_deref(), Some("SOL"));
        assert_eq!(tx.token_transfers[1].direction, TransferDirection::In);

        let swap = tx.swap.expect("swap event");
        assert_eq!(swap.token_in, "BONK");
        assert_eq!(swap.token_out, "SOL");
        assert!((swap.amount_out - 1.75).abs() < 1e-12);
    }

    #[test]
    fn transaction_error_marks_failure() {
        let mut raw = swap_fixture();
        raw.transaction_error = Some(json!({ "InstructionError": [0, "Custom"] }));
        assert_eq!(map_transaction(WALLET, &raw).status, TxStatus::Failed);
    }

    #[test]
    fn balances_skip_empty_accounts_and_scale_decimals() {
        let raw: HeliusBalances = serde_json::from_value(json!({
            "nativeBalance": 2_000_000_000u64,
            "tokens": [
                { "mint": "USDC", "amount": 12_500_000u64, "decimals": 6 },
                { "mint": "DUST", "amount": 0, "decimals": 9 }
            ]
        }))
        .unwrap();

        let balances = map_token_balances(&raw);
        assert_eq!(balances.len(), 1);
        assert_eq!(balances[0].mint, "USDC");
        assert!((balances[0].amount - 12.5).abs() < 1e-12);
    }

    #[tokio::test]
    async fn empty_key_is_reported_before_any_request() {
        let settings = HeliusSettings {
            api_key: String::new(),
            base_url: "http://127.0.0.1:9".into(),
            rpc_url: String::new(),
            transaction_limit: 10,
        };
        let client = HeliusClient::new(Client::new(), &settings, RetryPolicy::none());
        let err = client.get_transactions(WALLET).await.unwrap_err();
        assert!(matches!(err, Error::MissingApiKey("helius")));
    }
}
