// In crates/analytics/src/normalizer.rs

use crate::types::{Trade, TradeEntry, TradeExit, TradeMetrics, TradeStatus};
use chrono::{DateTime, Utc};
use core_types::TokenRow;
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

pub const UNKNOWN_TOKEN: &str = "Unknown";

/// Pulls the display name out of an HTML anchor (`<a href="...">NAME</a>`).
///
/// Falls back to `"Unknown"` when there is no non-empty text between a `>` and the next `<`.
pub fn extract_token_name(token_address: Option<&str>) -> String {
    token_address
        .and_then(|raw| {
            let start = raw.find('>')? + 1;
            let len = raw[start..].find('<')?;
            let name = &raw[start..start + len];
            (!name.is_empty()).then(|| name.to_string())
        })
        .unwrap_or_else(|| UNKNOWN_TOKEN.to_string())
}

/// Converts one query row into a `Trade`.
///
/// Missing or malformed columns degrade to `None`/zero; this never fails.
/// `now` is the reference point for the holding time, so repeated runs over the
/// same row only differ in `holding_time_hours` when `now` differs.
pub fn normalize_row(row: &TokenRow, now: DateTime<Utc>) -> Trade {
    let entry = TradeEntry {
        price: row.initial_buy_price.unwrap_or_default(),
        amount: row.initial_buy_amount.unwrap_or_default(),
        timestamp: row.initial_buy_time,
        total_cost: row.buy.unwrap_or_default(),
    };

    let exit = row.sell.map(|sell| {
        let price = row.latest_price.unwrap_or_default();
        TradeExit {
            price,
            amount: if price > dec!(0) { sell.checked_div(price).unwrap_or_default() } else { dec!(0) },
            timestamp: row.latest_block_time,
            total_return: sell,
        }
    });

    let status = if exit.is_some() {
        TradeStatus::Closed
    } else {
        TradeStatus::Open
    };

    let metrics = TradeMetrics {
        pnl: row.total_pnl,
        roi: percent_of(row.total_pnl, row.buy),
        holding_time_hours: row.latest_block_time.map(|t| hours_between(t, now)),
        max_drawdown: match (row.latest_price, row.initial_buy_price) {
            (Some(latest), Some(initial)) => percent_of(latest.checked_sub(initial), Some(initial)),
            _ => None,
        },
    };

    Trade {
        token: extract_token_name(row.token_address.as_deref()),
        entry,
        exit,
        metrics,
        status,
    }
}

/// Exactly one `Trade` per row, in row order.
pub fn normalize_rows(rows: &[TokenRow], now: DateTime<Utc>) -> Vec<Trade> {
    rows.iter().map(|row| normalize_row(row, now)).collect()
}

/// `numerator / denominator * 100`, or `None` if either side is missing or the
/// denominator is zero.
fn percent_of(numerator: Option<Decimal>, denominator: Option<Decimal>) -> Option<f64> {
    let (n, d) = (numerator?, denominator?);
    if d.is_zero() {
        return None;
    }
    n.checked_div(d)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .and_then(|pct| pct.to_f64())
}

fn hours_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 3_600_000.0
}
