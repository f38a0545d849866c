// In crates/wallet-metrics/src/builder.rs

use crate::stats;
use crate::types::{
    ConcentrationRisk, DailyActivity, DetailedMetrics, DetectedPattern, DexShare, OverviewMetrics,
    ProtocolExposure, RiskMetrics, SlippageStats, SmartContractRisk, SwapMetrics, SwapTiming,
    TokenMetric, TokenShare, TradingStats,
};
use chrono::{DateTime, Timelike, Utc};
use core_types::{TokenTransfer, TxStatus, WalletBalance, WalletTransaction};
use std::collections::{BTreeMap, BTreeSet, HashMap};

const SECONDS_PER_DAY: f64 = 86_400.0;
const UNKNOWN_SOURCE: &str = "UNKNOWN";
const VAR_CONFIDENCE: f64 = 0.95;
const SOL: &str = "SOL";

/// Folds raw wallet activity into `DetailedMetrics`.
///
/// `prediction_metrics` and `ai_insights` are left empty; they are filled by the
/// rule analyzer and the insight formatter.
#[derive(Debug, Default)]
pub struct WalletMetricsBuilder;

/// A token metric plus whether a SOL leg valued it.
struct TokenActivity {
    metric: TokenMetric,
    valued: bool,
}

/// Open quantity and SOL cost basis held in one mint.
#[derive(Debug, Default)]
struct Position {
    quantity: f64,
    cost: f64,
}

impl Position {
    /// Books a fill at average cost and returns the realised P&L in SOL.
    ///
    /// `tokens` and `sol` are signed from the wallet's side: a buy receives tokens
    /// for SOL, a sell gives tokens up for SOL. Sells beyond the tracked quantity
    /// have no known entry and realise nothing for the excess.
    fn fill(&mut self, tokens: f64, sol: f64) -> f64 {
        if tokens > 0.0 && sol < 0.0 {
            self.quantity += tokens;
            self.cost -= sol;
            0.0
        } else if tokens < 0.0 && sol > 0.0 && self.quantity > 0.0 {
            let sold = -tokens;
            let matched = sold.min(self.quantity);
            let basis = self.cost * matched / self.quantity;
            let proceeds = sol * matched / sold;
            self.quantity -= matched;
            self.cost -= basis;
            proceeds - basis
        } else {
            0.0
        }
    }
}

impl WalletMetricsBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(
        &self,
        transactions: &[WalletTransaction],
        balance: &WalletBalance,
        now: DateTime<Utc>,
    ) -> DetailedMetrics {
        // Chronological order drives streaks, intervals and the drawdown curve.
        let mut txs: Vec<&WalletTransaction> = transactions.iter().collect();
        txs.sort_by_key(|tx| tx.timestamp);

        let activities = token_activities(&txs, balance);
        let token_metrics: Vec<TokenMetric> = activities.iter().map(|a| a.metric.clone()).collect();

        let swap_metrics = swap_metrics(&txs);
        let daily = daily_activity(&txs, &token_metrics);
        let trading_stats = trading_stats(&token_metrics, &swap_metrics, &txs, daily);
        let risk_metrics = risk_metrics(&txs, &activities, &trading_stats.daily_frequency);
        let overview = overview(&txs, balance, &token_metrics, now);

        tracing::debug!(
            transactions = overview.total_transactions,
            swaps = swap_metrics.total_swaps,
            token_entries = token_metrics.len(),
            "Built wallet metrics."
        );

        DetailedMetrics {
            overview,
            swap_metrics,
            token_metrics,
            trading_stats,
            risk_metrics,
            ..DetailedMetrics::default()
        }
    }
}

fn overview(
    txs: &[&WalletTransaction],
    balance: &WalletBalance,
    token_metrics: &[TokenMetric],
    now: DateTime<Utc>,
) -> OverviewMetrics {
    let total = txs.len();
    let successes = txs.iter().filter(|tx| tx.status == TxStatus::Success).count();
    let first_activity = txs.first().map(|tx| tx.timestamp).unwrap_or(0);
    let last_activity = txs.last().map(|tx| tx.timestamp).unwrap_or(0);

    OverviewMetrics {
        total_transactions: total as u32,
        total_volume: txs.iter().map(|tx| tx.amount).sum(),
        total_fees: txs.iter().map(|tx| tx.fee).sum(),
        success_rate: if total > 0 { successes as f64 / total as f64 } else { 0.0 },
        account_age: if total > 0 {
            ((now.timestamp() - first_activity) as f64 / SECONDS_PER_DAY).max(0.0)
        } else {
            0.0
        },
        first_activity,
        last_activity,
        sol_balance: balance.sol,
        token_count: balance.tokens.iter().filter(|t| t.amount > 0.0).count() as u32,
        total_pnl: token_metrics.iter().map(|t| t.pnl).sum(),
    }
}

fn swap_metrics(txs: &[&WalletTransaction]) -> SwapMetrics {
    let swaps: Vec<&WalletTransaction> = txs.iter().copied().filter(|tx| tx.swap.is_some()).collect();
    let total_swaps = swaps.len();
    let swap_volume: f64 = swaps.iter().map(|tx| tx.amount).sum();

    // --- DEX distribution ---
    let mut by_dex: HashMap<&str, (u32, f64)> = HashMap::new();
    for tx in &swaps {
        if let Some(swap) = &tx.swap {
            let entry = by_dex.entry(swap.dex.as_str()).or_default();
            entry.0 += 1;
            entry.1 += tx.amount;
        }
    }
    let mut dex_distribution: Vec<DexShare> = by_dex
        .into_iter()
        .map(|(dex, (count, volume))| DexShare {
            dex: dex.to_string(),
            count,
            volume,
            percentage: count as f64 / total_swaps as f64 * 100.0,
        })
        .collect();
    dex_distribution.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.dex.cmp(&b.dex)));

    // --- Slippage, only where the upstream supplied a quote ---
    let slippages: Vec<f64> = swaps
        .iter()
        .filter_map(|tx| tx.swap.as_ref())
        .filter_map(|swap| {
            let expected = swap.expected_amount_out?;
            (expected > 0.0).then(|| (expected - swap.amount_out) / expected * 100.0)
        })
        .collect();
    let slippage = if slippages.is_empty() {
        SlippageStats::default()
    } else {
        SlippageStats {
            average: stats::mean(&slippages),
            max: slippages.iter().copied().fold(f64::MIN, f64::max),
            min: slippages.iter().copied().fold(f64::MAX, f64::min),
            samples: slippages.len() as u32,
        }
    };

    // --- Timing ---
    let mut hourly_distribution = vec![0u32; 24];
    for tx in &swaps {
        if let Some(dt) = DateTime::<Utc>::from_timestamp(tx.timestamp, 0) {
            hourly_distribution[dt.hour() as usize] += 1;
        }
    }
    let intervals: Vec<f64> = swaps
        .windows(2)
        .map(|w| (w[1].timestamp - w[0].timestamp) as f64 / 3_600.0)
        .collect();

    SwapMetrics {
        total_swaps: total_swaps as u32,
        swap_volume,
        average_swap_size: if total_swaps > 0 { swap_volume / total_swaps as f64 } else { 0.0 },
        dex_distribution,
        slippage,
        timing: SwapTiming {
            hourly_distribution,
            average_interval_hours: stats::mean(&intervals),
        },
    }
}

/// One entry per transaction carrying token transfers, keyed on its first non-SOL transfer.
///
/// Volume and P&L are both in SOL, taken from the transaction's SOL leg.
fn token_activities(txs: &[&WalletTransaction], balance: &WalletBalance) -> Vec<TokenActivity> {
    let mut positions: HashMap<&str, Position> = HashMap::new();
    let mut activities: Vec<TokenActivity> = txs
        .iter()
        .filter_map(|tx| {
            let primary = tx
                .token_transfers
                .iter()
                .find(|t| !t.is_wrapped_sol())
                .or_else(|| tx.token_transfers.first())?;
            let sol = sol_leg(tx);
            let tokens: f64 = tx
                .token_transfers
                .iter()
                .filter(|t| t.mint == primary.mint)
                .map(TokenTransfer::signed_amount)
                .sum();

            let pnl = match sol {
                Some(sol) if !primary.is_wrapped_sol() => {
                    positions.entry(primary.mint.as_str()).or_default().fill(tokens, sol)
                }
                _ => 0.0,
            };

            Some(TokenActivity {
                metric: TokenMetric {
                    mint: primary.mint.clone(),
                    symbol: primary.symbol.clone().unwrap_or_else(|| primary.mint.clone()),
                    signature: tx.signature.clone(),
                    timestamp: tx.timestamp,
                    balance: balance.amount_of(&primary.mint),
                    volume: sol.map(f64::abs).unwrap_or(0.0),
                    pnl,
                    risk_score: 0.0,
                },
                valued: sol.is_some(),
            })
        })
        .collect();

    // Risk: unvalued activity starts at 0.5, plus half of the entry's share of volume.
    let total_volume: f64 = activities.iter().map(|a| a.metric.volume).sum();
    for activity in &mut activities {
        let share = if total_volume > 0.0 { activity.metric.volume / total_volume } else { 0.0 };
        let base = if activity.valued { 0.0 } else { 0.5 };
        activity.metric.risk_score = (base + 0.5 * share).clamp(0.0, 1.0);
    }
    activities
}

/// The wallet's signed SOL flow in `tx`: the swap's SOL side, else wrapped SOL
/// transfers, else the native balance change. `None` when no SOL moved.
fn sol_leg(tx: &WalletTransaction) -> Option<f64> {
    if tx.status == TxStatus::Failed {
        return None;
    }
    if let Some(swap) = &tx.swap {
        if swap.token_in == SOL {
            return Some(-swap.amount_in.abs()).filter(|sol| *sol != 0.0);
        }
        if swap.token_out == SOL {
            return Some(swap.amount_out.abs()).filter(|sol| *sol != 0.0);
        }
    }
    let wrapped: Vec<f64> = tx
        .token_transfers
        .iter()
        .filter(|t| t.is_wrapped_sol())
        .map(TokenTransfer::signed_amount)
        .collect();
    let flow = if wrapped.is_empty() { tx.sol_change } else { wrapped.iter().sum() };
    (flow != 0.0).then_some(flow)
}

fn daily_activity(txs: &[&WalletTransaction], token_metrics: &[TokenMetric]) -> Vec<DailyActivity> {
    let mut days: BTreeMap<String, DailyActivity> = BTreeMap::new();
    for tx in txs {
        let day = day_key(tx.timestamp);
        let entry = days.entry(day.clone()).or_insert_with(|| DailyActivity { date: day, ..Default::default() });
        entry.count += 1;
        entry.volume += tx.amount;
    }
    for metric in token_metrics {
        if let Some(entry) = days.get_mut(&day_key(metric.timestamp)) {
            entry.pnl += metric.pnl;
        }
    }
    days.into_values().collect()
}

fn trading_stats(
    token_metrics: &[TokenMetric],
    swaps: &SwapMetrics,
    txs: &[&WalletTransaction],
    daily_frequency: Vec<DailyActivity>,
) -> TradingStats {
    let decided: Vec<f64> = token_metrics.iter().map(|t| t.pnl).filter(|p| *p != 0.0).collect();
    let wins = decided.iter().filter(|p| **p > 0.0).count();

    let (mut longest_win_streak, mut longest_loss_streak) = (0u32, 0u32);
    let (mut win_run, mut loss_run) = (0u32, 0u32);
    for pnl in &decided {
        if *pnl > 0.0 {
            win_run += 1;
            loss_run = 0;
        } else {
            loss_run += 1;
            win_run = 0;
        }
        longest_win_streak = longest_win_streak.max(win_run);
        longest_loss_streak = longest_loss_streak.max(loss_run);
    }

    let swap_times: Vec<i64> = txs.iter().filter(|tx| tx.swap.is_some()).map(|tx| tx.timestamp).collect();
    let avg_trades_per_day = match (swap_times.first(), swap_times.last()) {
        (Some(first), Some(last)) => {
            let span_days = ((last - first) as f64 / SECONDS_PER_DAY).max(1.0);
            swap_times.len() as f64 / span_days
        }
        _ => 0.0,
    };

    let profitable_days = daily_frequency.iter().filter(|d| d.pnl > 0.0).count();
    let profitable_days_ratio = if daily_frequency.is_empty() {
        0.0
    } else {
        profitable_days as f64 / daily_frequency.len() as f64
    };

    let mut stats = TradingStats {
        win_rate: if decided.is_empty() { 0.0 } else { wins as f64 / decided.len() as f64 },
        average_return: stats::mean(&decided),
        best_trade: decided.iter().copied().fold(0.0, f64::max),
        worst_trade: decided.iter().copied().fold(0.0, f64::min),
        longest_win_streak,
        longest_loss_streak,
        avg_trades_per_day,
        profitable_days_ratio,
        daily_frequency,
        patterns: Vec::new(),
    };
    stats.patterns = detect_patterns(&stats, swaps);
    stats
}

/// Trading-style heuristics surfaced next to the rule findings.
fn detect_patterns(stats: &TradingStats, swaps: &SwapMetrics) -> Vec<DetectedPattern> {
    let mut patterns = Vec::new();

    if stats.avg_trades_per_day > 10.0 {
        patterns.push(DetectedPattern {
            name: "high-frequency".into(),
            confidence: (stats.avg_trades_per_day / 20.0).min(1.0),
            description: format!("Averages {:.1} swaps per day", stats.avg_trades_per_day),
        });
    }

    if swaps.total_swaps >= 2 && swaps.timing.average_interval_hours >= 24.0 {
        patterns.push(DetectedPattern {
            name: "swing-trading".into(),
            confidence: (swaps.timing.average_interval_hours / 72.0).min(1.0),
            description: format!(
                "Holds between swaps for {:.0} hours on average",
                swaps.timing.average_interval_hours
            ),
        });
    }

    if let Some(top) = swaps.dex_distribution.first() {
        if swaps.total_swaps >= 5 && top.percentage >= 80.0 {
            patterns.push(DetectedPattern {
                name: "dex-loyalty".into(),
                confidence: top.percentage / 100.0,
                description: format!("Routes {:.0}% of swaps through {}", top.percentage, top.dex),
            });
        }
    }

    patterns
}

fn risk_metrics(
    txs: &[&WalletTransaction],
    activities: &[TokenActivity],
    daily: &[DailyActivity],
) -> RiskMetrics {
    let daily_pnl: Vec<f64> = daily.iter().map(|d| d.pnl).collect();
    let daily_volume: Vec<f64> = daily.iter().map(|d| d.volume).collect();

    // --- Concentration, merged by symbol over SOL-valued activity ---
    let mut by_symbol: HashMap<&str, f64> = HashMap::new();
    for activity in activities.iter().filter(|a| a.valued) {
        *by_symbol.entry(activity.metric.symbol.as_str()).or_default() += activity.metric.volume;
    }
    let token_volume: f64 = by_symbol.values().sum();
    let mut distribution: Vec<TokenShare> = by_symbol
        .into_iter()
        .map(|(symbol, volume)| TokenShare {
            symbol: symbol.to_string(),
            volume,
            percentage: if token_volume > 0.0 { volume / token_volume * 100.0 } else { 0.0 },
        })
        .collect();
    distribution.sort_by(|a, b| b.volume.total_cmp(&a.volume).then_with(|| a.symbol.cmp(&b.symbol)));
    let shares: Vec<f64> = distribution.iter().map(|d| d.percentage / 100.0).collect();

    let unvalued = activities.iter().filter(|a| !a.valued).count();

    // --- Protocol exposure ---
    let mut by_protocol: HashMap<&str, u32> = HashMap::new();
    for tx in txs {
        *by_protocol.entry(source_label(tx)).or_default() += 1;
    }
    let mut protocol_exposure: Vec<ProtocolExposure> = by_protocol
        .into_iter()
        .map(|(protocol, count)| ProtocolExposure {
            protocol: protocol.to_string(),
            count,
            percentage: count as f64 / txs.len() as f64 * 100.0,
        })
        .collect();
    protocol_exposure.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.protocol.cmp(&b.protocol)));

    // --- Smart-contract risk: activity through programs the indexer could not label ---
    let unlabelled: Vec<&&WalletTransaction> = txs.iter().filter(|tx| source_label(tx) == UNKNOWN_SOURCE).collect();
    let unknown_programs: BTreeSet<&str> = unlabelled
        .iter()
        .flat_map(|tx| tx.programs.iter().map(String::as_str))
        .collect();

    RiskMetrics {
        volatility: stats::std_dev(&daily_pnl),
        max_drawdown: stats::max_drawdown(&daily_pnl),
        concentration: ConcentrationRisk {
            top_token_share: shares.first().copied().unwrap_or(0.0),
            herfindahl_index: shares.iter().map(|s| s * s).sum(),
            distribution,
        },
        correlation: stats::pearson(&daily_volume, &daily_pnl),
        value_at_risk: stats::value_at_risk(&daily_pnl, VAR_CONFIDENCE),
        sharpe_ratio: stats::sharpe(&daily_pnl),
        protocol_exposure,
        liquidity_exposure: if activities.is_empty() {
            0.0
        } else {
            unvalued as f64 / activities.len() as f64
        },
        smart_contract_risk: SmartContractRisk {
            score: if txs.is_empty() { 0.0 } else { unlabelled.len() as f64 / txs.len() as f64 },
            unknown_programs: unknown_programs.len() as u32,
        },
    }
}

fn source_label(tx: &WalletTransaction) -> &str {
    if tx.source.trim().is_empty() { UNKNOWN_SOURCE } else { tx.source.as_str() }
}

fn day_key(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use core_types::{SwapEvent, TokenBalance, TransferDirection, WRAPPED_SOL_MINT};

    fn base() -> i64 {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap().timestamp()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap()
    }

    fn tx(signature: &str, offset_secs: i64, amount: f64) -> WalletTransaction {
        WalletTransaction {
            signature: signature.into(),
            timestamp: base() + offset_secs,
            amount,
            fee: 0.000005,
            source: "SYSTEM_PROGRAM".into(),
            kind: "TRANSFER".into(),
            ..Default::default()
        }
    }

    fn transfer(mint: &str, symbol: &str, amount: f64, direction: TransferDirection) -> TokenTransfer {
        TokenTransfer {
            mint: mint.into(),
            symbol: Some(symbol.into()),
            amount,
            direction,
        }
    }

    fn swap_tx(signature: &str, offset_secs: i64, dex: &str, sol: f64, event: SwapEvent, leg: TokenTransfer) -> WalletTransaction {
        WalletTransaction {
            source: dex.into(),
            kind: "SWAP".into(),
            sol_change: if leg.direction == TransferDirection::In { -sol } else { sol },
            swap: Some(event),
            token_transfers: vec![leg],
            ..tx(signature, offset_secs, sol)
        }
    }

    /// Spends `sol` on `tokens` BONK.
    fn buy(signature: &str, offset_secs: i64, dex: &str, sol: f64, tokens: f64) -> WalletTransaction {
        let event = SwapEvent {
            dex: dex.into(),
            token_in: "SOL".into(),
            token_out: "bonk-mint".into(),
            amount_in: sol,
            amount_out: tokens,
            expected_amount_out: None,
        };
        swap_tx(signature, offset_secs, dex, sol, event, transfer("bonk-mint", "BONK", tokens, TransferDirection::In))
    }

    /// Sells `tokens` BONK for `sol`.
    fn sell(signature: &str, offset_secs: i64, dex: &str, tokens: f64, sol: f64) -> WalletTransaction {
        let event = SwapEvent {
            dex: dex.into(),
            token_in: "bonk-mint".into(),
            token_out: "SOL".into(),
            amount_in: tokens,
            amount_out: sol,
            expected_amount_out: None,
        };
        swap_tx(signature, offset_secs, dex, sol, event, transfer("bonk-mint", "BONK", tokens, TransferDirection::Out))
    }

    #[test]
    fn empty_input_yields_a_zeroed_shell() {
        let metrics = WalletMetricsBuilder::new().build(&[], &WalletBalance::default(), now());

        assert_eq!(metrics.overview, OverviewMetrics::default());
        assert_eq!(metrics.swap_metrics.total_swaps, 0);
        assert_eq!(metrics.swap_metrics.timing.hourly_distribution, vec![0; 24]);
        assert!(metrics.token_metrics.is_empty());
        assert_eq!(metrics.trading_stats.win_rate, 0.0);
        assert!(metrics.trading_stats.patterns.is_empty());
        assert_eq!(metrics.risk_metrics.smart_contract_risk.score, 0.0);
        assert_eq!(metrics.risk_metrics.concentration.top_token_share, 0.0);
        assert_eq!(metrics.prediction_metrics.score, 0.0);
        assert!(metrics.ai_insights.is_empty());
    }

    #[test]
    fn overview_counts_volume_fees_and_age() {
        let mut failed = tx("c", 7_200, 0.5);
        failed.status = TxStatus::Failed;
        let txs = vec![tx("b", 3_600, 2.0), tx("a", 0, 1.5), failed];
        let balance = WalletBalance {
            sol: 3.25,
            tokens: vec![
                TokenBalance { mint: "m1".into(), symbol: None, amount: 5.0, price_usd: None },
                TokenBalance { mint: "m2".into(), symbol: None, amount: 0.0, price_usd: None },
            ],
        };

        let overview = WalletMetricsBuilder::new().build(&txs, &balance, now()).overview;
        assert_eq!(overview.total_transactions, 3);
        assert_eq!(overview.total_volume, 4.0);
        assert!((overview.total_fees - 0.000015).abs() < 1e-12);
        assert!((overview.success_rate - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(overview.account_age, 10.0);
        assert_eq!(overview.first_activity, base());
        assert_eq!(overview.last_activity, base() + 7_200);
        assert_eq!(overview.sol_balance, 3.25);
        assert_eq!(overview.token_count, 1);
    }

    #[test]
    fn token_metrics_keep_one_entry_per_transaction() {
        let txs = vec![
            buy("b1", 0, "JUPITER", 10.0, 1_000.0),
            sell("s1", 86_400, "JUPITER", 1_000.0, 12.0),
        ];
        let balance = WalletBalance {
            sol: 1.0,
            tokens: vec![TokenBalance { mint: "bonk-mint".into(), symbol: Some("BONK".into()), amount: 42.0, price_usd: None }],
        };
        let metrics = WalletMetricsBuilder::new().build(&txs, &balance, now());

        assert_eq!(metrics.token_metrics.len(), 2);
        assert!(metrics.token_metrics.iter().all(|t| t.symbol == "BONK" && t.balance == 42.0));
        assert_eq!(metrics.token_metrics[0].volume, 10.0);
        assert_eq!(metrics.token_metrics[0].pnl, 0.0);
        assert_eq!(metrics.token_metrics[1].pnl, 2.0);
        assert_eq!(metrics.overview.total_pnl, 2.0);

        // The distribution view merges the two BONK entries.
        let concentration = &metrics.risk_metrics.concentration;
        assert_eq!(concentration.distribution.len(), 1);
        assert_eq!(concentration.distribution[0].volume, 22.0);
        assert_eq!(concentration.distribution[0].percentage, 100.0);
        assert_eq!(concentration.top_token_share, 1.0);
        assert_eq!(concentration.herfindahl_index, 1.0);
        assert_eq!(metrics.risk_metrics.liquidity_exposure, 0.0);
    }

    #[test]
    fn partial_sells_realise_against_average_cost() {
        let txs = vec![
            buy("b1", 0, "JUPITER", 10.0, 1_000.0),
            sell("s1", 60, "JUPITER", 400.0, 6.0),
            sell("s2", 120, "JUPITER", 600.0, 3.0),
            // Nothing left to match, so no entry is known.
            sell("s3", 180, "JUPITER", 500.0, 5.0),
        ];
        let metrics = WalletMetricsBuilder::new().build(&txs, &WalletBalance::default(), now());

        let pnls: Vec<f64> = metrics.token_metrics.iter().map(|t| t.pnl).collect();
        assert_eq!(pnls.len(), 4);
        assert!((pnls[1] - 2.0).abs() < 1e-9);
        assert!((pnls[2] + 3.0).abs() < 1e-9);
        assert_eq!(pnls[3], 0.0);
        assert!((metrics.trading_stats.win_rate - 0.5).abs() < 1e-12);
    }

    #[test]
    fn swap_metrics_cover_dexes_slippage_and_timing() {
        let mut quoted = buy("s3", 7_200, "RAYDIUM", 1.0, 9.8);
        if let Some(event) = quoted.swap.as_mut() {
            event.expected_amount_out = Some(10.0);
        }
        let txs = vec![
            buy("s1", 0, "JUPITER", 1.0, 11.0),
            buy("s2", 3_600, "JUPITER", 1.0, 11.0),
            quoted,
            tx("t1", 10_800, 5.0),
        ];
        let swaps = WalletMetricsBuilder::new().build(&txs, &WalletBalance::default(), now()).swap_metrics;

        assert_eq!(swaps.total_swaps, 3);
        assert_eq!(swaps.swap_volume, 3.0);
        assert_eq!(swaps.average_swap_size, 1.0);
        assert_eq!(swaps.dex_distribution[0].dex, "JUPITER");
        assert_eq!(swaps.dex_distribution[0].count, 2);
        assert!((swaps.dex_distribution[1].percentage - 100.0 / 3.0).abs() < 1e-9);

        assert_eq!(swaps.slippage.samples, 1);
        assert!((swaps.slippage.average - 2.0).abs() < 1e-9);
        assert_eq!(swaps.slippage.max, swaps.slippage.min);

        assert_eq!(swaps.timing.hourly_distribution[0], 1);
        assert_eq!(swaps.timing.hourly_distribution[1], 1);
        assert_eq!(swaps.timing.hourly_distribution[2], 1);
        assert_eq!(swaps.timing.average_interval_hours, 1.0);
    }

    #[test]
    fn trading_stats_track_streaks_and_profitable_days() {
        let day = 86_400;
        let txs = vec![
            buy("b1", 0, "JUPITER", 10.0, 1_000.0),
            sell("w1", 60, "JUPITER", 1_000.0, 15.0),
            buy("b2", 120, "JUPITER", 10.0, 1_000.0),
            sell("w2", 180, "JUPITER", 1_000.0, 12.0),
            buy("b3", day, "JUPITER", 10.0, 1_000.0),
            sell("l1", day + 60, "JUPITER", 1_000.0, 4.0),
            buy("b4", 2 * day - 60, "JUPITER", 10.0, 1_000.0),
            sell("w3", 2 * day, "JUPITER", 1_000.0, 11.0),
            tx("plain", 3 * day, 1.0),
        ];
        let stats = WalletMetricsBuilder::new().build(&txs, &WalletBalance::default(), now()).trading_stats;

        // Buys realise nothing, so only the four sells are decided.
        assert_eq!(stats.win_rate, 0.75);
        assert_eq!(stats.longest_win_streak, 2);
        assert_eq!(stats.longest_loss_streak, 1);
        assert_eq!(stats.best_trade, 5.0);
        assert_eq!(stats.worst_trade, -6.0);
        assert_eq!(stats.daily_frequency.len(), 4);
        assert_eq!(stats.daily_frequency[0].date, "2024-03-01");
        assert_eq!(stats.daily_frequency[0].count, 4);
        assert_eq!(stats.daily_frequency[0].pnl, 7.0);
        // Two of four active days were profitable.
        assert_eq!(stats.profitable_days_ratio, 0.5);
        // Eight swaps spread over two days.
        assert_eq!(stats.avg_trades_per_day, 4.0);
    }

    #[test]
    fn bursts_of_swaps_are_flagged_as_high_frequency() {
        let txs: Vec<WalletTransaction> = (0..30)
            .map(|i| buy(&format!("s{}", i), i * 600, "JUPITER", 1.0, 100.0))
            .collect();
        let metrics = WalletMetricsBuilder::new().build(&txs, &WalletBalance::default(), now());

        assert_eq!(metrics.trading_stats.avg_trades_per_day, 30.0);
        let names: Vec<&str> = metrics.trading_stats.patterns.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["high-frequency", "dex-loyalty"]);
        assert_eq!(metrics.trading_stats.patterns[0].confidence, 1.0);
    }

    #[test]
    fn unlabelled_programs_raise_smart_contract_risk() {
        let mut a = tx("a", 0, 1.0);
        a.source = "UNKNOWN".into();
        a.programs = vec!["Prog1".into(), "Prog2".into()];
        let mut b = tx("b", 60, 1.0);
        b.source = String::new();
        b.programs = vec!["Prog2".into()];
        let c = tx("c", 120, 1.0);

        let risk = WalletMetricsBuilder::new().build(&[a, b, c], &WalletBalance::default(), now()).risk_metrics;
        assert!((risk.smart_contract_risk.score - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(risk.smart_contract_risk.unknown_programs, 2);
        assert_eq!(risk.protocol_exposure[0].protocol, "UNKNOWN");
        assert_eq!(risk.protocol_exposure[0].count, 2);
    }

    #[test]
    fn concentration_compares_sol_value_not_token_units() {
        let bonk = buy("b", 0, "JUPITER", 1.0, 1_000_000.0);
        let mut usdc = tx("u", 60, 60.0);
        usdc.sol_change = -60.0;
        usdc.token_transfers = vec![transfer("usdc-mint", "USDC", 10_000.0, TransferDirection::In)];
        let mut airdrop = tx("m", 120, 0.0);
        airdrop.token_transfers = vec![transfer("meme-mint", "MEME", 5_000_000.0, TransferDirection::In)];

        let metrics = WalletMetricsBuilder::new().build(&[bonk, usdc, airdrop], &WalletBalance::default(), now());
        let risk = &metrics.risk_metrics;

        // The unvalued airdrop stays out of the share maths.
        assert_eq!(risk.concentration.distribution.len(), 2);
        assert_eq!(risk.concentration.distribution[0].symbol, "USDC");
        assert!((risk.concentration.top_token_share - 60.0 / 61.0).abs() < 1e-12);
        assert!((risk.liquidity_exposure - 1.0 / 3.0).abs() < 1e-12);

        assert_eq!(metrics.token_metrics[2].symbol, "MEME");
        assert_eq!(metrics.token_metrics[2].volume, 0.0);
        assert_eq!(metrics.token_metrics[2].risk_score, 0.5);
        assert!((metrics.token_metrics[1].risk_score - 0.5 * 60.0 / 61.0).abs() < 1e-12);
        // A buy realises nothing and an airdrop has no cost.
        assert!(metrics.token_metrics.iter().all(|t| t.pnl == 0.0));
    }

    #[test]
    fn wrapped_sol_legs_value_the_trade() {
        let mut open = tx("o", 0, 0.0);
        open.token_transfers = vec![
            transfer(WRAPPED_SOL_MINT, "SOL", 2.0, TransferDirection::Out),
            transfer("jup-mint", "JUP", 50.0, TransferDirection::In),
        ];
        let mut close = tx("c", 60, 0.0);
        close.token_transfers = vec![
            transfer("jup-mint", "JUP", 50.0, TransferDirection::Out),
            transfer(WRAPPED_SOL_MINT, "SOL", 2.5, TransferDirection::In),
        ];

        let metrics = WalletMetricsBuilder::new().build(&[open, close], &WalletBalance::default(), now());
        assert!(metrics.token_metrics.iter().all(|t| t.symbol == "JUP"));
        assert_eq!(metrics.token_metrics[1].volume, 2.5);
        assert_eq!(metrics.overview.total_pnl, 0.5);
        assert_eq!(metrics.risk_metrics.liquidity_exposure, 0.0);
    }
}
