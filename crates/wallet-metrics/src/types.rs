// In crates/wallet-metrics/src/types.rs
//
// Every numeric field defaults to zero and every list to empty, so a metrics
// shell always serialises with the full set of keys.

use serde::{Deserialize, Serialize};

/// The full per-wallet statistics consumed by the dashboard and the rule analyzer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetailedMetrics {
    pub overview: OverviewMetrics,
    pub swap_metrics: SwapMetrics,
    pub token_metrics: Vec<TokenMetric>,
    pub trading_stats: TradingStats,
    pub risk_metrics: RiskMetrics,
    pub prediction_metrics: PredictionMetrics,
    pub ai_insights: Vec<AiInsight>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverviewMetrics {
    pub total_transactions: u32,
    /// Sum of SOL moved across all transactions.
    pub total_volume: f64,
    pub total_fees: f64,
    /// Fraction of successful transactions, 0..=1.
    pub success_rate: f64,
    /// Days since the earliest transaction.
    pub account_age: f64,
    /// Unix seconds, 0 when there is no activity.
    pub first_activity: i64,
    pub last_activity: i64,
    pub sol_balance: f64,
    pub token_count: u32,
    #[serde(rename = "totalPnL")]
    pub total_pnl: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SwapMetrics {
    pub total_swaps: u32,
    pub swap_volume: f64,
    pub average_swap_size: f64,
    pub dex_distribution: Vec<DexShare>,
    pub slippage: SlippageStats,
    pub timing: SwapTiming,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DexShare {
    pub dex: String,
    pub count: u32,
    pub volume: f64,
    /// Share of swaps routed through this venue, 0..=100.
    pub percentage: f64,
}

/// Slippage in percent of the quoted output, over swaps that carry a quote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SlippageStats {
    pub average: f64,
    pub max: f64,
    pub min: f64,
    pub samples: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SwapTiming {
    /// Swap counts per UTC hour of day (24 entries once computed).
    pub hourly_distribution: Vec<u32>,
    pub average_interval_hours: f64,
}

/// One entry per token-carrying transaction. Not merged by mint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenMetric {
    pub mint: String,
    pub symbol: String,
    pub signature: String,
    pub timestamp: i64,
    /// Current holding of `mint` from the balance snapshot.
    pub balance: f64,
    pub volume: f64,
    /// Net value flow of the transaction, positive when the wallet gained.
    pub pnl: f64,
    pub risk_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TradingStats {
    /// Fraction of decided trades that gained, 0..=1.
    pub win_rate: f64,
    pub average_return: f64,
    pub best_trade: f64,
    pub worst_trade: f64,
    pub longest_win_streak: u32,
    pub longest_loss_streak: u32,
    pub avg_trades_per_day: f64,
    /// Fraction of active days that closed with positive P&L, 0..=1.
    pub profitable_days_ratio: f64,
    pub daily_frequency: Vec<DailyActivity>,
    pub patterns: Vec<DetectedPattern>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyActivity {
    /// `YYYY-MM-DD` in UTC.
    pub date: String,
    pub count: u32,
    pub volume: f64,
    pub pnl: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetectedPattern {
    pub name: String,
    pub confidence: f64,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskMetrics {
    pub volatility: f64,
    pub max_drawdown: f64,
    pub concentration: ConcentrationRisk,
    pub correlation: f64,
    pub value_at_risk: f64,
    pub sharpe_ratio: f64,
    pub protocol_exposure: Vec<ProtocolExposure>,
    /// Share of token volume in assets without a known price, 0..=1.
    pub liquidity_exposure: f64,
    pub smart_contract_risk: SmartContractRisk,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConcentrationRisk {
    /// Largest single-token share of token volume, 0..=1.
    pub top_token_share: f64,
    pub herfindahl_index: f64,
    pub distribution: Vec<TokenShare>,
}

/// Token volume merged by symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenShare {
    pub symbol: String,
    pub volume: f64,
    /// 0..=100
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProtocolExposure {
    pub protocol: String,
    pub count: u32,
    /// 0..=100
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SmartContractRisk {
    /// Share of transactions routed through unlabelled programs, 0..=1.
    pub score: f64,
    pub unknown_programs: u32,
}

// --- Filled by the rule analyzer ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    #[default]
    Pattern,
    Risk,
    Opportunity,
    Performance,
}

/// A triggered rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Finding {
    pub rule_id: String,
    pub category: RuleCategory,
    pub description: String,
    /// -1..=1
    pub impact: f64,
    /// 0..=1
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Recommendation {
    pub text: String,
    pub rule_id: String,
    pub priority: u32,
    /// Absolute impact of the source rule.
    pub impact: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PredictionMetrics {
    pub score: f64,
    pub patterns: Vec<Finding>,
    pub risks: Vec<Finding>,
    pub recommendations: Vec<Recommendation>,
}

// --- Filled by the language model ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiInsight {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: String,
    pub confidence: f64,
}
