// In crates/rules/src/default_rules.rs

use crate::types::Rule;
use wallet_metrics::RuleCategory;

pub const HIGH_FREQUENCY_TRADING: &str = "high-frequency-trading";
pub const TOKEN_CONCENTRATION: &str = "token-concentration";
pub const MARKET_TIMING: &str = "market-timing";
pub const LIQUIDITY_RISK: &str = "liquidity-risk";
pub const SMART_CONTRACT_RISK: &str = "smart-contract-risk";
pub const CONSISTENT_PROFITABILITY: &str = "consistent-profitability";
pub const FEE_DRAG: &str = "fee-drag";

/// The built-in rule table.
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule::new(
            HIGH_FREQUENCY_TRADING,
            RuleCategory::Pattern,
            "Trades more than ten times per day on average",
        )
        .priority(2)
        .when(|m| m.trading_stats.avg_trades_per_day > 10.0)
        .impact(|m| if m.trading_stats.win_rate > 0.6 { 1.0 } else { -1.0 })
        .confidence(|m| (m.trading_stats.avg_trades_per_day / 20.0).min(1.0))
        .advise(|m| {
            if m.trading_stats.win_rate > 0.6 {
                vec!["High-frequency activity is paying off; keep position sizes consistent as volume grows".into()]
            } else {
                vec![
                    "Cut trade frequency and concentrate on higher-conviction setups".into(),
                    "Compare fees paid against realised gains before adding more trades".into(),
                ]
            }
        }),
        Rule::new(
            TOKEN_CONCENTRATION,
            RuleCategory::Risk,
            "A single token dominates trading volume",
        )
        .priority(3)
        .when(|m| m.risk_metrics.concentration.top_token_share > 0.4)
        .impact(|_| -0.8)
        .confidence(|m| m.risk_metrics.concentration.top_token_share.clamp(0.0, 1.0))
        .advise(|m| {
            let top = m.risk_metrics.concentration.distribution.first();
            vec![format!(
                "Diversify: {:.0}% of token volume is in {}",
                m.risk_metrics.concentration.top_token_share * 100.0,
                top.map(|t| t.symbol.as_str()).unwrap_or("one token")
            )]
        }),
        Rule::new(
            MARKET_TIMING,
            RuleCategory::Pattern,
            "Most active days close in profit",
        )
        .priority(1)
        .when(|m| m.trading_stats.profitable_days_ratio > 0.6)
        .impact(|_| 0.7)
        .confidence(|m| m.trading_stats.profitable_days_ratio.clamp(0.0, 1.0))
        .advise(|_| vec!["Entry timing is consistently good; record the setups that work and repeat them".into()]),
        Rule::new(
            LIQUIDITY_RISK,
            RuleCategory::Risk,
            "Much of the token activity has no SOL leg to value it",
        )
        .priority(2)
        .depends_on(TOKEN_CONCENTRATION)
        .when(|m| m.risk_metrics.liquidity_exposure > 0.3)
        .impact(|_| -0.6)
        .confidence(|m| m.risk_metrics.liquidity_exposure.clamp(0.0, 1.0))
        .advise(|_| {
            vec![
                "Size positions in thinly traded tokens so they can be exited without moving the price".into(),
                "Prefer pools with deeper liquidity for the largest holdings".into(),
            ]
        }),
        Rule::new(
            SMART_CONTRACT_RISK,
            RuleCategory::Risk,
            "Most activity goes through unlabelled programs",
        )
        .priority(3)
        .when(|m| m.risk_metrics.smart_contract_risk.score > 0.7)
        .impact(|_| -0.9)
        .confidence(|m| m.risk_metrics.smart_contract_risk.score.clamp(0.0, 1.0))
        .advise(|m| {
            vec![format!(
                "Audit the {} unrecognised programs this wallet interacts with and revoke stale approvals",
                m.risk_metrics.smart_contract_risk.unknown_programs
            )]
        }),
        Rule::new(
            CONSISTENT_PROFITABILITY,
            RuleCategory::Performance,
            "Wins most trades with a healthy risk-adjusted return",
        )
        .priority(1)
        .when(|m| m.trading_stats.win_rate > 0.55 && m.risk_metrics.sharpe_ratio > 1.0)
        .impact(|_| 0.5)
        .confidence(|m| (m.risk_metrics.sharpe_ratio / 3.0).min(1.0))
        .advise(|_| vec!["Performance is consistent; consider scaling position sizes gradually".into()]),
        Rule::new(
            FEE_DRAG,
            RuleCategory::Opportunity,
            "Fees eat more than 1% of traded volume",
        )
        .priority(1)
        .when(|m| m.overview.total_volume > 0.0 && m.overview.total_fees / m.overview.total_volume > 0.01)
        .impact(|_| -0.3)
        .confidence(|_| 0.6)
        .advise(|_| vec!["Batch small transfers and avoid priority fees on non-urgent transactions".into()]),
    ]
}
