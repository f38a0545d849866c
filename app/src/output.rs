// In app/src/output.rs

use anyhow::Result;
use wallet_metrics::DetailedMetrics;
use analytics::TradeAnalysis;
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_wallet_summary(address: &str, metrics: &DetailedMetrics) {
    let overview = &metrics.overview;
    let prediction = &metrics.prediction_metrics;

    println!("\n--- Wallet {} ---", address);
    println!(
        "{:<14} {:>10}   {:<14} {:>10.4}",
        "Transactions", overview.total_transactions, "Volume (SOL)", overview.total_volume
    );
    println!(
        "{:<14} {:>9.1}%   {:<14} {:>10.4}",
        "Success rate", overview.success_rate * 100.0, "SOL balance", overview.sol_balance
    );
    println!("{:<14} {:>10.2}", "Score", prediction.score);

    for finding in prediction.patterns.iter().chain(&prediction.risks) {
        println!("  [{:?}] {} ({:+.2})", finding.category, finding.description, finding.impact);
    }
    for rec in &prediction.recommendations {
        println!("  -> {}", rec.text);
    }
    for insight in &metrics.ai_insights {
        println!("  * {}: {}", insight.title, insight.description);
    }
    println!();
}

pub fn print_trade_summary(analysis: &TradeAnalysis) {
    let portfolio = &analysis.portfolio_metrics;
    let summary = &analysis.summary_metrics;

    println!("\n--- Trades ---");
    println!("{:<16} {:>10}", "Total trades", portfolio.total_trades);
    println!("{:<16} {:>10}", "Open positions", summary.active_positions);
    println!("{:<16} {:>9.2}%", "Win rate", portfolio.win_rate);
    println!("{:<16} {:>9.2}%", "Average ROI", portfolio.average_roi);
    println!("{:<16} {:>10.2}", "Sharpe", portfolio.sharpe_ratio);
    println!("{:<16} {:>10}", "Total PnL", summary.total_pnl);
    if let Some(win) = &summary.biggest_win {
        println!("{:<16} {:>10} ({})", "Biggest win", win.pnl_or_zero(), win.token);
    }
    println!();
}
