// In crates/analytics/src/engine.rs

use crate::normalizer;
use crate::types::{
    ChartData, NamedMetric, PnlColor, PnlPoint, PortfolioMetrics, PositionPoint, SummaryMetrics,
    TimeBucket, Trade, TradeAnalysis,
};
use chrono::{DateTime, Utc};
use core_types::{DuneQueryResult, TokenRow};
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

/// Holding-time windows used by the time analysis chart, as (label, max hours).
pub const HOLDING_WINDOWS: [(&str, f64); 3] = [("24h", 24.0), ("7d", 168.0), ("30d", 720.0)];

/// The engine responsible for folding normalised trades into portfolio metrics.
///
/// Each view is an independent pure pass over the same slice of trades.
#[derive(Default)]
pub struct AnalyticsEngine;

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalises the rows and computes every view in one go.
    pub fn analyze_rows(&self, rows: &[TokenRow], now: DateTime<Utc>) -> TradeAnalysis {
        let trades = normalizer::normalize_rows(rows, now);
        tracing::debug!(trades = trades.len(), "Normalised token rows into trades.");

        TradeAnalysis {
            portfolio_metrics: self.portfolio_metrics(&trades),
            summary_metrics: self.summary_metrics(&trades),
            chart_data: self.chart_data(&trades),
            trades,
        }
    }

    /// Calculates the portfolio-level metrics.
    pub fn portfolio_metrics(&self, trades: &[Trade]) -> PortfolioMetrics {
        let mut metrics = PortfolioMetrics {
            total_trades: trades.len() as u32,
            ..PortfolioMetrics::default()
        };
        if trades.is_empty() {
            return metrics;
        }

        // 1. Win rate & average ROI over closed positions only.
        let closed: Vec<&Trade> = trades.iter().filter(|t| t.is_closed()).collect();
        metrics.win_rate = win_rate(&closed);
        if !closed.is_empty() {
            metrics.average_roi =
                closed.iter().map(|t| t.roi_or_zero()).sum::<f64>() / closed.len() as f64;
        }

        // 2. Sharpe ratio over every trade's ROI (population standard deviation).
        let returns: Vec<f64> = trades.iter().map(Trade::roi_or_zero).collect();
        metrics.sharpe_ratio = sharpe_ratio(&returns);

        // 3. Portfolio drawdown is the worst per-trade figure.
        metrics.max_drawdown = trades
            .iter()
            .map(|t| t.metrics.max_drawdown.unwrap_or(0.0))
            .fold(f64::INFINITY, f64::min);

        metrics
    }

    /// Calculates the headline numbers shown above the trade table.
    pub fn summary_metrics(&self, trades: &[Trade]) -> SummaryMetrics {
        let closed: Vec<&Trade> = trades.iter().filter(|t| t.is_closed()).collect();
        let total_pnl: Decimal = trades.iter().map(Trade::pnl_or_zero).sum();

        let avg_holding_time = if trades.is_empty() {
            0.0
        } else {
            trades
                .iter()
                .map(|t| t.metrics.holding_time_hours.unwrap_or(0.0))
                .sum::<f64>()
                / trades.len() as f64
        };

        // Stable sort keeps row order among equal P&L.
        let mut by_pnl: Vec<&Trade> = trades.iter().collect();
        by_pnl.sort_by(|a, b| b.pnl_or_zero().cmp(&a.pnl_or_zero()));

        SummaryMetrics {
            total_trades: trades.len() as u32,
            win_rate: win_rate(&closed),
            total_pnl,
            active_positions: (trades.len() - closed.len()) as u32,
            avg_holding_time,
            biggest_win: by_pnl.first().map(|t| (*t).clone()),
            biggest_loss: by_pnl.last().map(|t| (*t).clone()),
        }
    }

    /// Builds the chart series.
    pub fn chart_data(&self, trades: &[Trade]) -> ChartData {
        let pnl_distribution = trades
            .iter()
            .map(|t| {
                let pnl = t.pnl_or_zero();
                PnlPoint {
                    token: t.token.clone(),
                    pnl: pnl.to_f64().unwrap_or(0.0),
                    color: if pnl > dec!(0) { PnlColor::Green } else { PnlColor::Red },
                }
            })
            .collect();

        let position_size_vs_returns = trades
            .iter()
            .map(|t| PositionPoint {
                token: t.token.clone(),
                size: t.entry.total_cost.to_f64().unwrap_or(0.0),
                roi: t.roi_or_zero(),
            })
            .collect();

        let time_analysis = HOLDING_WINDOWS
            .iter()
            .map(|(label, max_hours)| {
                let in_window: Vec<&Trade> = trades
                    .iter()
                    .filter(|t| t.metrics.holding_time_hours.is_some_and(|h| h <= *max_hours))
                    .collect();
                TimeBucket {
                    window: label.to_string(),
                    max_hours: *max_hours,
                    trades: in_window.len() as u32,
                    win_rate: win_rate(&in_window),
                }
            })
            .collect();

        let portfolio = self.portfolio_metrics(trades);
        let risk_metrics = vec![
            NamedMetric { name: "Sharpe Ratio".into(), value: portfolio.sharpe_ratio },
            NamedMetric { name: "Max Drawdown".into(), value: portfolio.max_drawdown },
            NamedMetric { name: "Win Rate".into(), value: portfolio.win_rate },
        ];

        ChartData {
            pnl_distribution,
            position_size_vs_returns,
            time_analysis,
            risk_metrics,
        }
    }
}

/// Converts a finished query result into the trade view.
pub fn transform_dune_data(result: &DuneQueryResult, now: DateTime<Utc>) -> TradeAnalysis {
    AnalyticsEngine::new().analyze_rows(&result.rows, now)
}

/// Share of trades with positive P&L, x100. Zero for an empty slice.
fn win_rate(trades: &[&Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let wins = trades.iter().filter(|t| t.pnl_or_zero() > dec!(0)).count();
    (wins as f64 / trades.len() as f64) * 100.0
}

/// Mean over population standard deviation; zero when undefined.
fn sharpe_ratio(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / returns.len() as f64;
    let std_dev = variance.sqrt();
    if std_dev > 0.0 && std_dev.is_finite() {
        mean / std_dev
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TradeStatus;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap()
    }

    fn row(name: &str, buy: i64, sell: Option<i64>, pnl: Option<i64>, hours_ago: i64) -> TokenRow {
        TokenRow {
            token_address: Some(format!(">{}<", name)),
            buy: Some(Decimal::from(buy)),
            sell: sell.map(Decimal::from),
            total_pnl: pnl.map(Decimal::from),
            initial_buy_price: Some(dec!(1)),
            latest_price: Some(dec!(1)),
            latest_block_time: Some(now() - chrono::Duration::hours(hours_ago)),
            ..Default::default()
        }
    }

    #[test]
    fn empty_result_produces_zeroed_metrics() {
        let result: DuneQueryResult = serde_json::from_value(json!({ "rows": [] })).unwrap();
        let analysis = transform_dune_data(&result, now());

        assert!(analysis.trades.is_empty());
        assert_eq!(analysis.portfolio_metrics, PortfolioMetrics::default());
        assert_eq!(analysis.summary_metrics.total_pnl, dec!(0));
        assert!(analysis.summary_metrics.biggest_win.is_none());
        assert!(analysis.chart_data.time_analysis.iter().all(|b| b.win_rate == 0.0));
    }

    #[test]
    fn single_closed_winner() {
        let result: DuneQueryResult = serde_json::from_value(json!({
            "rows": [{
                "token_address": ">FOO<",
                "buy": 100,
                "sell": 50,
                "total_pnl": 50,
                "initial_buy_price": 1,
                "latest_price": 1.5,
                "latest_block_time": "2024-03-09 00:00:00.000 UTC"
            }]
        }))
        .unwrap();
        let analysis = transform_dune_data(&result, now());

        let trade = &analysis.trades[0];
        assert_eq!(trade.token, "FOO");
        assert_eq!(trade.status, TradeStatus::Closed);
        assert_eq!(trade.metrics.roi, Some(50.0));
        assert_eq!(trade.metrics.max_drawdown, Some(50.0));
        assert_eq!(analysis.portfolio_metrics.win_rate, 100.0);
        assert_eq!(analysis.portfolio_metrics.max_drawdown, 50.0);
        // A single trade has zero dispersion.
        assert_eq!(analysis.portfolio_metrics.sharpe_ratio, 0.0);

        let summary = &analysis.summary_metrics;
        assert_eq!(summary.biggest_win, summary.biggest_loss);
    }

    #[test]
    fn single_open_trade_without_pnl() {
        let analysis = AnalyticsEngine::new().analyze_rows(&[row("BAR", 10, None, None, 1)], now());

        assert_eq!(analysis.trades[0].status, TradeStatus::Open);
        assert_eq!(analysis.trades[0].metrics.roi, None);
        assert_eq!(analysis.summary_metrics.active_positions, 1);
        assert_eq!(analysis.summary_metrics.total_pnl, dec!(0));
        assert_eq!(analysis.portfolio_metrics.win_rate, 0.0);
        assert_eq!(analysis.portfolio_metrics.average_roi, 0.0);
    }

    #[test]
    fn mixed_portfolio() {
        let rows = vec![
            row("A", 100, Some(150), Some(50), 10),   // win, roi 50
            row("B", 100, Some(80), Some(-20), 100),  // loss, roi -20
            row("C", 200, None, Some(30), 500),       // open, roi 15
            row("D", 50, Some(60), Some(10), 1000),   // win, roi 20
        ];
        let engine = AnalyticsEngine::new();
        let analysis = engine.analyze_rows(&rows, now());

        let portfolio = &analysis.portfolio_metrics;
        assert_eq!(portfolio.total_trades, 4);
        assert!((portfolio.win_rate - 200.0 / 3.0).abs() < 1e-9);
        assert!((portfolio.average_roi - 50.0 / 3.0).abs() < 1e-9);

        let rois = [50.0, -20.0, 15.0, 20.0];
        let mean = rois.iter().sum::<f64>() / 4.0;
        let sd = (rois.iter().map(|r: &f64| (r - mean).powi(2)).sum::<f64>() / 4.0).sqrt();
        assert!((portfolio.sharpe_ratio - mean / sd).abs() < 1e-9);

        let summary = &analysis.summary_metrics;
        assert_eq!(summary.active_positions, 1);
        assert_eq!(summary.active_positions + 3, summary.total_trades);
        assert_eq!(summary.total_pnl, dec!(70));
        assert_eq!(summary.biggest_win.as_ref().map(|t| t.token.as_str()), Some("A"));
        assert_eq!(summary.biggest_loss.as_ref().map(|t| t.token.as_str()), Some("B"));
        assert!((summary.avg_holding_time - 402.5).abs() < 1e-9);

        let buckets = &analysis.chart_data.time_analysis;
        assert_eq!(buckets[0].trades, 1);
        assert_eq!(buckets[0].win_rate, 100.0);
        assert_eq!(buckets[1].trades, 2);
        assert_eq!(buckets[1].win_rate, 50.0);
        assert_eq!(buckets[2].trades, 3);
        assert!((buckets[2].win_rate - 200.0 / 3.0).abs() < 1e-9);

        let colors: Vec<PnlColor> = analysis.chart_data.pnl_distribution.iter().map(|p| p.color).collect();
        assert_eq!(colors, vec![PnlColor::Green, PnlColor::Red, PnlColor::Green, PnlColor::Green]);
    }

    #[test]
    fn identical_returns_give_zero_sharpe() {
        let rows = vec![row("A", 100, Some(110), Some(10), 1), row("B", 100, Some(110), Some(10), 1)];
        let metrics = AnalyticsEngine::new().portfolio_metrics(&normalizer::normalize_rows(&rows, now()));
        assert_eq!(metrics.sharpe_ratio, 0.0);
        assert_eq!(metrics.win_rate, 100.0);
    }

    #[test]
    fn portfolio_drawdown_is_the_minimum_per_trade_value() {
        let mut loser = row("L", 100, Some(40), Some(-60), 1);
        loser.latest_price = Some(dec!(0.4));
        let mut unknown = row("U", 100, None, None, 1);
        unknown.latest_price = None;

        let trades = normalizer::normalize_rows(&[loser, unknown], now());
        let metrics = AnalyticsEngine::new().portfolio_metrics(&trades);
        assert_eq!(metrics.max_drawdown, -60.0);
    }

    #[test]
    fn serialises_with_the_expected_field_names() {
        let analysis = AnalyticsEngine::new().analyze_rows(&[row("A", 100, Some(150), Some(50), 1)], now());
        let value = serde_json::to_value(&analysis).unwrap();

        assert_eq!(value["trades"][0]["status"], "CLOSED");
        assert_eq!(value["trades"][0]["entry"]["total_cost"], 100.0);
        assert_eq!(value["portfolio_metrics"]["win_rate"], 100.0);
        assert_eq!(value["summary_metrics"]["totalPnL"], 50.0);
        assert_eq!(value["summary_metrics"]["activePositions"], 0);
        assert!(value["chart_data"]["positionSizeVsReturns"].is_array());
        assert_eq!(value["chart_data"]["pnlDistribution"][0]["color"], "green");
    }
}
