// In crates/analytics/src/types.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeStatus {
    Open,
    Closed,
}

/// The buy side of a position, taken from the row's "initial buy" columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeEntry {
    pub price: Decimal,
    pub amount: Decimal,
    pub timestamp: Option<DateTime<Utc>>,
    pub total_cost: Decimal,
}

/// The sell side of a position. Only present once a sell has been recorded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeExit {
    pub price: Decimal,
    pub amount: Decimal,
    pub timestamp: Option<DateTime<Utc>>,
    pub total_return: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeMetrics {
    pub pnl: Option<Decimal>,
    /// Percent, e.g. `50.0` for +50 %.
    pub roi: Option<f64>,
    pub holding_time_hours: Option<f64>,
    /// Percent price change from the initial buy to the latest price.
    /// Not a running peak-to-trough figure.
    pub max_drawdown: Option<f64>,
}

/// One token position derived from a single query row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub token: String,
    pub entry: TradeEntry,
    pub exit: Option<TradeExit>,
    pub metrics: TradeMetrics,
    pub status: TradeStatus,
}

impl Trade {
    pub fn is_closed(&self) -> bool {
        self.status == TradeStatus::Closed
    }

    pub fn pnl_or_zero(&self) -> Decimal {
        self.metrics.pnl.unwrap_or_default()
    }

    pub fn roi_or_zero(&self) -> f64 {
        self.metrics.roi.unwrap_or(0.0)
    }
}

/// Portfolio-wide figures. Percentages are expressed x100.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    pub total_trades: u32,
    pub win_rate: f64,
    pub average_roi: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMetrics {
    pub total_trades: u32,
    pub win_rate: f64,
    #[serde(rename = "totalPnL")]
    pub total_pnl: Decimal,
    pub active_positions: u32,
    pub avg_holding_time: f64,
    pub biggest_win: Option<Trade>,
    pub biggest_loss: Option<Trade>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PnlColor {
    Green,
    Red,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PnlPoint {
    pub token: String,
    pub pnl: f64,
    pub color: PnlColor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionPoint {
    pub token: String,
    pub size: f64,
    pub roi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBucket {
    pub window: String,
    pub max_hours: f64,
    pub trades: u32,
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedMetric {
    pub name: String,
    pub value: f64,
}

/// Chart-ready views over the trade list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub pnl_distribution: Vec<PnlPoint>,
    pub position_size_vs_returns: Vec<PositionPoint>,
    pub time_analysis: Vec<TimeBucket>,
    pub risk_metrics: Vec<NamedMetric>,
}

/// Everything the trade view needs, computed from one query result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeAnalysis {
    pub trades: Vec<Trade>,
    pub portfolio_metrics: PortfolioMetrics,
    pub summary_metrics: SummaryMetrics,
    pub chart_data: ChartData,
}
