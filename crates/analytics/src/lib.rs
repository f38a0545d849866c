// In crates/analytics/src/lib.rs

pub mod engine;
pub mod normalizer;
pub mod types;

pub use engine::{AnalyticsEngine, transform_dune_data};
pub use normalizer::{extract_token_name, normalize_row, normalize_rows};
pub use types::{ChartData, PortfolioMetrics, SummaryMetrics, Trade, TradeAnalysis, TradeStatus};
