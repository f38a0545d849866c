// In crates/wallet-metrics/src/lib.rs

pub mod builder;
pub mod stats;
pub mod types;

pub use builder::WalletMetricsBuilder;
pub use types::*;
