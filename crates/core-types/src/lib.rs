// In crates/core-types/src/lib.rs

pub mod error;
pub mod lenient;
pub mod types;

// Re-export the most important types for easy access from other crates.
pub use error::{Error, Result};
pub use types::{
    DuneExecution, DuneQueryResult, ExecutionStatus, SwapEvent, TokenBalance, TokenRow,
    TokenTransfer, TransferDirection, TxStatus, WalletAddress, WalletBalance, WalletTransaction,
    WRAPPED_SOL_MINT,
};
