// In crates/engine/src/error.rs

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    InvalidAddress(#[from] core_types::Error),

    #[error("No data available for wallet {0}")]
    NoData(String),

    #[error("Analysis timed out after {0:?}")]
    Timeout(Duration),

    #[error("Upstream request failed: {0}")]
    Upstream(#[from] api_client::Error),

    #[error("Rule evaluation failed: {0}")]
    Rules(#[from] rules::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
