// In crates/api-client/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No API key configured for {0}")]
    MissingApiKey(&'static str),
    #[error("{0} rate limit exceeded")]
    RateLimited(&'static str),
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(#[from] serde_json::Error),
    #[error("API error: code {code}, msg: {msg}")]
    ApiError { code: i64, msg: String },
}

impl Error {
    /// Rate limits, server-side failures and transport errors are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::RateLimited(_) => true,
            Error::Http { status, .. } => *status >= 500,
            Error::RequestFailed(e) => !e.is_decode() && !e.is_builder(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
