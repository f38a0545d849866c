// In crates/app-config/src/types.rs

use crate::{Error, Result};
use serde::Deserialize;
use std::time::Duration;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    pub server: ServerSettings,
    /// Parsed-transaction and balance API.
    pub helius: HeliusSettings,
    /// Per-token trade query API.
    pub dune: DuneSettings,
    #[serde(default = "default_openai")]
    pub openai: LlmSettings,
    #[serde(default = "default_gemini")]
    pub gemini: LlmSettings,
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default)]
    pub retry: RetrySettings,
}

impl Settings {
    /// Catches values that deserialize fine but can never work.
    pub fn validate(&self) -> Result<()> {
        if self.analysis.timeout_secs == 0 {
            return Err(Error::Invalid("analysis.timeout_secs must be greater than zero".into()));
        }
        if self.retry.max_attempts == 0 {
            return Err(Error::Invalid("retry.max_attempts must be at least 1".into()));
        }
        Ok(())
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Debug, Clone)]
pub struct HeliusSettings {
    /// May be empty; requests then fail with a missing-key error.
    #[serde(default)]
    pub api_key: String,
    pub base_url: String,
    /// Solana JSON-RPC endpoint. `{api_key}` is substituted when present.
    pub rpc_url: String,
    #[serde(default = "default_transaction_limit")]
    pub transaction_limit: u32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct DuneSettings {
    #[serde(default)]
    pub api_key: String,
    pub base_url: String,
    /// The saved query that returns one row per token for a `wallet` parameter.
    pub query_id: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct LlmSettings {
    #[serde(default)]
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InsightProvider {
    #[default]
    Openai,
    Gemini,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AnalysisSettings {
    /// Upper bound for one wallet analysis, fetches included.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Lifetime of cached wallet metrics; 0 disables the cache.
    #[serde(default)]
    pub cache_ttl_secs: u64,
    #[serde(default)]
    pub insight_provider: InsightProvider,
}

impl AnalysisSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            cache_ttl_secs: 0,
            insight_provider: InsightProvider::default(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct RetrySettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Fixed pause between attempts.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl RetrySettings {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_ms: default_delay_ms(),
        }
    }
}

/// Helper functions for serde defaults
fn default_transaction_limit() -> u32 { 100 }
fn default_timeout_secs() -> u64 { 45 }
fn default_max_attempts() -> u32 { 3 }
fn default_delay_ms() -> u64 { 1_000 }

fn default_openai() -> LlmSettings {
    LlmSettings {
        api_key: String::new(),
        base_url: "https://api.openai.com/v1".into(),
        model: "gpt-4o-mini".into(),
    }
}

fn default_gemini() -> LlmSettings {
    LlmSettings {
        api_key: String::new(),
        base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
        model: "gemini-1.5-flash".into(),
    }
}
