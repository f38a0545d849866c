// In crates/api-client/src/lib.rs

use app_config::Settings;
use reqwest::Client;
use std::time::Duration;

pub mod dune;
pub mod error;
pub mod helius;
pub mod llm;
pub mod retry;
pub mod rpc;
pub mod source;
pub mod types;

// Re-export public types
pub use dune::{DuneClient, QueryRunner};
pub use error::{Error, Result};
pub use helius::HeliusClient;
pub use llm::{GeminiClient, LanguageModel, OpenAiClient};
pub use retry::RetryPolicy;
pub use rpc::RpcClient;
pub use source::{LiveDataSource, WalletDataSource};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Every outbound client, sharing one connection pool and retry policy.
#[derive(Debug, Clone)]
pub struct ApiClients {
    pub wallet: LiveDataSource,
    pub dune: DuneClient,
    pub openai: OpenAiClient,
    pub gemini: GeminiClient,
}

impl ApiClients {
    pub fn new(settings: &Settings) -> Result<Self> {
        let http_client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let retry = RetryPolicy::from(&settings.retry);

        let helius = HeliusClient::new(http_client.clone(), &settings.helius, retry);
        let rpc = RpcClient::new(http_client.clone(), &settings.helius, retry);

        Ok(Self {
            wallet: LiveDataSource::new(helius, rpc),
            dune: DuneClient::new(http_client.clone(), &settings.dune, retry),
            openai: OpenAiClient::new(http_client.clone(), &settings.openai, retry),
            gemini: GeminiClient::new(http_client, &settings.gemini, retry),
        })
    }
}
