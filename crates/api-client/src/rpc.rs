// In crates/api-client/src/rpc.rs

use crate::helius::LAMPORTS_PER_SOL;
use crate::retry::{read_json, RetryPolicy};
use crate::types::{RpcRequest, RpcResponse, RpcValue};
use crate::{Error, Result};
use app_config::HeliusSettings;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::json;

const SERVICE: &str = "solana-rpc";
const KEY_PLACEHOLDER: &str = "{api_key}";

/// Minimal Solana JSON-RPC client.
#[derive(Debug, Clone)]
pub struct RpcClient {
    http_client: Client,
    url: std::result::Result<String, &'static str>,
    retry: RetryPolicy,
}

impl RpcClient {
    pub fn new(http_client: Client, settings: &HeliusSettings, retry: RetryPolicy) -> Self {
        let url = if !settings.rpc_url.contains(KEY_PLACEHOLDER) {
            Ok(settings.rpc_url.clone())
        } else if settings.api_key.is_empty() {
            Err("helius")
        } else {
            Ok(settings.rpc_url.replace(KEY_PLACEHOLDER, &settings.api_key))
        };
        Self { http_client, url, retry }
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: serde_json::Value) -> Result<T> {
        let url = self.url.as_ref().map_err(|service| Error::MissingApiKey(*service))?;
        let request = RpcRequest { jsonrpc: "2.0", id: 1, method, params };

        let response: RpcResponse<T> = self
            .retry
            .run(method, || async {
                let response = self.http_client.post(url).json(&request).send().await?;
                read_json(SERVICE, response).await
            })
            .await?;

        if let Some(error) = response.error {
            return Err(Error::ApiError { code: error.code, msg: error.message });
        }
        response.result.ok_or_else(|| Error::ApiError {
            code: -1,
            msg: format!("{} returned no result", method),
        })
    }

    /// Native SOL balance of `address`.
    pub async fn get_balance(&self, address: &str) -> Result<f64> {
        let lamports: RpcValue<u64> = self.call("getBalance", json!([address])).await?;
        Ok(lamports.value as f64 / LAMPORTS_PER_SOL)
    }
}
