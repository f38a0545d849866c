// In crates/api-client/src/dune.rs

use crate::retry::{read_json, RetryPolicy};
use crate::{Error, Result};
use app_config::DuneSettings;
use async_trait::async_trait;
use core_types::{DuneExecution, ExecutionStatus};
use reqwest::Client;
use serde_json::json;
use tracing::info;

const SERVICE: &str = "dune";
const API_KEY_HEADER: &str = "X-Dune-API-Key";

/// Runs the per-token trade query for a wallet and reports on its executions.
#[async_trait]
pub trait QueryRunner: Send + Sync {
    /// Queues a new execution with `wallet` bound as the query parameter.
    async fn execute(&self, wallet: &str) -> Result<DuneExecution>;

    /// Current state of an execution, with rows once it has finished.
    async fn results(&self, execution_id: &str) -> Result<ExecutionStatus>;
}

#[derive(Debug, Clone)]
pub struct DuneClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    query_id: u64,
    retry: RetryPolicy,
}

impl DuneClient {
    pub fn new(http_client: Client, settings: &DuneSettings, retry: RetryPolicy) -> Self {
        Self {
            http_client,
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            query_id: settings.query_id,
            retry,
        }
    }

    fn key(&self) -> Result<&str> {
        if self.api_key.is_empty() {
            return Err(Error::MissingApiKey(SERVICE));
        }
        Ok(&self.api_key)
    }
}

#[async_trait]
impl QueryRunner for DuneClient {
    /// This corresponds to `POST /query/{query_id}/execute`.
    async fn execute(&self, wallet: &str) -> Result<DuneExecution> {
        let key = self.key()?;
        let url = format!("{}/query/{}/execute", self.base_url, self.query_id);
        let body = json!({ "query_parameters": { "wallet": wallet } });

        let execution: DuneExecution = self
            .retry
            .run("dune.execute", || async {
                let response = self
                    .http_client
                    .post(&url)
                    .header(API_KEY_HEADER, key)
                    .json(&body)
                    .send()
                    .await?;
                read_json(SERVICE, response).await
            })
            .await?;

        info!(wallet, execution_id = %execution.execution_id, state = %execution.state, "Queued trade query");
        Ok(execution)
    }

    /// This corresponds to `GET /execution/{execution_id}/results`.
    async fn results(&self, execution_id: &str) -> Result<ExecutionStatus> {
        let key = self.key()?;
        let url = format!("{}/execution/{}/results", self.base_url, execution_id);

        self.retry
            .run("dune.results", || async {
                let response = self.http_client.get(&url).header(API_KEY_HEADER, key).send().await?;
                read_json(SERVICE, response).await
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_finished_execution_with_rows() {
        let raw = r#"{
            "execution_id": "01HXYZ",
            "query_id": 4150130,
            "is_execution_finished": true,
            "state": "QUERY_STATE_COMPLETED",
            "result": {
                "rows": [{ "token_address": "<a href=\"x\">WIF</a>", "buy": 100, "sell": "150.5", "total_pnl": 50.5 }],
                "metadata": { "row_count": 1 }
            }
        }"#;
        let status: ExecutionStatus = serde_json::from_str(raw).unwrap();
        assert!(status.is_execution_finished);
        let rows = status.result.unwrap().rows;
        assert_eq!(rows.len(), 1);
        assert!(rows[0].sell.is_some());
    }

    #[test]
    fn decodes_pending_execution_without_result() {
        let raw = r#"{"execution_id":"01HXYZ","is_execution_finished":false,"state":"QUERY_STATE_EXECUTING"}"#;
        let status: ExecutionStatus = serde_json::from_str(raw).unwrap();
        assert!(status.result.is_none());
        assert_eq!(status.state, "QUERY_STATE_EXECUTING");
    }

    #[tokio::test]
    async fn execute_requires_api_key() {
        let settings = DuneSettings { api_key: String::new(), base_url: "http://127.0.0.1:9".into(), query_id: 1 };
        let client = DuneClient::new(Client::new(), &settings, RetryPolicy::none());
        assert!(matches!(client.execute("w").await, Err(Error::MissingApiKey("dune"))));
    }
}
