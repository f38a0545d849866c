// In crates/engine/src/trades.rs

use crate::Result;
use analytics::{transform_dune_data, TradeAnalysis};
use api_client::QueryRunner;
use chrono::{DateTime, Utc};
use core_types::{DuneExecution, ExecutionStatus, WalletAddress};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Poll response: the raw execution status plus the trade view once rows are in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskReport {
    #[serde(flatten)]
    pub status: ExecutionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<TradeAnalysis>,
}

/// The query path: queue a per-token trade query, then poll it to completion.
pub struct TradeAnalysisService {
    runner: Arc<dyn QueryRunner>,
}

impl TradeAnalysisService {
    pub fn new(runner: Arc<dyn QueryRunner>) -> Self {
        Self { runner }
    }

    pub async fn queue(&self, raw_address: &str) -> Result<DuneExecution> {
        let address = WalletAddress::parse(raw_address)?;
        let execution = self.runner.execute(&address.0).await?;
        info!(address = %address, execution_id = %execution.execution_id, "Trade analysis queued");
        Ok(execution)
    }

    pub async fn poll(&self, execution_id: &str) -> Result<TaskReport> {
        self.poll_at(execution_id, Utc::now()).await
    }

    pub async fn poll_at(&self, execution_id: &str, now: DateTime<Utc>) -> Result<TaskReport> {
        let status = self.runner.results(execution_id).await?;
        let analysis = status.result.as_ref().map(|result| transform_dune_data(result, now));
        debug!(
            execution_id,
            state = %status.state,
            trades = ?analysis.as_ref().map(|a| a.trades.len()),
            "Polled trade analysis"
        );
        Ok(TaskReport { status, analysis })
    }
}
