// In crates/web-server/src/types.rs

use core_types::DuneExecution;
use engine::TaskReport;
use serde::{Deserialize, Serialize};
use wallet_metrics::{AiInsight, DetailedMetrics};

/// `?address=` on the wallet analysis route.
#[derive(Debug, Deserialize)]
pub struct AddressQuery {
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct AddressBody {
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct InsightsRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub metrics: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct WalletAnalysisResponse {
    pub metrics: DetailedMetrics,
    /// Unix milliseconds.
    pub timestamp: i64,
    pub status: &'static str,
}

/// `{ success: true, data: ... }` envelope used by the trade routes.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data }
    }
}

pub type QueuedResponse = Envelope<DuneExecution>;
pub type TaskResponse = Envelope<TaskReport>;

#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub insights: Vec<AiInsight>,
}
