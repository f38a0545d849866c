// In crates/engine/src/wallet.rs

use crate::{Error, Result};
use api_client::WalletDataSource;
use chrono::{DateTime, Utc};
use core_types::WalletAddress;
use rules::MetricsAnalyzer;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};
use wallet_metrics::{DetailedMetrics, WalletMetricsBuilder};

/// The live path: fetch activity and holdings, fold them into metrics, score them.
pub struct WalletAnalysisService {
    source: Arc<dyn WalletDataSource>,
    analyzer: Arc<dyn MetricsAnalyzer>,
    builder: WalletMetricsBuilder,
    timeout: Duration,
    cache: Option<MetricsCache>,
}

impl WalletAnalysisService {
    pub fn new(
        source: Arc<dyn WalletDataSource>,
        analyzer: Arc<dyn MetricsAnalyzer>,
        timeout: Duration,
    ) -> Self {
        Self {
            source,
            analyzer,
            builder: WalletMetricsBuilder::new(),
            timeout,
            cache: None,
        }
    }

    /// Reuses results for the same address within `ttl`-sized time buckets. A zero ttl keeps the cache off.
    pub fn with_cache(mut self, ttl: Duration) -> Self {
        self.cache = MetricsCache::new(ttl);
        self
    }

    pub async fn analyze(&self, raw_address: &str) -> Result<DetailedMetrics> {
        self.analyze_at(raw_address, Utc::now()).await
    }

    pub async fn analyze_at(&self, raw_address: &str, now: DateTime<Utc>) -> Result<DetailedMetrics> {
        let address = WalletAddress::parse(raw_address)?;

        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(&address, now).await {
                debug!(address = %address, "Serving wallet metrics from cache");
                return Ok(hit);
            }
        }

        let fetch = async {
            tokio::try_join!(
                self.source.fetch_transactions(&address),
                self.source.fetch_balance(&address),
            )
        };
        let (transactions, balance) = tokio::time::timeout(self.timeout, fetch)
            .await
            .map_err(|_| Error::Timeout(self.timeout))??;

        if transactions.is_empty() && balance.is_empty() {
            return Err(Error::NoData(address.0));
        }

        let mut metrics = self.builder.build(&transactions, &balance, now);
        let analysis = self.analyzer.analyze(&metrics)?;
        info!(
            address = %address,
            transactions = transactions.len(),
            analyzer = self.analyzer.name(),
            triggered = ?analysis.triggered,
            score = analysis.score,
            "Wallet analysis complete"
        );
        metrics.prediction_metrics = analysis.into();

        if let Some(cache) = &self.cache {
            cache.insert(&address, now, metrics.clone()).await;
        }
        Ok(metrics)
    }
}

/// In-memory results keyed by address and time bucket.
struct MetricsCache {
    ttl_secs: i64,
    entries: RwLock<HashMap<(String, i64), DetailedMetrics>>,
}

impl MetricsCache {
    fn new(ttl: Duration) -> Option<Self> {
        let ttl_secs = i64::try_from(ttl.as_secs()).ok().filter(|secs| *secs > 0)?;
        Some(Self { ttl_secs, entries: RwLock::new(HashMap::new()) })
    }

    fn bucket(&self, now: DateTime<Utc>) -> i64 {
        now.timestamp().div_euclid(self.ttl_secs)
    }

    async fn get(&self, address: &WalletAddress, now: DateTime<Utc>) -> Option<DetailedMetrics> {
        let key = (address.0.clone(), self.bucket(now));
        self.entries.read().await.get(&key).cloned()
    }

    async fn insert(&self, address: &WalletAddress, now: DateTime<Utc>, metrics: DetailedMetrics) {
        let bucket = self.bucket(now);
        let mut entries = self.entries.write().await;
        entries.retain(|(_, b), _| *b == bucket);
        entries.insert((address.0.clone(), bucket), metrics);
    }
}
