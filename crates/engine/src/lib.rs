// In crates/engine/src/lib.rs

pub mod error;
pub mod insights;
pub mod trades;
pub mod wallet;

pub use error::{Error, Result};
pub use insights::InsightFormatter;
pub use trades::{TaskReport, TradeAnalysisService};
pub use wallet::WalletAnalysisService;

use api_client::{ApiClients, LanguageModel};
use app_config::{InsightProvider, Settings};
use rules::RuleSet;
use std::sync::Arc;
use std::time::Duration;

/// The three request flows, wired to live clients.
pub struct Engine {
    pub wallet: WalletAnalysisService,
    pub trades: TradeAnalysisService,
    pub insights: InsightFormatter,
}

impl Engine {
    pub fn new(
        wallet: WalletAnalysisService,
        trades: TradeAnalysisService,
        insights: InsightFormatter,
    ) -> Self {
        Self { wallet, trades, insights }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        tracing::info!(
            environment = %settings.app.environment,
            provider = ?settings.analysis.insight_provider,
            "Initializing analysis engine..."
        );

        let clients = ApiClients::new(settings)?;
        let rules = Arc::new(RuleSet::with_default_rules()?);

        let wallet = WalletAnalysisService::new(
            Arc::new(clients.wallet),
            rules,
            settings.analysis.timeout(),
        )
        .with_cache(Duration::from_secs(settings.analysis.cache_ttl_secs));

        let model: Arc<dyn LanguageModel> = match settings.analysis.insight_provider {
            InsightProvider::Openai => Arc::new(clients.openai),
            InsightProvider::Gemini => Arc::new(clients.gemini),
        };

        Ok(Self::new(
            wallet,
            TradeAnalysisService::new(Arc::new(clients.dune)),
            InsightFormatter::new(model),
        ))
    }
}
