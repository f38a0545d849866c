// In crates/api-client/src/source.rs

use crate::helius::{map_transaction, HeliusClient};
use crate::rpc::RpcClient;
use crate::Result;
use async_trait::async_trait;
use core_types::{WalletAddress, WalletBalance, WalletTransaction};

/// Where wallet activity and holdings come from.
#[async_trait]
pub trait WalletDataSource: Send + Sync {
    async fn fetch_transactions(&self, address: &WalletAddress) -> Result<Vec<WalletTransaction>>;

    async fn fetch_balance(&self, address: &WalletAddress) -> Result<WalletBalance>;
}

/// Helius for parsed history and token holdings, JSON-RPC for the SOL balance.
#[derive(Debug, Clone)]
pub struct LiveDataSource {
    helius: HeliusClient,
    rpc: RpcClient,
}

impl LiveDataSource {
    pub fn new(helius: HeliusClient, rpc: RpcClient) -> Self {
        Self { helius, rpc }
    }
}

#[async_trait]
impl WalletDataSource for LiveDataSource {
    async fn fetch_transactions(&self, address: &WalletAddress) -> Result<Vec<WalletTransaction>> {
        let raw = self.helius.get_transactions(&address.0).await?;
        Ok(raw.iter().map(|tx| map_transaction(&address.0, tx)).collect())
    }

    async fn fetch_balance(&self, address: &WalletAddress) -> Result<WalletBalance> {
        let (tokens, sol) = futures::try_join!(
            self.helius.get_token_balances(&address.0),
            self.rpc.get_balance(&address.0),
        )?;
        Ok(WalletBalance { sol, tokens })
    }
}
