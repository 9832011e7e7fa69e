pub mod gecko;

use async_trait::async_trait;
use thiserror::Error;
use crate::models::{Network, PoolRow};

/// Upstream market-data provider.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// All networks the provider supports.
    async fn list_networks(&self) -> Result<Vec<Network>, SourceError>;

    /// Top pools on `network_id`. The id is passed through unchecked.
    async fn list_top_pools(&self, network_id: &str) -> Result<Vec<PoolRow>, SourceError>;

    /// Top pools on `network_id` that involve `token_address`.
    async fn list_top_pools_for_token(
        &self,
        network_id: &str,
        token_address: &str,
    ) -> Result<Vec<PoolRow>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Rate limited")]
    RateLimit,

    #[error("Upstream returned HTTP {status} for {url}")]
    Status { status: u16, url: String },
}
