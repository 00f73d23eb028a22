//! Provider abstraction for fetching dashboard data from external APIs

use crate::{
    error::ProviderError,
    types::{CoinDetail, MarketChart, MarketRecord, MarketsQuery, UserProfile},
};
use async_trait::async_trait;

/// Trait for market data providers
///
/// Implementations fetch listings, coin details and price history from a
/// CoinGecko-compatible source.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetches one page of the market listing
    ///
    /// # Arguments
    /// * `query` - Currency, ordering and paging parameters
    ///
    /// # Returns
    /// The records in upstream order, or an error if the request fails
    async fn fetch_markets(&self, query: &MarketsQuery)
        -> Result<Vec<MarketRecord>, ProviderError>;

    /// Fetches the full detail payload for one coin
    async fn fetch_coin_detail(&self, coin_id: &str) -> Result<CoinDetail, ProviderError>;

    /// Fetches the price history of one coin over the last `days` days
    async fn fetch_market_chart(
        &self,
        coin_id: &str,
        days: u32,
    ) -> Result<MarketChart, ProviderError>;

    /// Returns the name of this provider
    fn provider_name(&self) -> &'static str;
}

/// Trait for the decorative user profile source
#[async_trait]
pub trait ProfileProvider: Send + Sync {
    /// Fetches a single profile
    async fn fetch_profile(&self) -> Result<UserProfile, ProviderError>;

    /// Returns the name of this provider
    fn provider_name(&self) -> &'static str;
}
