//! CoinGecko market data provider implementation

use crate::{
    constants::{
        COINGECKO_API_URL, COINGECKO_COINS_ENDPOINT, COINGECKO_MARKETS_ENDPOINT,
        REQUEST_TIMEOUT_SECS, USER_AGENT, VS_CURRENCY,
    },
    error::ProviderError,
    provider::MarketDataProvider,
    types::{CoinDetail, MarketChart, MarketRecord, MarketsQuery},
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// CoinGecko market data provider
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

impl CoinGeckoProvider {
    /// Creates a new CoinGecko provider against the public API
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_base_url(COINGECKO_API_URL, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    /// Creates a provider against a CoinGecko-compatible base URL
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(ProviderError::NetworkError)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// `/coins/markets?vs_currency=usd&order=market_cap_desc&per_page=n&page=p`
    fn markets_url(&self, query: &MarketsQuery) -> String {
        format!(
            "{}{}?{}",
            self.base_url,
            COINGECKO_MARKETS_ENDPOINT,
            query.to_query_string()
        )
    }

    /// `/coins/{id}`
    fn detail_url(&self, coin_id: &str) -> String {
        format!("{}{}/{}", self.base_url, COINGECKO_COINS_ENDPOINT, coin_id)
    }

    /// `/coins/{id}/market_chart?vs_currency=usd&days=n`
    fn chart_url(&self, coin_id: &str, days: u32) -> String {
        format!(
            "{}{}/{}/market_chart?vs_currency={}&days={}",
            self.base_url, COINGECKO_COINS_ENDPOINT, coin_id, VS_CURRENCY, days
        )
    }

    /// Issues a GET and decodes the JSON body
    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T, ProviderError> {
        tracing::debug!(url = %url, "Fetching {} from CoinGecko", what);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ProviderError::NetworkError)?;

        let status = response.status();

        // Check for rate limiting
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimitExceeded);
        }

        if status == StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound(what.to_string()));
        }

        // Check for other errors
        if !status.is_success() {
            return Err(ProviderError::api(format!(
                "HTTP {}: {}",
                status,
                response.text().await.unwrap_or_default()
            )));
        }

        let response_text = response.text().await.map_err(ProviderError::NetworkError)?;

        parse_body(&response_text, what)
    }
}

/// Decodes a CoinGecko body, keeping a prefix of the payload for diagnosis
fn parse_body<T: DeserializeOwned>(body: &str, what: &str) -> Result<T, ProviderError> {
    serde_json::from_str(body).map_err(|e| {
        let snippet: String = body.chars().take(200).collect();
        ProviderError::invalid_response(format!(
            "Failed to parse CoinGecko {}: {}. Response: {}",
            what, e, snippet
        ))
    })
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    async fn fetch_markets(
        &self,
        query: &MarketsQuery,
    ) -> Result<Vec<MarketRecord>, ProviderError> {
        let url = self.markets_url(query);
        let records: Vec<MarketRecord> = self.get_json(&url, "markets").await?;

        tracing::debug!(
            count = records.len(),
            page = query.page,
            per_page = query.per_page,
            "Successfully fetched markets from CoinGecko"
        );

        Ok(records)
    }

    async fn fetch_coin_detail(&self, coin_id: &str) -> Result<CoinDetail, ProviderError> {
        let url = self.detail_url(coin_id);
        self.get_json(&url, &format!("coin {}", coin_id)).await
    }

    async fn fetch_market_chart(
        &self,
        coin_id: &str,
        days: u32,
    ) -> Result<MarketChart, ProviderError> {
        let url = self.chart_url(coin_id, days);
        let chart: MarketChart = self
            .get_json(&url, &format!("chart {} ({}d)", coin_id, days))
            .await?;

        tracing::debug!(
            coin_id,
            days,
            points = chart.prices.len(),
            "Successfully fetched market chart from CoinGecko"
        );

        Ok(chart)
    }

    fn provider_name(&self) -> &'static str {
        "coingecko"
    }
}
