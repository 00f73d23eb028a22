//! Page-level loaders
//!
//! Each page owns the query handles it displays; dropping the page stops
//! their polling. Sections settle independently, so a failed profile fetch
//! never hides the market table and vice versa.

use crate::constants::{
    DASHBOARD_PER_PAGE, LANDING_PER_PAGE, LANDING_REFRESH_SECS, PAGE_REFRESH_SECS,
};
use crate::favorites::FavoritesStore;
use crate::query::{Query, QueryClient, QueryState};
use crate::stats::{FavoritesStats, MarketStats};
use crate::types::{ChartPeriod, CoinDetail, MarketChart, MarketRecord, MarketsQuery, UserProfile};
use std::sync::Arc;
use std::time::Duration;

fn page_interval() -> Option<Duration> {
    Some(Duration::from_secs(PAGE_REFRESH_SECS))
}

/// Top coins teaser
pub struct LandingPage {
    pub markets: Arc<Query<Vec<MarketRecord>>>,
}

pub async fn load_landing(client: &QueryClient) -> LandingPage {
    let markets = client
        .markets(
            MarketsQuery::new(LANDING_PER_PAGE, 1),
            Some(Duration::from_secs(LANDING_REFRESH_SECS)),
        )
        .await;
    LandingPage { markets }
}

/// Market table plus header profile
pub struct DashboardPage {
    pub markets: Arc<Query<Vec<MarketRecord>>>,
    pub profile: Arc<Query<UserProfile>>,
}

/// Settled state of each dashboard section
#[derive(Debug, Clone)]
pub struct DashboardSections {
    pub markets: QueryState<Vec<MarketRecord>>,
    pub profile: QueryState<UserProfile>,
}

impl DashboardSections {
    /// Summary cards; `None` until the listing loaded
    pub fn market_stats(&self) -> Option<MarketStats> {
        MarketStats::from_records(self.markets.data()?)
    }
}

pub async fn load_dashboard(client: &QueryClient) -> DashboardPage {
    let (markets, profile) = futures::join!(
        client.markets(MarketsQuery::new(DASHBOARD_PER_PAGE, 1), page_interval()),
        client.user_profile(),
    );
    DashboardPage { markets, profile }
}

impl DashboardPage {
    /// Waits for both sections to leave `Pending`
    pub async fn settled(&self) -> DashboardSections {
        let (markets, profile) = futures::join!(self.markets.settled(), self.profile.settled());
        if let Some(message) = markets.error_message() {
            tracing::warn!(error = message, "Dashboard market section failed");
        }
        DashboardSections { markets, profile }
    }
}

/// Detail and price chart of one coin
pub struct CoinPage {
    pub coin_id: String,
    pub period: ChartPeriod,
    pub detail: Arc<Query<CoinDetail>>,
    pub chart: Arc<Query<MarketChart>>,
}

#[derive(Debug, Clone)]
pub struct CoinSections {
    pub detail: QueryState<CoinDetail>,
    pub chart: QueryState<MarketChart>,
}

pub async fn load_coin_page(client: &QueryClient, coin_id: &str, period: ChartPeriod) -> CoinPage {
    let (detail, chart) = futures::join!(
        client.coin_detail(coin_id, page_interval()),
        client.coin_chart(coin_id, period, page_interval()),
    );
    CoinPage {
        coin_id: coin_id.to_string(),
        period,
        detail,
        chart,
    }
}

impl CoinPage {
    /// Switches the chart period; the detail query is left untouched
    pub async fn select_period(&mut self, client: &QueryClient, period: ChartPeriod) {
        if period == self.period {
            return;
        }
        tracing::debug!(coin_id = %self.coin_id, days = period.days(), "Switching chart period");
        self.chart = client
            .coin_chart(&self.coin_id, period, page_interval())
            .await;
        self.period = period;
    }

    pub async fn settled(&self) -> CoinSections {
        let (detail, chart) = futures::join!(self.detail.settled(), self.chart.settled());
        CoinSections { detail, chart }
    }
}

/// Favorited coins resolved against a wide listing
pub struct FavoritesPage {
    pub markets: Arc<Query<Vec<MarketRecord>>>,
}

/// Favorites joined with the latest listing
#[derive(Debug, Clone)]
pub struct FavoritesView {
    pub records: Vec<MarketRecord>,
    pub stats: Option<FavoritesStats>,
    /// Favorites missing from the listing
    pub orphaned: Vec<String>,
}

pub async fn load_favorites(client: &QueryClient) -> FavoritesPage {
    FavoritesPage {
        markets: client.favorites_markets().await,
    }
}

impl FavoritesPage {
    pub async fn resolve(&self, favorites: &FavoritesStore) -> QueryState<FavoritesView> {
        self.markets.settled().await.map(|listing| {
            let records = favorites.favorite_records(&listing);
            let orphaned = favorites.orphaned_ids(&listing);
            if !orphaned.is_empty() {
                tracing::debug!(count = orphaned.len(), "Favorites missing from listing");
            }
            FavoritesView {
                stats: FavoritesStats::from_records(&records),
                records,
                orphaned,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::{sample_records, MockProfileProvider, MockProvider};
    use crate::storage::MemoryStorage;
    use crate::types::{MarketChart, PricePoint};

    fn profile() -> UserProfile {
        serde_json::from_value(serde_json::json!({
            "name": { "title": "Ms", "first": "Ada", "last": "Lovelace" },
            "email": "ada@example.com"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_dashboard_sections_are_isolated() {
        let provider = Arc::new(MockProvider::new());
        provider.fail_markets();
        let client = QueryClient::new(provider, Arc::new(MockProfileProvider::new(Some(profile()))));

        let page = load_dashboard(&client).await;
        let sections = page.settled().await;

        assert!(sections.markets.is_error());
        assert_eq!(
            sections.markets.error_message(),
            Some("Too many requests! Try again in a few seconds")
        );
        assert_eq!(sections.profile.data().map(|p| p.full_name()).as_deref(), Some("Ada Lovelace"));
        assert!(sections.market_stats().is_none());
    }

    #[tokio::test]
    async fn test_dashboard_profile_failure_keeps_table() {
        let provider = Arc::new(MockProvider::new());
        provider.set_markets(sample_records());
        let client = QueryClient::new(provider, Arc::new(MockProfileProvider::new(None)));

        let sections = load_dashboard(&client).await.settled().await;
        assert!(sections.profile.is_error());
        assert_eq!(sections.markets.data().map(Vec::len), Some(5));
        assert_eq!(sections.market_stats().map(|s| s.gainers), Some(3));
    }

    #[tokio::test]
    async fn test_landing_uses_short_listing() {
        let provider = Arc::new(MockProvider::new());
        provider.set_markets(sample_records());
        let client = QueryClient::new(provider, Arc::new(MockProfileProvider::new(None)));

        let landing = load_landing(&client).await;
        let listing = landing.markets.settled().await;
        assert_eq!(listing.data().map(Vec::len), Some(5));
        assert_eq!(landing.markets.key().to_string(), "coinsMarketData(usd,market_cap_desc,8,1)");
    }

    #[tokio::test]
    async fn test_coin_page_sections_and_period_switch() {
        let provider = Arc::new(MockProvider::new());
        let chart = MarketChart {
            prices: vec![PricePoint(0.0, 100.0), PricePoint(1.0, 110.0)],
            ..Default::default()
        };
        provider.set_chart("bitcoin", 7, chart.clone());
        provider.set_chart("bitcoin", 30, chart);
        let client = QueryClient::new(provider, Arc::new(MockProfileProvider::new(None)));

        let mut page = load_coin_page(&client, "bitcoin", ChartPeriod::SevenDays).await;
        let sections = page.settled().await;
        // No detail registered: only that section fails
        assert!(sections.detail.is_error());
        assert_eq!(
            sections.chart.data().and_then(|c| c.change_percentage()),
            Some(10.0)
        );

        page.select_period(&client, ChartPeriod::ThirtyDays).await;
        assert_eq!(page.chart.key().to_string(), "coinChart(bitcoin,30)");
        assert!(page.settled().await.chart.is_success());
    }

    #[tokio::test]
    async fn test_favorites_page_resolves_store() {
        let provider = Arc::new(MockProvider::new());
        provider.set_markets(sample_records());
        let client = QueryClient::new(provider, Arc::new(MockProfileProvider::new(None)));

        let storage = MemoryStorage::with_favorites(&["solana", "gone-coin", "tether"]);
        let store = FavoritesStore::open(Box::new(storage)).unwrap();

        let page = load_favorites(&client).await;
        let view = page.resolve(&store).await;
        let view = view.data().unwrap();

        let ids: Vec<&str> = view.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["solana", "tether"]);
        assert_eq!(view.orphaned, vec!["gone-coin"]);
        assert_eq!(view.stats.as_ref().map(|s| s.gainers), Some(2));
    }
}
