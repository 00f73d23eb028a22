//! Types for the coin dashboard
//!
//! Payload shapes mirror the upstream JSON. Anything the upstream may omit
//! or send as `null` is an `Option` (or defaults to empty) so a partial
//! response never fails to decode.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::constants::{MARKETS_ORDER, VS_CURRENCY};

/// One row of the `/coins/markets` listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRecord {
    /// CoinGecko id, unique per coin
    pub id: String,

    /// Display name
    pub name: String,

    /// Ticker symbol, lower-case as delivered
    pub symbol: String,

    /// Price in the quote currency
    #[serde(default)]
    pub current_price: Option<f64>,

    /// 24h price change percentage
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,

    /// Market capitalization
    #[serde(default)]
    pub market_cap: Option<f64>,

    /// 24h traded volume
    #[serde(default)]
    pub total_volume: Option<f64>,

    /// Rank by market cap
    #[serde(default)]
    pub market_cap_rank: Option<u32>,

    /// Logo URL
    #[serde(default)]
    pub image: String,
}

impl MarketRecord {
    /// Creates a record with only the identifying fields set
    pub fn new(id: impl Into<String>, name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            symbol: symbol.into(),
            current_price: None,
            price_change_percentage_24h: None,
            market_cap: None,
            total_volume: None,
            market_cap_rank: None,
            image: String::new(),
        }
    }

    /// Text the global filter ranks against: name, symbol and id, lower-cased
    pub fn searchable_text(&self) -> String {
        [self.name.as_str(), self.symbol.as_str(), self.id.as_str()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

/// Parameters of a `/coins/markets` request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarketsQuery {
    pub vs_currency: String,
    pub order: String,
    pub per_page: u32,
    pub page: u32,
}

impl MarketsQuery {
    /// USD listing ordered by market cap
    pub fn new(per_page: u32, page: u32) -> Self {
        Self {
            vs_currency: VS_CURRENCY.to_string(),
            order: MARKETS_ORDER.to_string(),
            per_page,
            page,
        }
    }

    /// Query string without the leading `?`
    pub fn to_query_string(&self) -> String {
        format!(
            "vs_currency={}&order={}&per_page={}&page={}",
            self.vs_currency, self.order, self.per_page, self.page
        )
    }
}

/// Chart ranges offered on the coin chart page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartPeriod {
    OneDay,
    #[default]
    SevenDays,
    ThirtyDays,
    NinetyDays,
    HalfYear,
}

impl ChartPeriod {
    /// Number of days passed as `days=` to the chart endpoint
    pub fn days(&self) -> u32 {
        match self {
            ChartPeriod::OneDay => 1,
            ChartPeriod::SevenDays => 7,
            ChartPeriod::ThirtyDays => 30,
            ChartPeriod::NinetyDays => 90,
            ChartPeriod::HalfYear => 180,
        }
    }

    /// Button label
    pub fn label(&self) -> &'static str {
        match self {
            ChartPeriod::OneDay => "1D",
            ChartPeriod::SevenDays => "7D",
            ChartPeriod::ThirtyDays => "30D",
            ChartPeriod::NinetyDays => "90D",
            ChartPeriod::HalfYear => "180D",
        }
    }

    /// All periods in display order
    pub fn all() -> &'static [ChartPeriod] {
        &[
            ChartPeriod::OneDay,
            ChartPeriod::SevenDays,
            ChartPeriod::ThirtyDays,
            ChartPeriod::NinetyDays,
            ChartPeriod::HalfYear,
        ]
    }
}

/// Full coin payload from `/coins/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinDetail {
    pub id: String,
    pub symbol: String,
    pub name: String,

    #[serde(default)]
    pub market_cap_rank: Option<u32>,

    /// `YYYY-MM-DD`, absent for many tokens
    #[serde(default)]
    pub genesis_date: Option<String>,

    /// Localized descriptions keyed by language code
    #[serde(default)]
    pub description: HashMap<String, String>,

    #[serde(default)]
    pub links: CoinLinks,

    #[serde(default)]
    pub image: Option<CoinImage>,

    #[serde(default)]
    pub market_data: MarketData,

    #[serde(default)]
    pub community_data: Option<CommunityData>,

    #[serde(default)]
    pub developer_data: Option<DeveloperData>,

    #[serde(default)]
    pub tickers: Vec<Ticker>,
}

impl CoinDetail {
    /// Parsed genesis date; `None` when missing or malformed
    pub fn genesis_date(&self) -> Option<NaiveDate> {
        self.genesis_date
            .as_deref()
            .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
    }

    /// English description, if the upstream sent a non-empty one
    pub fn description_en(&self) -> Option<&str> {
        self.description
            .get("en")
            .map(String::as_str)
            .filter(|text| !text.trim().is_empty())
    }
}

/// External links block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoinLinks {
    #[serde(default, deserialize_with = "non_empty_strings")]
    pub homepage: Vec<String>,

    #[serde(default, deserialize_with = "non_empty_strings")]
    pub blockchain_site: Vec<String>,

    #[serde(default)]
    pub subreddit_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoinImage {
    #[serde(default)]
    pub thumb: String,
    #[serde(default)]
    pub small: String,
    #[serde(default)]
    pub large: String,
}

/// Market block of a coin detail; per-currency values are keyed by currency code
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketData {
    #[serde(default, deserialize_with = "currency_map")]
    pub current_price: HashMap<String, f64>,
    #[serde(default, deserialize_with = "currency_map")]
    pub market_cap: HashMap<String, f64>,
    #[serde(default, deserialize_with = "currency_map")]
    pub total_volume: HashMap<String, f64>,
    #[serde(default, deserialize_with = "currency_map")]
    pub high_24h: HashMap<String, f64>,
    #[serde(default, deserialize_with = "currency_map")]
    pub low_24h: HashMap<String, f64>,
    #[serde(default, deserialize_with = "currency_map")]
    pub ath: HashMap<String, f64>,
    #[serde(default, deserialize_with = "currency_map")]
    pub atl: HashMap<String, f64>,
    #[serde(default, deserialize_with = "currency_map")]
    pub price_change_percentage_1h_in_currency: HashMap<String, f64>,

    #[serde(default)]
    pub price_change_24h: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_7d: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_30d: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_1y: Option<f64>,
    #[serde(default)]
    pub market_cap_change_percentage_24h: Option<f64>,

    #[serde(default)]
    pub circulating_supply: Option<f64>,
    #[serde(default)]
    pub total_supply: Option<f64>,
    #[serde(default)]
    pub max_supply: Option<f64>,
}

impl MarketData {
    pub fn current_price_usd(&self) -> Option<f64> {
        self.current_price.get(VS_CURRENCY).copied()
    }

    pub fn market_cap_usd(&self) -> Option<f64> {
        self.market_cap.get(VS_CURRENCY).copied()
    }

    pub fn total_volume_usd(&self) -> Option<f64> {
        self.total_volume.get(VS_CURRENCY).copied()
    }

    pub fn high_24h_usd(&self) -> Option<f64> {
        self.high_24h.get(VS_CURRENCY).copied()
    }

    pub fn low_24h_usd(&self) -> Option<f64> {
        self.low_24h.get(VS_CURRENCY).copied()
    }

    pub fn price_change_percentage_1h_usd(&self) -> Option<f64> {
        self.price_change_percentage_1h_in_currency
            .get(VS_CURRENCY)
            .copied()
    }

    /// Share of the maximum supply already circulating, in percent
    pub fn circulating_supply_percentage(&self) -> Option<f64> {
        crate::stats::percent_of(self.circulating_supply?, self.max_supply?)
    }
}

/// Social stats; every counter is optional upstream
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommunityData {
    #[serde(default)]
    pub twitter_followers: Option<u64>,
    #[serde(default)]
    pub reddit_subscribers: Option<u64>,
    #[serde(default)]
    pub reddit_accounts_active_48h: Option<u64>,
    #[serde(default)]
    pub reddit_average_posts_48h: Option<f64>,
    #[serde(default)]
    pub reddit_average_comments_48h: Option<f64>,
    #[serde(default)]
    pub telegram_channel_user_count: Option<u64>,
}

/// Repository stats
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeveloperData {
    #[serde(default)]
    pub forks: Option<u64>,
    #[serde(default)]
    pub stars: Option<u64>,
    #[serde(default)]
    pub subscribers: Option<u64>,
    #[serde(default)]
    pub total_issues: Option<u64>,
    #[serde(default)]
    pub closed_issues: Option<u64>,
    #[serde(default)]
    pub pull_requests_merged: Option<u64>,
    #[serde(default)]
    pub pull_request_contributors: Option<u64>,
    #[serde(default)]
    pub commit_count_4_weeks: Option<u64>,
    #[serde(default)]
    pub code_additions_deletions_4_weeks: Option<CodeChanges>,
}

impl DeveloperData {
    /// Closed issues as a percentage of all issues; `None` when there are no issues
    pub fn resolved_issue_percentage(&self) -> Option<f64> {
        crate::stats::percent_of(self.closed_issues? as f64, self.total_issues? as f64)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodeChanges {
    #[serde(default)]
    pub additions: Option<i64>,
    #[serde(default)]
    pub deletions: Option<i64>,
}

/// Exchange ticker listed on the detail page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticker {
    pub base: String,
    pub target: String,
    #[serde(default)]
    pub market: TickerMarket,
    #[serde(default)]
    pub last: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub trust_score: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickerMarket {
    #[serde(default)]
    pub name: String,
}

/// `[timestamp_ms, value]` pair from the chart endpoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint(pub f64, pub f64);

impl PricePoint {
    pub fn timestamp_ms(&self) -> f64 {
        self.0
    }

    pub fn value(&self) -> f64 {
        self.1
    }

    /// Timestamp as UTC time; `None` for out-of-range values
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.0 as i64).single()
    }
}

/// Payload of `/coins/{id}/market_chart`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketChart {
    #[serde(default)]
    pub prices: Vec<PricePoint>,
    #[serde(default)]
    pub market_caps: Vec<PricePoint>,
    #[serde(default)]
    pub total_volumes: Vec<PricePoint>,
}

impl MarketChart {
    /// Highest price in the range
    pub fn high(&self) -> Option<f64> {
        self.prices.iter().map(PricePoint::value).reduce(f64::max)
    }

    /// Lowest price in the range
    pub fn low(&self) -> Option<f64> {
        self.prices.iter().map(PricePoint::value).reduce(f64::min)
    }

    /// Change from the first to the last price of the range, in percent
    pub fn change_percentage(&self) -> Option<f64> {
        let first = self.prices.first()?.value();
        let last = self.prices.last()?.value();
        crate::stats::percent_of(last - first, first)
    }
}

/// Envelope returned by randomuser.me
#[derive(Debug, Clone, Deserialize)]
pub struct RandomUserResponse {
    #[serde(default)]
    pub results: Vec<UserProfile>,
}

/// Decorative profile shown in the header
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub name: PersonName,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub cell: String,
    #[serde(default)]
    pub picture: Picture,
    #[serde(default)]
    pub nat: String,
}

impl UserProfile {
    /// `"First Last"`
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name.first, self.name.last)
            .trim()
            .to_string()
    }

    /// Two-letter avatar fallback
    pub fn initials(&self) -> String {
        self.name
            .first
            .chars()
            .take(1)
            .chain(self.name.last.chars().take(1))
            .collect::<String>()
            .to_uppercase()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonName {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub first: String,
    #[serde(default)]
    pub last: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Picture {
    #[serde(default)]
    pub large: String,
    #[serde(default)]
    pub medium: String,
    #[serde(default)]
    pub thumbnail: String,
}

/// Dashboard events broadcast to listeners
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DashboardEvent {
    /// A query produced fresh data
    DataUpdated {
        id: Uuid,
        query: String,
        timestamp: DateTime<Utc>,
    },

    /// A query request failed
    FetchFailed {
        id: Uuid,
        query: String,
        error_message: String,
        timestamp: DateTime<Utc>,
    },

    /// The favorites set was mutated
    FavoritesChanged {
        id: Uuid,
        favorites_count: usize,
        timestamp: DateTime<Utc>,
    },
}

impl DashboardEvent {
    pub fn data_updated(query: impl Into<String>) -> Self {
        Self::DataUpdated {
            id: Uuid::new_v4(),
            query: query.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn fetch_failed(query: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self::FetchFailed {
            id: Uuid::new_v4(),
            query: query.into(),
            error_message: error_message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn favorites_changed(favorites_count: usize) -> Self {
        Self::FavoritesChanged {
            id: Uuid::new_v4(),
            favorites_count,
            timestamp: Utc::now(),
        }
    }

    /// Get the event ID
    pub fn id(&self) -> Uuid {
        match self {
            DashboardEvent::DataUpdated { id, .. } => *id,
            DashboardEvent::FetchFailed { id, .. } => *id,
            DashboardEvent::FavoritesChanged { id, .. } => *id,
        }
    }

    /// Get the event type as string
    pub fn event_type(&self) -> &'static str {
        match self {
            DashboardEvent::DataUpdated { .. } => "DATA_UPDATED",
            DashboardEvent::FetchFailed { .. } => "FETCH_FAILED",
            DashboardEvent::FavoritesChanged { .. } => "FAVORITES_CHANGED",
        }
    }
}

impl std::fmt::Display for DashboardEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DashboardEvent::DataUpdated { query, .. } => write!(f, "Data updated: {}", query),
            DashboardEvent::FetchFailed {
                query,
                error_message,
                ..
            } => write!(f, "Fetch failed for {}: {}", query, error_message),
            DashboardEvent::FavoritesChanged {
                favorites_count, ..
            } => write!(f, "Favorites changed: {} coins", favorites_count),
        }
    }
}

/// Per-currency maps sometimes carry `null` values; drop them
fn currency_map<'de, D>(deserializer: D) -> Result<HashMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<HashMap<String, Option<f64>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(currency, value)| value.map(|v| (currency, v)))
        .collect())
}

/// Link lists are padded with empty strings upstream
fn non_empty_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Option<String>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .filter(|s| !s.trim().is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markets_query_string() {
        let query = MarketsQuery::new(50, 1);
        assert_eq!(
            query.to_query_string(),
            "vs_currency=usd&order=market_cap_desc&per_page=50&page=1"
        );
    }

    #[test]
    fn test_market_record_tolerates_nulls() {
        let json = r#"{
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "image": "https://assets.coingecko.com/coins/images/1/large/bitcoin.png",
            "current_price": 67420.5,
            "market_cap": null,
            "market_cap_rank": 1,
            "total_volume": 1.0e10,
            "price_change_percentage_24h": null,
            "ath": 73000.0
        }"#;
        let record: MarketRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "bitcoin");
        assert_eq!(record.current_price, Some(67420.5));
        assert_eq!(record.market_cap, None);
        assert_eq!(record.price_change_percentage_24h, None);
        assert_eq!(record.searchable_text(), "bitcoin btc bitcoin");
    }

    #[test]
    fn test_coin_detail_partial_payload() {
        let json = r#"{
            "id": "ethereum",
            "symbol": "eth",
            "name": "Ethereum",
            "genesis_date": null,
            "links": { "homepage": ["https://ethereum.org", "", ""], "subreddit_url": null },
            "market_data": {
                "current_price": { "usd": 3842.3, "eur": null },
                "price_change_percentage_24h": -1.25
            },
            "community_data": { "twitter_followers": 3500000, "telegram_channel_user_count": null },
            "developer_data": { "total_issues": 0, "closed_issues": 0 }
        }"#;
        let detail: CoinDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.genesis_date(), None);
        assert_eq!(detail.links.homepage, vec!["https://ethereum.org"]);
        assert_eq!(detail.market_data.current_price_usd(), Some(3842.3));
        assert!(!detail.market_data.current_price.contains_key("eur"));
        assert_eq!(detail.market_data.high_24h_usd(), None);
        let community = detail.community_data.as_ref().unwrap();
        assert_eq!(community.telegram_channel_user_count, None);
        assert_eq!(
            detail
                .developer_data
                .as_ref()
                .unwrap()
                .resolved_issue_percentage(),
            None
        );
        assert!(detail.tickers.is_empty());
        assert_eq!(detail.description_en(), None);
    }

    #[test]
    fn test_genesis_date_parses() {
        let json = r#"{ "id": "bitcoin", "symbol": "btc", "name": "Bitcoin", "genesis_date": "2009-01-03" }"#;
        let detail: CoinDetail = serde_json::from_str(json).unwrap();
        assert_eq!(
            detail.genesis_date(),
            NaiveDate::from_ymd_opt(2009, 1, 3)
        );
    }

    #[test]
    fn test_market_chart_summary() {
        let json = r#"{ "prices": [[1700000000000, 100.0], [1700003600000, 120.0], [1700007200000, 90.0]] }"#;
        let chart: MarketChart = serde_json::from_str(json).unwrap();
        assert_eq!(chart.prices.len(), 3);
        assert_eq!(chart.high(), Some(120.0));
        assert_eq!(chart.low(), Some(90.0));
        assert_eq!(chart.change_percentage(), Some(-10.0));
        assert_eq!(
            chart.prices[0].timestamp().map(|t| t.timestamp()),
            Some(1_700_000_000)
        );
        assert!(chart.total_volumes.is_empty());
    }

    #[test]
    fn test_market_chart_zero_start_is_absent() {
        let chart = MarketChart {
            prices: vec![PricePoint(0.0, 0.0), PricePoint(1.0, 5.0)],
            ..Default::default()
        };
        assert_eq!(chart.change_percentage(), None);
    }

    #[test]
    fn test_user_profile_names() {
        let json = r#"{ "results": [{ "name": { "title": "Ms", "first": "Ana", "last": "Silva" }, "email": "ana@example.com" }] }"#;
        let response: RandomUserResponse = serde_json::from_str(json).unwrap();
        let profile = &response.results[0];
        assert_eq!(profile.full_name(), "Ana Silva");
        assert_eq!(profile.initials(), "AS");
        assert_eq!(profile.location, Location::default());
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let event = DashboardEvent::favorites_changed(3);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "FAVORITES_CHANGED");
        assert_eq!(json["favorites_count"], 3);
        assert_eq!(event.event_type(), "FAVORITES_CHANGED");
    }

    #[test]
    fn test_chart_periods() {
        let days: Vec<u32> = ChartPeriod::all().iter().map(ChartPeriod::days).collect();
        assert_eq!(days, vec![1, 7, 30, 90, 180]);
        assert_eq!(ChartPeriod::default().label(), "7D");
    }
}
