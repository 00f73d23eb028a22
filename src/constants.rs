//! Constants for the coin dashboard
//!
//! Endpoints, polling intervals and table defaults live here. The few
//! values that deployments need to change (API base URLs, state directory)
//! can be overridden through [`DashboardConfig::from_env`].

use std::path::PathBuf;
use std::time::Duration;

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko endpoint for paginated market listings
pub const COINGECKO_MARKETS_ENDPOINT: &str = "/coins/markets";

/// CoinGecko endpoint prefix for per-coin queries (`/coins/{id}`)
pub const COINGECKO_COINS_ENDPOINT: &str = "/coins";

/// randomuser.me API base URL, used for the decorative profile card
pub const RANDOMUSER_API_URL: &str = "https://randomuser.me/api/";

/// HTTP request timeout (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// User agent for HTTP requests
pub const USER_AGENT: &str = "coin-dashboard/0.1.0";

/// Quote currency used for every market query
pub const VS_CURRENCY: &str = "usd";

/// Ordering requested from the markets endpoint
pub const MARKETS_ORDER: &str = "market_cap_desc";

/// Landing page polls the top coins every 30 seconds
pub const LANDING_REFRESH_SECS: u64 = 30;

/// Dashboard, favorites, detail and chart pages poll every 60 seconds
pub const PAGE_REFRESH_SECS: u64 = 60;

/// Coins shown on the landing page
pub const LANDING_PER_PAGE: u32 = 8;

/// Coins fetched for the dashboard table
pub const DASHBOARD_PER_PAGE: u32 = 50;

/// Coins fetched for the favorites page, wide enough to resolve most ids
pub const FAVORITES_PER_PAGE: u32 = 250;

/// Quiet period before a search keystroke is applied to the table
pub const SEARCH_DEBOUNCE_MS: u64 = 300;

/// Default table page size
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page sizes offered by the table
pub const PAGE_SIZE_OPTIONS: &[usize] = &[10, 20, 50];

/// File name used for CSV exports
pub const CSV_EXPORT_FILE_NAME: &str = "coins.csv";

/// Storage key of the persisted state blob
pub const PERSIST_KEY: &str = "root";

/// Default directory for persisted state
pub const DEFAULT_STATE_DIR: &str = ".coin-dashboard";

/// Maximum number of request samples kept per query for metrics
pub const METRICS_WINDOW: usize = 100;

/// Runtime configuration
///
/// Defaults mirror the constants above; `from_env` lets a deployment point
/// the providers at a proxy or move the state directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Base URL of the CoinGecko-compatible API
    pub coingecko_api_url: String,
    /// Base URL of the profile API
    pub randomuser_api_url: String,
    /// Directory holding the persisted favorites blob
    pub state_dir: PathBuf,
    /// HTTP client timeout
    pub request_timeout: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            coingecko_api_url: COINGECKO_API_URL.to_string(),
            randomuser_api_url: RANDOMUSER_API_URL.to_string(),
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }
}

impl DashboardConfig {
    /// Builds the configuration from `COINGECKO_API_URL`,
    /// `RANDOMUSER_API_URL` and `COIN_DASHBOARD_STATE_DIR`, falling back to
    /// the compiled defaults for anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("COINGECKO_API_URL") {
            config.coingecko_api_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(url) = std::env::var("RANDOMUSER_API_URL") {
            config.randomuser_api_url = url;
        }
        if let Ok(dir) = std::env::var("COIN_DASHBOARD_STATE_DIR") {
            config.state_dir = PathBuf::from(dir);
        }

        tracing::debug!(
            coingecko_api_url = %config.coingecko_api_url,
            state_dir = %config.state_dir.display(),
            "Loaded dashboard configuration"
        );

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_constants() {
        let config = DashboardConfig::default();
        assert_eq!(config.coingecko_api_url, COINGECKO_API_URL);
        assert_eq!(config.randomuser_api_url, RANDOMUSER_API_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(PAGE_SIZE_OPTIONS.contains(&DEFAULT_PAGE_SIZE));
    }
}
