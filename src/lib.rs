//! # Coin Dashboard
//!
//! Market data core for a cryptocurrency dashboard: polled CoinGecko
//! queries, a client-side table engine over the market listing, and a
//! persisted favorites list.
//!
//! ## Usage
//!
//! ```no_run
//! use coin_dashboard::{
//!     DashboardConfig, FavoritesStore, FileStorage, QueryClient, TableOptions, TableView,
//!     table::Field,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DashboardConfig::from_env();
//! let client = QueryClient::from_config(&config)?;
//!
//! // Polled every 60 seconds while the handle is alive
//! let page = coin_dashboard::pages::load_dashboard(&client).await;
//! let sections = page.settled().await;
//!
//! if let Some(records) = sections.markets.data() {
//!     let mut table = TableView::new(records.clone(), TableOptions::default())?;
//!     table.toggle_sort(Field::MarketCap)?;
//!     table.set_global_filter("bitcon")?;
//!     for record in table.page_rows() {
//!         println!("{} {:?}", record.name, record.current_price);
//!     }
//! }
//!
//! let mut favorites = FavoritesStore::open(Box::new(FileStorage::new(&config.state_dir)))?;
//! favorites.toggle("bitcoin");
//! # Ok(())
//! # }
//! ```

pub mod constants;
pub mod error;
pub mod favorites;
pub mod format;
pub mod metrics;
pub mod pages;
pub mod provider;
pub mod providers;
pub mod query;
pub mod stats;
pub mod storage;
pub mod table;
pub mod types;

// Re-export commonly used types
pub use constants::DashboardConfig;
pub use error::{ProviderError, StorageError, TableError};
pub use favorites::{ClearConfirmation, FavoritesStore};
pub use metrics::QueryMetrics;
pub use query::{Query, QueryClient, QueryKey, QueryState};
pub use storage::{FavoritesPersistence, FileStorage, MemoryStorage};
pub use table::{ExportScope, TableOptions, TableView};
pub use types::{
    ChartPeriod, CoinDetail, DashboardEvent, MarketChart, MarketRecord, MarketsQuery, UserProfile,
};
