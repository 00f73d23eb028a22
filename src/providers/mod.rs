//! Data provider implementations

pub mod coingecko;
pub mod randomuser;

pub use coingecko::CoinGeckoProvider;
pub use randomuser::RandomUserProvider;
