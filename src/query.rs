//! Polling queries over the data providers
//!
//! A [`Query`] owns one logical request (identified by a [`QueryKey`]) and
//! publishes its [`QueryState`] through a watch channel. When created with
//! an interval it re-issues the request on every tick regardless of the
//! previous outcome; there is no automatic retry or backoff, callers use
//! [`Query::refetch`] as the "try again" action.
//!
//! ```text
//! QueryClient::markets(..)
//!     ↓ (dedup by QueryKey)
//! Query<T>  ── poll task (tokio interval) ──┐
//!     ↓                                      ↓
//! fetch closure → MarketDataProvider     spawned request (generation n)
//!     ↓
//! watch::Sender<QueryState<T>> → view layer
//! ```
//!
//! Every request is tagged with a generation number. A response whose
//! generation is older than the newest applied one is dropped, so a slow
//! in-flight request can never overwrite fresher data.

use crate::{
    constants::{DashboardConfig, FAVORITES_PER_PAGE, PAGE_REFRESH_SECS},
    error::ProviderError,
    metrics::{MetricsCollector, QueryMetrics},
    provider::{MarketDataProvider, ProfileProvider},
    providers::{CoinGeckoProvider, RandomUserProvider},
    types::{
        ChartPeriod, CoinDetail, DashboardEvent, MarketChart, MarketRecord, MarketsQuery,
        UserProfile,
    },
};
use futures::future::BoxFuture;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Tri-state result of a query
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    /// No response has been applied yet
    Pending,
    /// The latest applied request failed
    Error(String),
    /// The latest applied request succeeded
    Success(T),
}

impl<T> QueryState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, QueryState::Pending)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, QueryState::Error(_))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, QueryState::Success(_))
    }

    /// Data of a successful query
    pub fn data(&self) -> Option<&T> {
        match self {
            QueryState::Success(data) => Some(data),
            _ => None,
        }
    }

    /// Message of a failed query
    pub fn error_message(&self) -> Option<&str> {
        match self {
            QueryState::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> QueryState<U> {
        match self {
            QueryState::Pending => QueryState::Pending,
            QueryState::Error(message) => QueryState::Error(message),
            QueryState::Success(data) => QueryState::Success(f(data)),
        }
    }
}

impl<T> From<Result<T, ProviderError>> for QueryState<T> {
    fn from(result: Result<T, ProviderError>) -> Self {
        match result {
            Ok(data) => QueryState::Success(data),
            Err(e) => QueryState::Error(e.to_string()),
        }
    }
}

/// Identity of a logical query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Markets(MarketsQuery),
    CoinDetail(String),
    CoinChart { coin_id: String, days: u32 },
    UserProfile,
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::Markets(query) => write!(
                f,
                "coinsMarketData({},{},{},{})",
                query.vs_currency, query.order, query.per_page, query.page
            ),
            QueryKey::CoinDetail(coin_id) => write!(f, "coinDetail({})", coin_id),
            QueryKey::CoinChart { coin_id, days } => write!(f, "coinChart({},{})", coin_id, days),
            QueryKey::UserProfile => write!(f, "userProfile"),
        }
    }
}

/// Boxed request factory; called once per issued request
pub type FetchFn<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T, ProviderError>> + Send + Sync>;

struct Shared<T> {
    key: QueryKey,
    fetch: FetchFn<T>,
    state_tx: watch::Sender<QueryState<T>>,
    issued: AtomicU64,
    applied: Mutex<u64>,
    metrics: MetricsCollector,
    events: Option<broadcast::Sender<DashboardEvent>>,
}

impl<T: Send + Sync + 'static> Shared<T> {
    /// Issues one request and applies its result unless a newer one already landed
    async fn run_once(self: Arc<Self>) {
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let start = Instant::now();

        let result = (self.fetch)().await;
        self.metrics
            .record_request(start.elapsed(), result.is_ok())
            .await;

        let mut applied = self.applied.lock().await;
        if generation < *applied {
            tracing::debug!(
                query = %self.key,
                generation,
                applied = *applied,
                "Dropping stale response"
            );
            self.metrics.record_stale().await;
            return;
        }
        *applied = generation;

        let event = match &result {
            Ok(_) => {
                tracing::debug!(
                    query = %self.key,
                    generation,
                    latency_ms = start.elapsed().as_millis() as u64,
                    "Query succeeded"
                );
                DashboardEvent::data_updated(self.key.to_string())
            }
            Err(e) => {
                tracing::warn!(query = %self.key, error = %e, "Query failed");
                DashboardEvent::fetch_failed(self.key.to_string(), e.to_string())
            }
        };

        self.state_tx.send_replace(QueryState::from(result));
        drop(applied);

        if let Some(events) = &self.events {
            // No listeners is fine
            let _ = events.send(event);
        }
    }
}

/// Handle to a polled query
///
/// Dropping the last handle stops polling. Requests already in flight run
/// to completion and are applied (or dropped as stale) as usual.
pub struct Query<T> {
    shared: Arc<Shared<T>>,
    poller: std::sync::Mutex<Poller>,
}

/// Background task of a query and the period it polls at
struct Poller {
    handle: Option<JoinHandle<()>>,
    period: Option<Duration>,
}

fn lock_poller(poller: &std::sync::Mutex<Poller>) -> std::sync::MutexGuard<'_, Poller> {
    match poller.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Issues a request on every tick, the first one at `start`
fn spawn_poll_loop<T: Send + Sync + 'static>(
    shared: Arc<Shared<T>>,
    start: tokio::time::Instant,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!(
            query = %shared.key,
            refresh_interval_secs = period.as_secs(),
            "Starting query polling task"
        );

        let mut ticker = tokio::time::interval_at(start, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            // Each request runs on its own task so a slow one never delays the next tick
            tokio::spawn(shared.clone().run_once());
        }
    })
}

impl<T: Send + Sync + 'static> Query<T> {
    /// Creates the query and starts polling
    ///
    /// With `interval = None` the request is issued once; otherwise it is
    /// issued immediately and then on every tick. Must be called inside a
    /// tokio runtime.
    pub fn spawn(
        key: QueryKey,
        fetch: FetchFn<T>,
        interval: Option<Duration>,
        events: Option<broadcast::Sender<DashboardEvent>>,
    ) -> Self {
        let (state_tx, _) = watch::channel(QueryState::Pending);
        let shared = Arc::new(Shared {
            metrics: MetricsCollector::new(&key.to_string()),
            key,
            fetch,
            state_tx,
            issued: AtomicU64::new(0),
            applied: Mutex::new(0),
            events,
        });

        let handle = match interval {
            Some(period) => spawn_poll_loop(shared.clone(), tokio::time::Instant::now(), period),
            None => tokio::spawn(shared.clone().run_once()),
        };

        Self {
            shared,
            poller: std::sync::Mutex::new(Poller {
                handle: Some(handle),
                period: interval,
            }),
        }
    }

    /// Polls at `period` from now on unless the query already polls at least
    /// that often
    ///
    /// The next request is issued one `period` from now; a request already
    /// in flight is left to finish.
    pub fn ensure_polling(&self, period: Duration) {
        let mut poller = lock_poller(&self.poller);
        if poller.period.is_some_and(|current| current <= period) {
            return;
        }

        tracing::debug!(
            query = %self.shared.key,
            previous_interval_secs = poller.period.map(|p| p.as_secs()),
            refresh_interval_secs = period.as_secs(),
            "Upgrading query polling interval"
        );

        if poller.period.is_some() {
            if let Some(old) = poller.handle.take() {
                old.abort();
            }
        }
        let start = tokio::time::Instant::now() + period;
        poller.handle = Some(spawn_poll_loop(self.shared.clone(), start, period));
        poller.period = Some(period);
    }

    /// Interval this query currently polls at; `None` for a one-shot query
    pub fn poll_interval(&self) -> Option<Duration> {
        lock_poller(&self.poller).period
    }

    /// Query identity
    pub fn key(&self) -> &QueryKey {
        &self.shared.key
    }

    /// Re-issues the request now and waits until it has been applied or dropped
    pub async fn refetch(&self) {
        self.shared.clone().run_once().await;
    }

    /// Watches state changes
    pub fn subscribe(&self) -> watch::Receiver<QueryState<T>> {
        self.shared.state_tx.subscribe()
    }

    /// Request metrics for this query
    pub async fn metrics(&self) -> QueryMetrics {
        self.shared.metrics.get_metrics().await
    }

    /// Waits until the query has left `Pending` and returns that state
    pub async fn settled(&self) -> QueryState<T>
    where
        T: Clone,
    {
        let mut rx = self.subscribe();
        // The sender lives as long as `self`, so this only ends once settled
        let settled = rx
            .wait_for(|state| !state.is_pending())
            .await
            .map(|state| state.clone());
        settled.unwrap_or_else(|_| QueryState::Error("query closed".to_string()))
    }
}

impl<T: Clone> Query<T> {
    /// Current state snapshot
    pub fn state(&self) -> QueryState<T> {
        self.shared.state_tx.borrow().clone()
    }
}

impl<T> Drop for Query<T> {
    fn drop(&mut self) {
        if let Some(handle) = lock_poller(&self.poller).handle.take() {
            handle.abort();
        }
    }
}

/// Type-erased weak handle kept in the client registry
trait RegisteredQuery: Send + Sync {
    fn is_alive(&self) -> bool;
    fn as_any(&self) -> &dyn Any;
}

impl<T: Send + Sync + 'static> RegisteredQuery for Weak<Query<T>> {
    fn is_alive(&self) -> bool {
        self.strong_count() > 0
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

type QueryRegistry = HashMap<QueryKey, Box<dyn RegisteredQuery>>;

/// Creates and deduplicates queries over a pair of providers
///
/// Two consumers asking for the same key while a handle is alive share it,
/// so the dashboard table and the favorites page never double-poll.
pub struct QueryClient {
    market_provider: Arc<dyn MarketDataProvider>,
    profile_provider: Arc<dyn ProfileProvider>,
    queries: Mutex<QueryRegistry>,
    events: broadcast::Sender<DashboardEvent>,
}

impl QueryClient {
    pub fn new(
        market_provider: Arc<dyn MarketDataProvider>,
        profile_provider: Arc<dyn ProfileProvider>,
    ) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            market_provider,
            profile_provider,
            queries: Mutex::new(HashMap::new()),
            events,
        }
    }

    /// Client over the HTTP providers named in `config`
    pub fn from_config(config: &DashboardConfig) -> Result<Self, ProviderError> {
        let market_provider =
            CoinGeckoProvider::with_base_url(&config.coingecko_api_url, config.request_timeout)?;
        let profile_provider =
            RandomUserProvider::with_base_url(&config.randomuser_api_url, config.request_timeout)?;

        tracing::info!(
            market_provider = market_provider.provider_name(),
            profile_provider = profile_provider.provider_name(),
            base_url = %config.coingecko_api_url,
            "Query client configured"
        );

        Ok(Self::new(Arc::new(market_provider), Arc::new(profile_provider)))
    }

    /// Subscribes to query events
    pub fn subscribe_events(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    /// Event sender, shared with the favorites store
    pub fn event_sender(&self) -> broadcast::Sender<DashboardEvent> {
        self.events.clone()
    }

    /// Returns the live handle for `key`, or spawns a new one
    async fn get_or_spawn<T: Send + Sync + 'static>(
        &self,
        key: QueryKey,
        interval: Option<Duration>,
        fetch: FetchFn<T>,
    ) -> Arc<Query<T>> {
        let mut queries = self.queries.lock().await;

        if let Some(existing) = queries
            .get(&key)
            .and_then(|entry| entry.as_any().downcast_ref::<Weak<Query<T>>>())
            .and_then(Weak::upgrade)
        {
            tracing::debug!(query = %key, "Reusing live query");
            if let Some(period) = interval {
                existing.ensure_polling(period);
            }
            return existing;
        }

        // Forget handles nobody holds any more
        queries.retain(|_, entry| entry.is_alive());

        let query = Arc::new(Query::spawn(
            key.clone(),
            fetch,
            interval,
            Some(self.events.clone()),
        ));
        queries.insert(key, Box::new(Arc::downgrade(&query)));
        query
    }

    /// Market listing polled at `interval`
    pub async fn markets(
        &self,
        query: MarketsQuery,
        interval: Option<Duration>,
    ) -> Arc<Query<Vec<MarketRecord>>> {
        let key = QueryKey::Markets(query.clone());
        let provider = self.market_provider.clone();
        let query = Arc::new(query);
        let fetch: FetchFn<Vec<MarketRecord>> = Arc::new(move || {
            let provider = provider.clone();
            let query = query.clone();
            Box::pin(async move { provider.fetch_markets(&query).await })
        });
        self.get_or_spawn(key, interval, fetch).await
    }

    /// Listing wide enough to resolve the favorites page
    pub async fn favorites_markets(&self) -> Arc<Query<Vec<MarketRecord>>> {
        self.markets(
            MarketsQuery::new(FAVORITES_PER_PAGE, 1),
            Some(Duration::from_secs(PAGE_REFRESH_SECS)),
        )
        .await
    }

    /// Coin detail polled at `interval`
    pub async fn coin_detail(
        &self,
        coin_id: &str,
        interval: Option<Duration>,
    ) -> Arc<Query<CoinDetail>> {
        let provider = self.market_provider.clone();
        let id = coin_id.to_string();
        let fetch: FetchFn<CoinDetail> = Arc::new(move || {
            let provider = provider.clone();
            let id = id.clone();
            Box::pin(async move { provider.fetch_coin_detail(&id).await })
        });
        self.get_or_spawn(QueryKey::CoinDetail(coin_id.to_string()), interval, fetch)
            .await
    }

    /// Price history polled at `interval`
    pub async fn coin_chart(
        &self,
        coin_id: &str,
        period: ChartPeriod,
        interval: Option<Duration>,
    ) -> Arc<Query<MarketChart>> {
        let provider = self.market_provider.clone();
        let id = coin_id.to_string();
        let days = period.days();
        let fetch: FetchFn<MarketChart> = Arc::new(move || {
            let provider = provider.clone();
            let id = id.clone();
            Box::pin(async move { provider.fetch_market_chart(&id, days).await })
        });
        let key = QueryKey::CoinChart {
            coin_id: coin_id.to_string(),
            days,
        };
        self.get_or_spawn(key, interval, fetch).await
    }

    /// Header profile, fetched once
    pub async fn user_profile(&self) -> Arc<Query<UserProfile>> {
        let provider = self.profile_provider.clone();
        let fetch: FetchFn<UserProfile> = Arc::new(move || {
            let provider = provider.clone();
            Box::pin(async move { provider.fetch_profile().await })
        });
        self.get_or_spawn(QueryKey::UserProfile, None, fetch).await
    }
}
