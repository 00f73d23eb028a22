//! Query health metrics collection and reporting
//!
//! Tracks latency percentiles and success rates for each polled query.

use crate::constants::METRICS_WINDOW;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::RwLock;

/// Metrics for a single query
#[derive(Debug, Clone, PartialEq)]
pub struct QueryMetrics {
    /// Query identity (`QueryKey` display form)
    pub query: String,
    /// 50th percentile latency in milliseconds
    pub latency_p50_ms: f64,
    /// 99th percentile latency in milliseconds
    pub latency_p99_ms: f64,
    /// Success rate (0.0 to 1.0)
    pub success_rate: f64,
    /// Total number of requests issued
    pub total_requests: u64,
    /// Number of failed requests
    pub failed_requests: u64,
    /// Responses discarded because a newer one had already been applied
    pub stale_responses: u64,
}

impl QueryMetrics {
    /// Creates metrics with no data
    pub fn empty(query: &str) -> Self {
        Self {
            query: query.to_string(),
            latency_p50_ms: 0.0,
            latency_p99_ms: 0.0,
            success_rate: 1.0,
            total_requests: 0,
            failed_requests: 0,
            stale_responses: 0,
        }
    }
}

#[derive(Debug, Clone)]
struct LatencySample {
    duration_ms: f64,
    success: bool,
}

#[derive(Debug, Default)]
struct Counters {
    samples: VecDeque<LatencySample>,
    total: u64,
    failed: u64,
    stale: u64,
}

/// Collects and computes metrics for one query
pub struct MetricsCollector {
    query: String,
    counters: RwLock<Counters>,
}

impl MetricsCollector {
    /// Creates a new metrics collector for a query
    pub fn new(query: &str) -> Self {
        Self {
            query: query.to_string(),
            counters: RwLock::new(Counters {
                samples: VecDeque::with_capacity(METRICS_WINDOW),
                ..Default::default()
            }),
        }
    }

    /// Records a request with its duration and success status
    pub async fn record_request(&self, duration: Duration, success: bool) {
        let mut counters = self.counters.write().await;
        counters.total += 1;
        if !success {
            counters.failed += 1;
        }

        if counters.samples.len() >= METRICS_WINDOW {
            counters.samples.pop_front();
        }
        counters.samples.push_back(LatencySample {
            duration_ms: duration.as_secs_f64() * 1000.0,
            success,
        });
    }

    /// Records a response that arrived after a newer one was applied
    pub async fn record_stale(&self) {
        self.counters.write().await.stale += 1;
    }

    /// Computes current metrics from collected samples
    pub async fn get_metrics(&self) -> QueryMetrics {
        let counters = self.counters.read().await;

        if counters.samples.is_empty() {
            return QueryMetrics {
                stale_responses: counters.stale,
                ..QueryMetrics::empty(&self.query)
            };
        }

        // Only successful requests count towards latency
        let mut latencies: Vec<f64> = counters
            .samples
            .iter()
            .filter(|s| s.success)
            .map(|s| s.duration_ms)
            .collect();

        latencies.sort_by(|a, b| a.total_cmp(b));

        let success_rate = if counters.total > 0 {
            (counters.total - counters.failed) as f64 / counters.total as f64
        } else {
            1.0
        };

        QueryMetrics {
            query: self.query.clone(),
            latency_p50_ms: percentile(&latencies, 50.0),
            latency_p99_ms: percentile(&latencies, 99.0),
            success_rate,
            total_requests: counters.total,
            failed_requests: counters.failed,
            stale_responses: counters.stale,
        }
    }
}

/// Calculate percentile from sorted values
fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    let idx = (p / 100.0 * (sorted_values.len() - 1) as f64).round() as usize;
    sorted_values[idx.min(sorted_values.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_metrics_collector() {
        let collector = MetricsCollector::new("markets(50,1)");

        collector.record_request(Duration::from_millis(100), true).await;
        collector.record_request(Duration::from_millis(200), true).await;
        collector.record_request(Duration::from_millis(150), false).await;
        collector.record_stale().await;

        let metrics = collector.get_metrics().await;

        assert_eq!(metrics.query, "markets(50,1)");
        assert_eq!(metrics.total_requests, 3);
        assert_eq!(metrics.failed_requests, 1);
        assert_eq!(metrics.stale_responses, 1);
        assert!(metrics.success_rate > 0.6 && metrics.success_rate < 0.7);
    }

    #[tokio::test]
    async fn test_window_is_bounded() {
        let collector = MetricsCollector::new("profile");
        for i in 0..(METRICS_WINDOW + 20) {
            collector
                .record_request(Duration::from_millis(i as u64), true)
                .await;
        }
        assert_eq!(
            collector.counters.read().await.samples.len(),
            METRICS_WINDOW
        );
        assert_eq!(
            collector.get_metrics().await.total_requests,
            (METRICS_WINDOW + 20) as u64
        );
    }

    #[test]
    fn test_percentile() {
        let values: Vec<f64> = (1..=11).map(f64::from).collect();
        assert_eq!(percentile(&values, 50.0), 6.0);
        assert_eq!(percentile(&values, 99.0), 11.0);
        assert_eq!(percentile(&[], 50.0), 0.0);
    }
}
