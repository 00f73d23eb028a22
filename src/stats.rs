//! Aggregate figures over market records
//!
//! Every division goes through [`ratio`], which yields `None` for a zero or
//! non-finite denominator instead of producing `inf`/`NaN`.

use crate::types::MarketRecord;

/// `numerator / denominator`, or `None` if the result would not be finite
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 || !denominator.is_finite() || !numerator.is_finite() {
        return None;
    }
    Some(numerator / denominator)
}

/// `numerator` as a percentage of `denominator`
pub fn percent_of(numerator: f64, denominator: f64) -> Option<f64> {
    ratio(numerator * 100.0, denominator)
}

/// Share of the total market cap held by `record`, in percent
pub fn market_share(record: &MarketRecord, total_market_cap: f64) -> Option<f64> {
    percent_of(record.market_cap?, total_market_cap)
}

/// Summary of a market listing
#[derive(Debug, Clone, PartialEq)]
pub struct MarketStats {
    pub coin_count: usize,
    pub total_market_cap: f64,
    pub total_volume: f64,
    pub gainers: usize,
    pub losers: usize,
    pub top_gainer: Option<MarketRecord>,
    pub top_loser: Option<MarketRecord>,
}

impl MarketStats {
    /// Returns `None` for an empty listing
    pub fn from_records(records: &[MarketRecord]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }

        let total_market_cap = records.iter().filter_map(|r| r.market_cap).sum();
        let total_volume = records.iter().filter_map(|r| r.total_volume).sum();
        let changes = || {
            records
                .iter()
                .filter_map(|r| finite_change(r).map(|change| (r, change)))
        };

        Some(Self {
            coin_count: records.len(),
            total_market_cap,
            total_volume,
            gainers: changes().filter(|(_, change)| *change > 0.0).count(),
            losers: changes().filter(|(_, change)| *change < 0.0).count(),
            top_gainer: changes()
                .filter(|(_, change)| *change > 0.0)
                .max_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(r, _)| r.clone()),
            top_loser: changes()
                .filter(|(_, change)| *change < 0.0)
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(r, _)| r.clone()),
        })
    }

    /// Share of the listing's total market cap held by `record`
    pub fn market_share(&self, record: &MarketRecord) -> Option<f64> {
        market_share(record, self.total_market_cap)
    }
}

/// Summary of the favorited coins
#[derive(Debug, Clone, PartialEq)]
pub struct FavoritesStats {
    pub count: usize,
    pub top_performer: Option<MarketRecord>,
    pub worst_performer: Option<MarketRecord>,
    pub average_change: Option<f64>,
    pub total_market_cap: f64,
    pub gainers: usize,
    pub losers: usize,
}

impl FavoritesStats {
    /// Returns `None` when no favorites resolved to records
    pub fn from_records(records: &[MarketRecord]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }

        let with_change: Vec<(&MarketRecord, f64)> = records
            .iter()
            .filter_map(|r| finite_change(r).map(|change| (r, change)))
            .collect();

        let change_sum: f64 = with_change.iter().map(|(_, change)| change).sum();

        Some(Self {
            count: records.len(),
            top_performer: with_change
                .iter()
                .max_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(r, _)| (*r).clone()),
            worst_performer: with_change
                .iter()
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(r, _)| (*r).clone()),
            average_change: ratio(change_sum, with_change.len() as f64),
            total_market_cap: records.iter().filter_map(|r| r.market_cap).sum(),
            gainers: with_change.iter().filter(|(_, c)| *c > 0.0).count(),
            losers: with_change.iter().filter(|(_, c)| *c < 0.0).count(),
        })
    }
}

fn finite_change(record: &MarketRecord) -> Option<f64> {
    record
        .price_change_percentage_24h
        .filter(|change| change.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::sample_records;

    #[test]
    fn test_guarded_division() {
        assert_eq!(ratio(1.0, 0.0), None);
        assert_eq!(ratio(f64::NAN, 2.0), None);
        assert_eq!(ratio(3.0, 2.0), Some(1.5));
        assert_eq!(percent_of(25.0, 200.0), Some(12.5));
        assert_eq!(percent_of(-10.0, 100.0), Some(-10.0));
        assert_eq!(percent_of(5.0, 0.0), None);
    }

    #[test]
    fn test_market_stats() {
        let stats = MarketStats::from_records(&sample_records()).unwrap();
        assert_eq!(stats.coin_count, 5);
        assert_eq!(stats.total_market_cap, 1.3e12 + 4.6e11 + 1.1e11 + 8.0e10 + 8.7e10);
        assert_eq!(stats.gainers, 3);
        assert_eq!(stats.losers, 2);
        assert_eq!(stats.top_gainer.map(|r| r.id).as_deref(), Some("solana"));
        assert_eq!(stats.top_loser.map(|r| r.id).as_deref(), Some("ethereum"));

        assert!(MarketStats::from_records(&[]).is_none());
    }

    #[test]
    fn test_market_share() {
        let records = sample_records();
        let bitcoin = &records[0];
        assert_eq!(market_share(bitcoin, 2.6e12), Some(50.0));
        assert_eq!(market_share(bitcoin, 0.0), None);

        let mut unknown = bitcoin.clone();
        unknown.market_cap = None;
        assert_eq!(market_share(&unknown, 2.6e12), None);
    }

    #[test]
    fn test_favorites_stats() {
        let records: Vec<MarketRecord> = sample_records()
            .into_iter()
            .filter(|r| r.id == "bitcoin" || r.id == "ethereum")
            .collect();
        let stats = FavoritesStats::from_records(&records).unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.top_performer.map(|r| r.id).as_deref(), Some("bitcoin"));
        assert_eq!(stats.worst_performer.map(|r| r.id).as_deref(), Some("ethereum"));
        let average = stats.average_change.unwrap();
        assert!((average - 0.65).abs() < 1e-9);
        assert_eq!(stats.gainers, 1);
        assert_eq!(stats.losers, 1);
    }

    #[test]
    fn test_favorites_stats_without_changes() {
        let mut record = sample_records().remove(0);
        record.price_change_percentage_24h = None;
        let stats = FavoritesStats::from_records(&[record]).unwrap();
        assert_eq!(stats.average_change, None);
        assert!(stats.top_performer.is_none());
        assert!(FavoritesStats::from_records(&[]).is_none());
    }
}
