//! Numeric threshold gate over normalized records

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::filter::MarketRecord;

/// Threshold block as persisted in the settings document. Every key is
/// required at run time; `Option` makes absence visible instead of
/// silently defaulting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSettings {
    pub min_price: Option<f64>,
    pub min_volume: Option<f64>,
    pub max_change: Option<f64>,
}

impl ThresholdSettings {
    /// Resolves to run-ready thresholds, failing on the first missing
    /// key. A missing key is a configuration error, not a record skip.
    pub fn resolve(&self) -> Result<FilterThresholds> {
        let min_price = self.min_price.ok_or(Error::MissingThreshold("min_price"))?;
        let min_volume = self
            .min_volume
            .ok_or(Error::MissingThreshold("min_volume"))?;
        let max_change = self
            .max_change
            .ok_or(Error::MissingThreshold("max_change"))?;

        Ok(FilterThresholds {
            min_price,
            min_volume,
            max_change,
        })
    }
}

/// Fully resolved thresholds used by one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterThresholds {
    pub min_price: f64,
    pub min_volume: f64,
    pub max_change: f64,
}

impl FilterThresholds {
    /// True when the record clears every gate. The gates are
    /// conjunctive and not individually switchable.
    pub fn accepts(&self, record: &MarketRecord) -> bool {
        record.price_usd >= self.min_price
            && record.volume_usd >= self.min_volume
            && record.change_pct <= self.max_change
    }

    /// Retains records clearing all three gates.
    pub fn apply(&self, records: Vec<MarketRecord>) -> Vec<MarketRecord> {
        let before = records.len();
        let kept: Vec<MarketRecord> = records.into_iter().filter(|r| self.accepts(r)).collect();
        debug!(before, after = kept.len(), "threshold filter applied");
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(price: f64, volume: f64, change: f64) -> MarketRecord {
        MarketRecord {
            pair: "FOO/ETH".to_string(),
            price_usd: price,
            volume_usd: volume,
            change_pct: change,
            token_address: "0xabc".to_string(),
            creator: None,
        }
    }

    fn thresholds() -> FilterThresholds {
        FilterThresholds {
            min_price: 0.01,
            min_volume: 1000.0,
            max_change: 80.0,
        }
    }

    #[test]
    fn test_resolve_fails_on_first_missing_key() {
        let settings = ThresholdSettings {
            min_price: None,
            min_volume: Some(1000.0),
            max_change: Some(80.0),
        };
        match settings.resolve().unwrap_err() {
            Error::MissingThreshold(key) => assert_eq!(key, "min_price"),
            other => panic!("unexpected error: {other:?}"),
        }

        let settings = ThresholdSettings {
            min_price: Some(0.01),
            min_volume: Some(1000.0),
            max_change: None,
        };
        match settings.resolve().unwrap_err() {
            Error::MissingThreshold(key) => assert_eq!(key, "max_change"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_resolve_succeeds_when_all_present() {
        let settings = ThresholdSettings {
            min_price: Some(0.01),
            min_volume: Some(1000.0),
            max_change: Some(80.0),
        };
        let resolved = settings.resolve().unwrap();
        assert_eq!(resolved.min_price, 0.01);
        assert_eq!(resolved.min_volume, 1000.0);
        assert_eq!(resolved.max_change, 80.0);
    }

    #[test]
    fn test_gates_are_conjunctive() {
        let t = thresholds();
        assert!(t.accepts(&record(0.05, 50_000.0, 10.0)));
        // each gate failing alone rejects the record
        assert!(!t.accepts(&record(0.005, 50_000.0, 10.0)));
        assert!(!t.accepts(&record(0.05, 500.0, 10.0)));
        assert!(!t.accepts(&record(0.05, 50_000.0, 90.0)));
    }

    #[test]
    fn test_boundary_values_pass() {
        let t = thresholds();
        assert!(t.accepts(&record(0.01, 1000.0, 80.0)));
    }

    #[test]
    fn test_apply_is_order_independent() {
        let t = thresholds();
        let a = record(0.05, 50_000.0, 10.0);
        let b = record(0.005, 50_000.0, 10.0);
        let c = record(1.0, 2_000_000.0, 60.0);

        let forward = t.apply(vec![a.clone(), b.clone(), c.clone()]);
        let backward = t.apply(vec![c.clone(), b, a]);
        assert_eq!(forward.len(), 2);
        assert_eq!(backward.len(), 2);
        assert!(forward.iter().all(|r| backward.contains(r)));
    }
}
