//! Token risk verdicts and the classification pass
//!
//! Every record that survives the filters gets one lookup against the
//! risk service. `Good` tokens continue down the pipeline, `Bundled`
//! tokens are dropped and blacklisted, anything else is dropped
//! without side effects.

pub mod rugcheck;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::filter::{Blacklists, MarketRecord};

pub use rugcheck::RugcheckClient;

/// Safety verdict for one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskVerdict {
    /// Service judged the token clean.
    Good,
    /// Supply is concentrated in coordinated wallets.
    Bundled,
    /// Any other or unrecognized status.
    Unknown,
}

impl RiskVerdict {
    pub fn from_status(status: &str) -> Self {
        match status {
            "Good" => Self::Good,
            "Bundled" => Self::Bundled,
            _ => Self::Unknown,
        }
    }
}

/// Raw report from the risk service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskReport {
    pub status: String,
    /// Supply distribution payload, kept opaque.
    #[serde(default)]
    pub supply: serde_json::Value,
}

impl RiskReport {
    pub fn verdict(&self) -> RiskVerdict {
        RiskVerdict::from_status(&self.status)
    }
}

/// Token risk lookup service.
#[async_trait]
pub trait RiskOracle: Send + Sync {
    async fn lookup(&self, token_address: &str) -> Result<RiskReport>;
}

/// Outcome counters for one classification pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RiskOutcome {
    pub accepted: usize,
    pub bundled: usize,
    pub rejected: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Runs every record through the oracle, one lookup per token.
///
/// `Bundled` is the only outcome that mutates the blacklists: the base
/// symbol joins the coin list and the token address joins the dev
/// list. Lookup failures drop the record and are logged here, never
/// propagated. Records without a token address are skipped without a
/// lookup.
pub async fn classify(
    oracle: &dyn RiskOracle,
    records: Vec<MarketRecord>,
    blacklists: &mut Blacklists,
) -> (Vec<MarketRecord>, RiskOutcome) {
    let mut accepted = Vec::with_capacity(records.len());
    let mut outcome = RiskOutcome::default();

    for record in records {
        if record.token_address.is_empty() {
            outcome.skipped += 1;
            debug!(pair = %record.pair, "skipping record without token address");
            continue;
        }

        match oracle.lookup(&record.token_address).await {
            Ok(report) => match report.verdict() {
                RiskVerdict::Good => {
                    outcome.accepted += 1;
                    accepted.push(record);
                }
                RiskVerdict::Bundled => {
                    outcome.bundled += 1;
                    let symbol = record.base_symbol().to_string();
                    blacklists.ban(&symbol, &record.token_address);
                    info!(
                        pair = %record.pair,
                        token = %record.token_address,
                        "bundled supply detected, token blacklisted"
                    );
                }
                RiskVerdict::Unknown => {
                    outcome.rejected += 1;
                    debug!(
                        pair = %record.pair,
                        status = %report.status,
                        "rejected by risk status"
                    );
                }
            },
            Err(err) => {
                outcome.failed += 1;
                warn!(pair = %record.pair, error = %err, "risk lookup failed");
            }
        }
    }

    (accepted, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FakeOracle {
        statuses: HashMap<String, String>,
        queried: Mutex<Vec<String>>,
    }

    impl FakeOracle {
        fn new(statuses: &[(&str, &str)]) -> Self {
            Self {
                statuses: statuses
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                queried: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RiskOracle for FakeOracle {
        async fn lookup(&self, token_address: &str) -> Result<RiskReport> {
            self.queried.lock().unwrap().push(token_address.to_string());
            match self.statuses.get(token_address) {
                Some(status) => Ok(RiskReport {
                    status: status.clone(),
                    supply: serde_json::json!({}),
                }),
                None => Err(Error::Service("lookup failed".to_string())),
            }
        }
    }

    fn record(pair: &str, token: &str) -> MarketRecord {
        MarketRecord {
            pair: pair.to_string(),
            price_usd: 1.0,
            volume_usd: 10_000.0,
            change_pct: 5.0,
            token_address: token.to_string(),
            creator: None,
        }
    }

    #[test]
    fn test_verdict_from_status() {
        assert_eq!(RiskVerdict::from_status("Good"), RiskVerdict::Good);
        assert_eq!(RiskVerdict::from_status("Bundled"), RiskVerdict::Bundled);
        assert_eq!(RiskVerdict::from_status("Danger"), RiskVerdict::Unknown);
        assert_eq!(RiskVerdict::from_status(""), RiskVerdict::Unknown);
    }

    #[test]
    fn test_report_payload_shape() {
        let report: RiskReport = serde_json::from_str(
            r#"{ "status": "Good", "supply": { "top10": 0.45 } }"#,
        )
        .unwrap();
        assert_eq!(report.verdict(), RiskVerdict::Good);
        assert_eq!(report.supply["top10"], 0.45);

        // supply is optional in the payload
        let bare: RiskReport = serde_json::from_str(r#"{ "status": "Bundled" }"#).unwrap();
        assert_eq!(bare.verdict(), RiskVerdict::Bundled);
    }

    #[tokio::test]
    async fn test_good_records_pass_through() {
        let oracle = FakeOracle::new(&[("0xaaa", "Good")]);
        let mut blacklists = Blacklists::default();

        let (kept, outcome) =
            classify(&oracle, vec![record("FOO/ETH", "0xaaa")], &mut blacklists).await;
        assert_eq!(kept.len(), 1);
        assert_eq!(outcome.accepted, 1);
        assert!(blacklists.is_empty());
    }

    #[tokio::test]
    async fn test_bundled_record_is_dropped_and_banned() {
        let oracle = FakeOracle::new(&[("0xbad", "Bundled")]);
        let mut blacklists = Blacklists::default();

        let (kept, outcome) =
            classify(&oracle, vec![record("BAZ/ETH", "0xbad")], &mut blacklists).await;
        assert!(kept.is_empty());
        assert_eq!(outcome.bundled, 1);
        assert!(blacklists.contains_symbol("BAZ"));
        assert!(blacklists.contains_dev("0xbad"));
    }

    #[tokio::test]
    async fn test_unknown_status_drops_without_mutation() {
        let oracle = FakeOracle::new(&[("0xccc", "Warning")]);
        let mut blacklists = Blacklists::default();

        let (kept, outcome) =
            classify(&oracle, vec![record("QUX/ETH", "0xccc")], &mut blacklists).await;
        assert!(kept.is_empty());
        assert_eq!(outcome.rejected, 1);
        assert!(blacklists.is_empty());
    }

    #[tokio::test]
    async fn test_lookup_failure_drops_without_mutation() {
        let oracle = FakeOracle::new(&[]);
        let mut blacklists = Blacklists::default();

        let (kept, outcome) =
            classify(&oracle, vec![record("ERR/ETH", "0xeee")], &mut blacklists).await;
        assert!(kept.is_empty());
        assert_eq!(outcome.failed, 1);
        assert!(blacklists.is_empty());
    }

    #[tokio::test]
    async fn test_empty_token_address_skips_lookup() {
        let oracle = FakeOracle::new(&[("0xaaa", "Good")]);
        let mut blacklists = Blacklists::default();

        let (kept, outcome) = classify(
            &oracle,
            vec![record("FOO/ETH", ""), record("BAR/ETH", "0xaaa")],
            &mut blacklists,
        )
        .await;
        assert_eq!(kept.len(), 1);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.accepted, 1);
        assert_eq!(*oracle.queried.lock().unwrap(), vec!["0xaaa".to_string()]);
    }
}
