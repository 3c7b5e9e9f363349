//! Scan pipeline: one cycle end to end, plus the watch loop
//!
//! A cycle runs fetch, normalize, threshold filter, blacklist filter,
//! risk classification, settings flush, event detection, audit append,
//! and dispatch, strictly in that order. Only missing thresholds abort
//! a cycle; every other failure degrades the cycle and is logged.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::DetectorConfig;
use crate::detector::{EventDetector, MarketEvent};
use crate::error::Result;
use crate::filter::normalize;
use crate::notify::Notifier;
use crate::risk::{self, RiskOracle};
use crate::screener::ListingSource;
use crate::store::{RecordStore, SettingsStore};
use crate::trading::{TradeSignal, TradeSink};

/// Counters from one scan cycle, logged as the run summary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub run_id: String,
    pub fetched: usize,
    pub normalized: usize,
    pub after_thresholds: usize,
    pub after_blacklists: usize,
    pub accepted: usize,
    pub bundled: usize,
    pub events: usize,
    pub signals: usize,
}

pub struct Pipeline {
    source: Arc<dyn ListingSource>,
    oracle: Arc<dyn RiskOracle>,
    notifier: Arc<dyn Notifier>,
    trader: Arc<dyn TradeSink>,
    settings: SettingsStore,
    records: RecordStore,
    detector: EventDetector,
    buy_amount: f64,
}

impl Pipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source: Arc<dyn ListingSource>,
        oracle: Arc<dyn RiskOracle>,
        notifier: Arc<dyn Notifier>,
        trader: Arc<dyn TradeSink>,
        settings: SettingsStore,
        records: RecordStore,
        detector: DetectorConfig,
        buy_amount: f64,
    ) -> Self {
        Self {
            source,
            oracle,
            notifier,
            trader,
            settings,
            records,
            detector: EventDetector::new(detector),
            buy_amount,
        }
    }

    /// Executes one scan cycle.
    ///
    /// Missing threshold keys abort the cycle before any record is
    /// touched; the next tick retries with whatever the settings file
    /// holds then. A failed fetch becomes an empty batch. Settings are
    /// flushed exactly once, after classification and before dispatch.
    pub async fn run_once(&self) -> Result<RunSummary> {
        let run_id = Uuid::new_v4().to_string();
        let mut summary = RunSummary {
            run_id: run_id.clone(),
            ..Default::default()
        };

        let mut settings = self.settings.load().await?;
        let thresholds = settings.filters.resolve()?;

        let raw = match self.source.fetch_listings().await {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "listing fetch failed, continuing with empty batch");
                Vec::new()
            }
        };
        summary.fetched = raw.len();

        let records = normalize::normalize_all(&raw);
        summary.normalized = records.len();

        let records = thresholds.apply(records);
        summary.after_thresholds = records.len();

        let records = settings.blacklists.apply(records);
        summary.after_blacklists = records.len();

        let (accepted, outcome) =
            risk::classify(self.oracle.as_ref(), records, &mut settings.blacklists).await;
        summary.accepted = accepted.len();
        summary.bundled = outcome.bundled;

        if let Err(err) = self.settings.save(&settings).await {
            warn!(error = %err, "failed to persist settings, continuing in memory");
        }

        let events = self
            .detector
            .detect(&accepted, &thresholds, &settings.blacklists);
        summary.events = events.len();

        if let Err(err) = self.records.append_all(&run_id, &accepted).await {
            warn!(error = %err, "failed to append audit records");
        }

        for event in &events {
            self.dispatch(event, &mut summary).await;
        }

        info!(
            run_id = %summary.run_id,
            fetched = summary.fetched,
            normalized = summary.normalized,
            after_thresholds = summary.after_thresholds,
            after_blacklists = summary.after_blacklists,
            accepted = summary.accepted,
            bundled = summary.bundled,
            events = summary.events,
            signals = summary.signals,
            "scan cycle complete"
        );
        Ok(summary)
    }

    /// Sends the alert for one event, then the trade signal it calls
    /// for. Neither failure is fatal; a failed alert does not suppress
    /// the trade signal.
    async fn dispatch(&self, event: &MarketEvent, summary: &mut RunSummary) {
        let text = event.alert_text();
        if let Err(err) = self.notifier.notify(&text).await {
            warn!(error = %err, alert = %text, "notification failed");
        }

        let signal = match event {
            MarketEvent::Pump(record) => {
                Some(TradeSignal::buy(&record.token_address, self.buy_amount))
            }
            MarketEvent::RugPull(record) => Some(TradeSignal::sell_all(&record.token_address)),
            MarketEvent::Tier1(_) => None,
        };

        if let Some(signal) = signal {
            summary.signals += 1;
            if let Err(err) = self.trader.submit(&signal).await {
                warn!(error = %err, command = %signal.as_command(), "trade signal failed");
            }
        }
    }

    /// Drives scan cycles on a fixed wall-clock interval until the
    /// token is cancelled. Ticks that fall due while a cycle is still
    /// running are skipped, so slow cycles delay but never stack. A
    /// cycle in flight completes before the loop exits.
    pub async fn run(&self, every: Duration, shutdown: CancellationToken) {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(every_secs = every.as_secs(), "watch loop started");
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(err) = self.run_once().await {
                        error!(error = %err, "scan cycle failed");
                    }
                }
                _ = shutdown.cancelled() => {
                    info!("watch loop stopping");
                    break;
                }
            }
        }
    }
}
