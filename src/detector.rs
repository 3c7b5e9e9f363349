//! Market event detection over risk-cleared records

use tracing::debug;

use crate::config::DetectorConfig;
use crate::filter::{Blacklists, FilterThresholds, MarketRecord};

/// A named market event tied to the record that triggered it. At most
/// one event is produced per record.
#[derive(Debug, Clone, PartialEq)]
pub enum MarketEvent {
    RugPull(MarketRecord),
    Pump(MarketRecord),
    Tier1(MarketRecord),
}

impl MarketEvent {
    /// Event name as it appears in alerts.
    pub fn label(&self) -> &'static str {
        match self {
            Self::RugPull(_) => "Rug Pull",
            Self::Pump(_) => "Pump",
            Self::Tier1(_) => "Tier-1",
        }
    }

    pub fn record(&self) -> &MarketRecord {
        match self {
            Self::RugPull(r) | Self::Pump(r) | Self::Tier1(r) => r,
        }
    }

    /// Alert line sent to the notification channel.
    pub fn alert_text(&self) -> String {
        format!("Alert: {} detected for {}", self.label(), self.record().pair)
    }
}

impl std::fmt::Display for MarketEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Applies the event rules in fixed priority order.
pub struct EventDetector {
    config: DetectorConfig,
}

impl EventDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Classifies one record, first matching rule wins. The price
    /// floor is evaluated here against the run's thresholds,
    /// independent of the earlier filter pass.
    pub fn classify(
        &self,
        record: &MarketRecord,
        thresholds: &FilterThresholds,
    ) -> Option<MarketEvent> {
        if record.price_usd < thresholds.min_price {
            Some(MarketEvent::RugPull(record.clone()))
        } else if record.change_pct > self.config.pump_change_pct {
            Some(MarketEvent::Pump(record.clone()))
        } else if record.volume_usd > self.config.tier1_volume_usd {
            Some(MarketEvent::Tier1(record.clone()))
        } else {
            None
        }
    }

    /// Scans a batch for events, skipping blacklisted symbols. The
    /// blacklist passed in is the post-classification state, so a
    /// symbol banned earlier in the same run is excluded here too.
    pub fn detect(
        &self,
        records: &[MarketRecord],
        thresholds: &FilterThresholds,
        blacklists: &Blacklists,
    ) -> Vec<MarketEvent> {
        let mut events = Vec::new();
        for record in records {
            if blacklists.contains_symbol(record.base_symbol()) {
                debug!(pair = %record.pair, "skipping blacklisted symbol");
                continue;
            }
            if let Some(event) = self.classify(record, thresholds) {
                debug!(pair = %record.pair, event = %event.label(), "event detected");
                events.push(event);
            }
        }
        events
    }
}
