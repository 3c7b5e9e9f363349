//! Record normalization, threshold gating, and blacklist passes

pub mod blacklist;
pub mod normalize;
pub mod thresholds;

pub use blacklist::Blacklists;
pub use normalize::{normalize, normalize_all, MarketRecord};
pub use thresholds::{FilterThresholds, ThresholdSettings};
