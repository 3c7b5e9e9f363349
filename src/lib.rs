//! Dexwatch Library
//!
//! Scheduled DexScreener watcher: fetches token listings, filters them through
//! thresholds, blacklists and a rug-check service, then turns what survives
//! into Telegram alerts and trade commands.

pub mod cli;
pub mod config;
pub mod detector;
pub mod error;
pub mod filter;
pub mod notify;
pub mod pipeline;
pub mod risk;
pub mod screener;
pub mod store;
pub mod trading;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
