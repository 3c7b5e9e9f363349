//! Coin and dev blacklists persisted across runs

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

use crate::filter::MarketRecord;

/// Persisted blacklists. Coin entries are trading symbols, dev entries
/// are creator or token addresses. Ordered sets keep the saved
/// document stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Blacklists {
    #[serde(default)]
    pub coin_blacklist: BTreeSet<String>,
    #[serde(default)]
    pub dev_blacklist: BTreeSet<String>,
}

impl Blacklists {
    pub fn contains_symbol(&self, symbol: &str) -> bool {
        self.coin_blacklist.contains(symbol)
    }

    pub fn contains_dev(&self, address: &str) -> bool {
        self.dev_blacklist.contains(address)
    }

    /// Bans a bundled token: the symbol joins the coin list and the
    /// token address joins the dev list. Returns true when either list
    /// actually grew.
    pub fn ban(&mut self, symbol: &str, token_address: &str) -> bool {
        let coin_added = self.coin_blacklist.insert(symbol.to_string());
        let dev_added = self.dev_blacklist.insert(token_address.to_string());
        coin_added || dev_added
    }

    /// Removes records with a blacklisted base symbol, then records
    /// with a blacklisted creator. A record without a creator never
    /// matches the dev pass.
    pub fn apply(&self, records: Vec<MarketRecord>) -> Vec<MarketRecord> {
        let before = records.len();
        let kept: Vec<MarketRecord> = records
            .into_iter()
            .filter(|r| !self.contains_symbol(r.base_symbol()))
            .filter(|r| !r.creator.as_deref().is_some_and(|c| self.contains_dev(c)))
            .collect();
        debug!(before, after = kept.len(), "blacklist filter applied");
        kept
    }

    pub fn len(&self) -> usize {
        self.coin_blacklist.len() + self.dev_blacklist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coin_blacklist.is_empty() && self.dev_blacklist.is_empty()
    }
}
