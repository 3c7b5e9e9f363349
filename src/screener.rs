//! Listing feed client producing raw, display-formatted rows

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::ScreenerConfig;
use crate::error::{Error, Result};

/// One row from the listing feed, numeric fields still in display
/// formatting (`$0.0012`, `1,234,567`, `12.5%`).
#[derive(Debug, Clone, PartialEq)]
pub struct RawListing {
    pub pair: String,
    pub price: String,
    pub volume: String,
    pub change: String,
    pub token_address: String,
}

/// Source of raw listings for one scan cycle.
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch_listings(&self) -> Result<Vec<RawListing>>;
}

#[derive(Debug, Clone, Deserialize)]
struct SearchResponse {
    pairs: Option<Vec<PairDto>>,
}

#[derive(Debug, Clone, Deserialize)]
struct PairDto {
    #[serde(rename = "chainId")]
    chain_id: String,
    #[serde(rename = "baseToken")]
    base_token: TokenDto,
    #[serde(rename = "quoteToken")]
    quote_token: TokenDto,
    #[serde(rename = "priceUsd")]
    price_usd: Option<String>,
    volume: Option<VolumeDto>,
    #[serde(rename = "priceChange")]
    price_change: Option<ChangeDto>,
}

#[derive(Debug, Clone, Deserialize)]
struct TokenDto {
    address: String,
    symbol: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct VolumeDto {
    h24: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChangeDto {
    h24: Option<f64>,
}

/// DexScreener-compatible search client.
pub struct DexScreenerClient {
    client: reqwest::Client,
    base_url: String,
    chain: String,
}

impl DexScreenerClient {
    pub fn new(config: &ScreenerConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            chain: config.chain.clone(),
        })
    }

    /// Maps one pair DTO to a raw listing. Rows missing any of the
    /// fields the pipeline needs are skipped here.
    fn pair_to_listing(pair: &PairDto) -> Option<RawListing> {
        let base = pair.base_token.symbol.as_deref()?;
        let quote = pair.quote_token.symbol.as_deref()?;
        let price = pair.price_usd.clone()?;
        let volume = pair.volume.as_ref().and_then(|v| v.h24)?;
        let change = pair.price_change.as_ref().and_then(|c| c.h24)?;

        if pair.base_token.address.is_empty() {
            return None;
        }

        Some(RawListing {
            pair: format!("{}/{}", base, quote),
            price,
            volume: volume.to_string(),
            change: change.to_string(),
            token_address: pair.base_token.address.clone(),
        })
    }

    /// Keeps rows on the configured chain and maps them to listings.
    fn collect_listings(&self, body: SearchResponse) -> Vec<RawListing> {
        let pairs = body.pairs.unwrap_or_default();

        let mut listings = Vec::with_capacity(pairs.len());
        let mut skipped = 0usize;
        for pair in pairs.iter().filter(|p| p.chain_id == self.chain) {
            match Self::pair_to_listing(pair) {
                Some(listing) => listings.push(listing),
                None => skipped += 1,
            }
        }

        debug!(
            total = pairs.len(),
            kept = listings.len(),
            skipped,
            "fetched listing feed"
        );
        listings
    }
}

#[async_trait]
impl ListingSource for DexScreenerClient {
    async fn fetch_listings(&self) -> Result<Vec<RawListing>> {
        let url = format!("{}/latest/dex/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", self.chain.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Http(format!("listing feed returned {status}")));
        }

        let body: SearchResponse = response.json().await?;
        Ok(self.collect_listings(body))
    }
}
