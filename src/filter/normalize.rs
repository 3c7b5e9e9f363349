//! Turns raw feed rows into typed market records

use tracing::warn;

use crate::error::{Error, Result};
use crate::screener::RawListing;

/// A listing with parsed numeric fields, ready for filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketRecord {
    pub pair: String,
    pub price_usd: f64,
    pub volume_usd: f64,
    pub change_pct: f64,
    pub token_address: String,
    /// Creator address when the feed supplies one.
    pub creator: Option<String>,
}

impl MarketRecord {
    /// Trading symbol before the `/` in the pair label.
    pub fn base_symbol(&self) -> &str {
        self.pair.split('/').next().unwrap_or_default()
    }
}

fn strip_formatting(value: &str) -> String {
    value.trim().replace(['$', ',', '%'], "")
}

fn parse_field(field: &'static str, value: &str) -> Result<f64> {
    strip_formatting(value).parse::<f64>().map_err(|_| Error::Parse {
        field,
        value: value.to_string(),
    })
}

/// Parses one raw listing. Price and volume must come out finite and
/// non-negative, change finite; anything else is a `Parse` error.
pub fn normalize(raw: &RawListing) -> Result<MarketRecord> {
    let price_usd = parse_field("price", &raw.price)?;
    let volume_usd = parse_field("volume", &raw.volume)?;
    let change_pct = parse_field("change", &raw.change)?;

    if !price_usd.is_finite() || price_usd < 0.0 {
        return Err(Error::Parse {
            field: "price",
            value: raw.price.clone(),
        });
    }
    if !volume_usd.is_finite() || volume_usd < 0.0 {
        return Err(Error::Parse {
            field: "volume",
            value: raw.volume.clone(),
        });
    }
    if !change_pct.is_finite() {
        return Err(Error::Parse {
            field: "change",
            value: raw.change.clone(),
        });
    }

    Ok(MarketRecord {
        pair: raw.pair.trim().to_string(),
        price_usd,
        volume_usd,
        change_pct,
        token_address: raw.token_address.trim().to_string(),
        creator: None,
    })
}

/// Normalizes a batch, dropping rows that fail to parse. Drops are
/// logged per row and never abort the batch.
pub fn normalize_all(raws: &[RawListing]) -> Vec<MarketRecord> {
    let mut records = Vec::with_capacity(raws.len());
    let mut dropped = 0usize;

    for raw in raws {
        match normalize(raw) {
            Ok(record) => records.push(record),
            Err(err) => {
                dropped += 1;
                warn!(pair = %raw.pair, error = %err, "dropping unparseable listing");
            }
        }
    }

    if dropped > 0 {
        warn!(dropped, kept = records.len(), "normalization dropped rows");
    }
    records
}
