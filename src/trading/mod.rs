//! Trade signals and the sinks that receive them

pub mod bonkbot;

use async_trait::async_trait;
use std::fmt;
use tracing::info;

use crate::error::Result;

pub use bonkbot::BonkBotTrader;

/// Direction of a trade signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeAction {
    Buy,
    Sell,
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// Trade size: a fixed quote amount or the whole position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TradeAmount {
    Fixed(f64),
    All,
}

impl fmt::Display for TradeAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(amount) => write!(f, "{amount}"),
            Self::All => write!(f, "all"),
        }
    }
}

/// One simulated trade instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeSignal {
    pub action: TradeAction,
    pub token_address: String,
    pub amount: TradeAmount,
}

impl TradeSignal {
    pub fn buy(token_address: &str, amount: f64) -> Self {
        Self {
            action: TradeAction::Buy,
            token_address: token_address.to_string(),
            amount: TradeAmount::Fixed(amount),
        }
    }

    pub fn sell_all(token_address: &str) -> Self {
        Self {
            action: TradeAction::Sell,
            token_address: token_address.to_string(),
            amount: TradeAmount::All,
        }
    }

    /// Chat command understood by the trading bot.
    pub fn as_command(&self) -> String {
        format!("/{} {} {}", self.action, self.token_address, self.amount)
    }
}

/// Receiver of trade signals.
#[async_trait]
pub trait TradeSink: Send + Sync {
    async fn submit(&self, signal: &TradeSignal) -> Result<()>;
}

/// Logs signals without submitting them anywhere. Dry-run sink.
#[derive(Debug, Default)]
pub struct PaperTradeSink;

#[async_trait]
impl TradeSink for PaperTradeSink {
    async fn submit(&self, signal: &TradeSignal) -> Result<()> {
        info!(command = %signal.as_command(), "paper trade");
        Ok(())
    }
}
