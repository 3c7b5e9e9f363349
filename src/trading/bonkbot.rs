//! BonkBot command trader
//!
//! Execution stays simulated: a signal becomes the chat command a
//! human would type at the bot, delivered through the notifier.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::error::Result;
use crate::notify::Notifier;
use crate::trading::{TradeSignal, TradeSink};

pub struct BonkBotTrader {
    notifier: Arc<dyn Notifier>,
}

impl BonkBotTrader {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }
}

#[async_trait]
impl TradeSink for BonkBotTrader {
    async fn submit(&self, signal: &TradeSignal) -> Result<()> {
        let command = signal.as_command();
        info!(command = %command, "submitting trade command");
        self.notifier.notify(&command).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CapturingNotifier {
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Notifier for CapturingNotifier {
        async fn notify(&self, text: &str) -> Result<()> {
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_signal_is_delivered_as_chat_command() {
        let notifier = Arc::new(CapturingNotifier::default());
        let trader = BonkBotTrader::new(notifier.clone());

        trader.submit(&TradeSignal::buy("0xabc", 0.1)).await.unwrap();
        trader.submit(&TradeSignal::sell_all("0xdef")).await.unwrap();

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(*sent, vec!["/buy 0xabc 0.1", "/sell 0xdef all"]);
    }
}
