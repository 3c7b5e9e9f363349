//! Alert delivery channels

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::TelegramConfig;
use crate::error::{Error, Result};

/// Outbound alert channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, text: &str) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Delivers alerts to a Telegram chat through the Bot API.
pub struct TelegramNotifier {
    client: reqwest::Client,
    api_base: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            bot_token: config.bot_token.clone(),
            chat_id: config.chat_id.clone(),
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);
        let response = self
            .client
            .post(&url)
            .json(&json!({ "chat_id": self.chat_id, "text": text }))
            .send()
            .await
            .map_err(|e| Error::Notify(format!("telegram request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Notify(format!("telegram returned {status}: {body}")));
        }

        let body: TelegramResponse = response
            .json()
            .await
            .map_err(|e| Error::Notify(format!("malformed telegram response: {e}")))?;
        if !body.ok {
            return Err(Error::Notify(body.description.unwrap_or_else(|| {
                "telegram rejected the message".to_string()
            })));
        }

        debug!(chars = text.len(), "notification sent");
        Ok(())
    }
}

/// Logs alerts instead of delivering them. Used for dry runs and when
/// Telegram is not configured.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(&self, text: &str) -> Result<()> {
        info!(alert = %text, "console notification");
        Ok(())
    }
}
