//! RugCheck-style risk service client

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::config::RugcheckConfig;
use crate::error::{Error, Result};
use crate::risk::{RiskOracle, RiskReport};

pub struct RugcheckClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RugcheckClient {
    pub fn new(config: &RugcheckConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl RiskOracle for RugcheckClient {
    async fn lookup(&self, token_address: &str) -> Result<RiskReport> {
        let url = format!("{}/v2/token/{}", self.base_url, token_address);
        debug!(token = %token_address, "querying risk service");

        let mut request = self.client.get(&url);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Service(format!(
                "risk service returned {status}: {body}"
            )));
        }

        let report: RiskReport = response
            .json()
            .await
            .map_err(|e| Error::Service(format!("malformed risk payload: {e}")))?;
        Ok(report)
    }
}
