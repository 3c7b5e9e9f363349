//! Runtime configuration loaded from `config.toml` and `DEXWATCH_*` env vars

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

fn default_screener_base_url() -> String {
    std::env::var("SCREENER_BASE_URL")
        .unwrap_or_else(|_| "https://api.dexscreener.com".to_string())
}

fn default_screener_chain() -> String {
    "ethereum".to_string()
}

fn default_http_timeout_ms() -> u64 {
    10_000
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36"
        .to_string()
}

fn default_rugcheck_base_url() -> String {
    "https://api.rugcheck.xyz".to_string()
}

fn default_rugcheck_api_key() -> String {
    std::env::var("RUGCHECK_API_KEY").unwrap_or_default()
}

fn default_telegram_api_base() -> String {
    "https://api.telegram.org".to_string()
}

fn default_telegram_bot_token() -> String {
    std::env::var("TELEGRAM_BOT_TOKEN").unwrap_or_default()
}

fn default_telegram_chat_id() -> String {
    std::env::var("TELEGRAM_CHAT_ID").unwrap_or_default()
}

fn default_buy_amount() -> f64 {
    0.1
}

fn default_pump_change_pct() -> f64 {
    50.0
}

fn default_tier1_volume_usd() -> f64 {
    1_000_000.0
}

fn default_database_path() -> String {
    "dexwatch.db".to_string()
}

fn default_settings_path() -> String {
    "settings.json".to_string()
}

fn default_interval_secs() -> u64 {
    300
}

/// Listing endpoint settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ScreenerConfig {
    /// Base URL of the DexScreener-compatible API.
    #[serde(default = "default_screener_base_url")]
    pub base_url: String,

    /// Chain the feed is scoped to, also used as the search term.
    #[serde(default = "default_screener_chain")]
    pub chain: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub timeout_ms: u64,

    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            base_url: default_screener_base_url(),
            chain: default_screener_chain(),
            timeout_ms: default_http_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

/// Rugcheck risk API settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RugcheckConfig {
    #[serde(default = "default_rugcheck_base_url")]
    pub base_url: String,

    /// Optional API key, sent as a bearer token when present.
    #[serde(default = "default_rugcheck_api_key")]
    pub api_key: String,

    #[serde(default = "default_http_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for RugcheckConfig {
    fn default() -> Self {
        Self {
            base_url: default_rugcheck_base_url(),
            api_key: default_rugcheck_api_key(),
            timeout_ms: default_http_timeout_ms(),
        }
    }
}

/// Telegram delivery settings, shared by alerts and trade commands.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    #[serde(default = "default_telegram_api_base")]
    pub api_base: String,

    #[serde(default = "default_telegram_bot_token")]
    pub bot_token: String,

    /// Chat that receives alerts and BonkBot commands.
    #[serde(default = "default_telegram_chat_id")]
    pub chat_id: String,

    #[serde(default = "default_http_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: default_telegram_api_base(),
            bot_token: default_telegram_bot_token(),
            chat_id: default_telegram_chat_id(),
            timeout_ms: default_http_timeout_ms(),
        }
    }
}

/// Trade dispatch settings.
#[derive(Debug, Clone, Deserialize)]
pub struct TradingConfig {
    /// When false, trade signals go to the paper sink instead of the
    /// bot chat.
    #[serde(default)]
    pub enabled: bool,

    /// Amount attached to buy commands, in the bot's quote currency.
    #[serde(default = "default_buy_amount")]
    pub buy_amount: f64,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            buy_amount: default_buy_amount(),
        }
    }
}

/// Event detection cutoffs.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectorConfig {
    /// 24h change above this is classified as a pump.
    #[serde(default = "default_pump_change_pct")]
    pub pump_change_pct: f64,

    /// 24h volume above this is classified as tier-1 activity.
    #[serde(default = "default_tier1_volume_usd")]
    pub tier1_volume_usd: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            pump_change_pct: default_pump_change_pct(),
            tier1_volume_usd: default_tier1_volume_usd(),
        }
    }
}

/// On-disk storage locations.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// SQLite database holding the per-run market records.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// JSON file holding thresholds and blacklists.
    #[serde(default = "default_settings_path")]
    pub settings_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            settings_path: default_settings_path(),
        }
    }
}

/// Continuous watch settings.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchConfig {
    /// Seconds between scan cycles.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub screener: ScreenerConfig,

    #[serde(default)]
    pub rugcheck: RugcheckConfig,

    #[serde(default)]
    pub telegram: TelegramConfig,

    #[serde(default)]
    pub trading: TradingConfig,

    #[serde(default)]
    pub detector: DetectorConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub watch: WatchConfig,
}

impl Config {
    /// Loads configuration from the given file (optional) and the
    /// environment, with `DEXWATCH_SCREENER__CHAIN`-style overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix("DEXWATCH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let config: Config = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Checks internal consistency before the first scan runs.
    fn validate(&self) -> Result<()> {
        if self.screener.base_url.is_empty() {
            anyhow::bail!("screener.base_url must not be empty");
        }
        if self.screener.chain.is_empty() {
            anyhow::bail!("screener.chain must not be empty");
        }
        if self.trading.buy_amount <= 0.0 {
            anyhow::bail!(
                "trading.buy_amount must be positive, got {}",
                self.trading.buy_amount
            );
        }
        if self.detector.pump_change_pct <= 0.0 {
            anyhow::bail!("detector.pump_change_pct must be positive");
        }
        if self.detector.tier1_volume_usd <= 0.0 {
            anyhow::bail!("detector.tier1_volume_usd must be positive");
        }
        if self.watch.interval_secs == 0 {
            anyhow::bail!("watch.interval_secs must be at least 1");
        }
        if !self.telegram.bot_token.is_empty() && self.telegram.chat_id.is_empty() {
            anyhow::bail!("telegram.chat_id is required when telegram.bot_token is set");
        }
        Ok(())
    }

    /// True when Telegram delivery is configured.
    pub fn telegram_enabled(&self) -> bool {
        !self.telegram.bot_token.is_empty() && !self.telegram.chat_id.is_empty()
    }

    /// Configuration summary with secrets masked, for logging at startup.
    pub fn masked_display(&self) -> String {
        format!(
            "screener: {} (chain {:?}) | rugcheck: {} (key {}) | telegram: {} (token {}) | \
             trading: enabled={} buy={} | detector: pump>{}% tier1>${} | \
             storage: db={} settings={} | watch: every {}s",
            self.screener.base_url,
            self.screener.chain,
            self.rugcheck.base_url,
            mask_secret(&self.rugcheck.api_key),
            self.telegram.chat_id,
            mask_secret(&self.telegram.bot_token),
            self.trading.enabled,
            self.trading.buy_amount,
            self.detector.pump_change_pct,
            self.detector.tier1_volume_usd,
            self.storage.database_path,
            self.storage.settings_path,
            self.watch.interval_secs,
        )
    }
}

fn mask_secret(value: &str) -> String {
    if value.is_empty() {
        "(not set)".to_string()
    } else if value.len() <= 8 {
        "***".to_string()
    } else {
        format!("{}...{}", &value[..4], &value[value.len() - 4..])
    }
}
