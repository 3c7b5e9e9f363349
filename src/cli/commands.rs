//! CLI command implementations

use anyhow::Result;
use dialoguer::Confirm;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::notify::{ConsoleNotifier, Notifier, TelegramNotifier};
use crate::pipeline::Pipeline;
use crate::risk::RugcheckClient;
use crate::screener::DexScreenerClient;
use crate::store::{RecordStore, SettingsStore};
use crate::trading::{BonkBotTrader, PaperTradeSink, TradeSink};

/// Wires the pipeline from configuration. Dry runs and unconfigured
/// Telegram both fall back to the console notifier; the bot trader is
/// only wired when trading is enabled and alerts really go out.
async fn build_pipeline(config: &Config, dry_run: bool) -> Result<Pipeline> {
    let settings = SettingsStore::new(&config.storage.settings_path);
    settings.ensure_exists().await?;

    let records = RecordStore::open(&config.storage.database_path).await?;
    let source = Arc::new(DexScreenerClient::new(&config.screener)?);
    let oracle = Arc::new(RugcheckClient::new(&config.rugcheck)?);

    let live_telegram = !dry_run && config.telegram_enabled();
    let notifier: Arc<dyn Notifier> = if live_telegram {
        Arc::new(TelegramNotifier::new(&config.telegram)?)
    } else {
        if !dry_run {
            warn!("Telegram not configured - alerts go to the console");
        }
        Arc::new(ConsoleNotifier)
    };

    let trader: Arc<dyn TradeSink> = if live_telegram && config.trading.enabled {
        Arc::new(BonkBotTrader::new(notifier.clone()))
    } else {
        Arc::new(PaperTradeSink)
    };

    Ok(Pipeline::new(
        source,
        oracle,
        notifier,
        trader,
        settings,
        records,
        config.detector.clone(),
        config.trading.buy_amount,
    ))
}

fn confirm_live_dispatch(yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    let confirmed = Confirm::new()
        .with_prompt("Alerts and trade commands will be sent to Telegram. Continue?")
        .default(false)
        .interact()?;
    Ok(confirmed)
}

/// Start the watch loop
pub async fn run(config: &Config, dry_run: bool, yes: bool) -> Result<()> {
    if dry_run {
        warn!("Running in DRY-RUN mode - alerts and trades stay local");
    }

    if !dry_run && config.telegram_enabled() && !confirm_live_dispatch(yes)? {
        info!("Start cancelled by user");
        return Ok(());
    }

    info!("Starting market watcher...");
    info!(
        "Scanning {} every {}s, buy amount {}",
        config.screener.chain, config.watch.interval_secs, config.trading.buy_amount
    );

    let pipeline = build_pipeline(config, dry_run).await?;

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
            return;
        }
        info!("Received shutdown signal");
        signal_token.cancel();
    });

    pipeline
        .run(Duration::from_secs(config.watch.interval_secs), shutdown)
        .await;

    info!("Watcher stopped");
    Ok(())
}

/// Run a single scan cycle and print the summary
pub async fn scan(config: &Config, dry_run: bool, yes: bool) -> Result<()> {
    if !dry_run && config.telegram_enabled() && !confirm_live_dispatch(yes)? {
        info!("Scan cancelled by user");
        return Ok(());
    }

    let pipeline = build_pipeline(config, dry_run).await?;
    let summary = pipeline.run_once().await?;

    println!("\n=== SCAN SUMMARY ===\n");
    println!("Run:              {}", summary.run_id);
    println!("Fetched:          {}", summary.fetched);
    println!("Normalized:       {}", summary.normalized);
    println!("After thresholds: {}", summary.after_thresholds);
    println!("After blacklists: {}", summary.after_blacklists);
    println!("Bundled (banned): {}", summary.bundled);
    println!("Accepted:         {}", summary.accepted);
    println!("Events:           {}", summary.events);
    println!("Trade signals:    {}", summary.signals);

    Ok(())
}

/// Show current configuration (secrets masked)
pub fn show_config(config: &Config) -> Result<()> {
    println!("{}", config.masked_display());
    Ok(())
}

/// Show recent audit rows
pub async fn history(config: &Config, limit: usize) -> Result<()> {
    let store = RecordStore::open(&config.storage.database_path).await?;
    let rows = store.recent(limit as i64).await?;
    let total = store.count().await?;

    println!("\n=== RECORD HISTORY ({} of {} rows) ===\n", rows.len(), total);
    if rows.is_empty() {
        println!("No records yet.");
        return Ok(());
    }

    for row in &rows {
        println!(
            "{}  {:<14} price ${:<12} volume ${:<14} change {:>7.2}%  [{}]",
            row.recorded_at,
            row.pair,
            row.price_usd,
            row.volume_usd,
            row.change_pct,
            &row.run_id[..8]
        );
    }

    Ok(())
}
