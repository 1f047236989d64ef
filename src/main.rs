use anyhow::Context;
use chrono::{Timelike, Utc};
use hazbot::api::Pi42Client;
use hazbot::engine::{EngineConfig, TradingEngine};
use hazbot::models::LifecycleState;
use tokio::time::{sleep_until, Duration, Instant};

// ============================================================================
// Helper Functions
// ============================================================================

/// Seconds until the next hourly candle close (Pi42 hourly bars close on
/// the half hour)
fn secs_until_hourly_close(minute: u32, second: u32) -> u64 {
    let secs_into_hour = minute * 60 + second;
    let close = 30 * 60;
    if secs_into_hour < close {
        (close - secs_into_hour) as u64
    } else {
        (3600 + close - secs_into_hour) as u64
    }
}

/// Seconds until the next 5-minute boundary (XX:00, XX:05, ...), always in
/// the future
fn secs_until_next_5min(minute: u32, second: u32) -> u64 {
    let secs_into_slot = (minute % 5) * 60 + second;
    (300 - secs_into_slot) as u64
}

fn next_hourly_close() -> Instant {
    let now = Utc::now();
    let wait = secs_until_hourly_close(now.minute(), now.second());
    tracing::info!("Waiting {:.1} minutes for next hourly candle close", wait as f64 / 60.0);
    Instant::now() + Duration::from_secs(wait)
}

fn next_5min_boundary() -> Instant {
    let now = Utc::now();
    let wait = secs_until_next_5min(now.minute(), now.second());
    tracing::info!("Waiting {:.1} minutes to next 5-minute check", wait as f64 / 60.0);
    Instant::now() + Duration::from_secs(wait)
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter("hazbot=info")
        .init();
}

fn load_config() -> anyhow::Result<EngineConfig> {
    let pair = std::env::var("TRADE_PAIR").unwrap_or_else(|_| "BTCUSDT".to_string());
    let quantity: f64 = std::env::var("TRADE_QUANTITY")
        .unwrap_or_else(|_| "0.002".to_string())
        .parse()
        .context("TRADE_QUANTITY must be a number")?;
    let zscore_window: usize = std::env::var("ZSCORE_WINDOW")
        .unwrap_or_else(|_| "200".to_string())
        .parse()
        .context("ZSCORE_WINDOW must be an integer")?;

    Ok(EngineConfig {
        pair,
        quantity,
        zscore_window,
        kline_limit: zscore_window as u32,
        ..EngineConfig::default()
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    tracing::info!("Starting hazbot");

    let api_key = std::env::var("PI42_API_KEY").context("PI42_API_KEY not found in environment")?;
    let api_secret =
        std::env::var("PI42_API_SECRET").context("PI42_API_SECRET not found in environment")?;
    let config = load_config()?;

    tracing::info!("Configuration:");
    tracing::info!("  Pair: {}", config.pair);
    tracing::info!("  Quantity: {}", config.quantity);
    tracing::info!("  Z-score window: {}", config.zscore_window);

    let client = Pi42Client::new(api_key, api_secret);
    let mut engine = TradingEngine::new(client, config);

    // Hour slot (hours since epoch) of the last reversal-exit check, so the
    // check fires at most once per hour while in a trade
    let mut last_reversal_hour: Option<i64> = None;

    loop {
        match engine.state() {
            LifecycleState::WaitForEntry | LifecycleState::WaitForOppositeEntry => {
                sleep_until(next_hourly_close()).await;
                engine.check_entry_condition().await;
            }
            LifecycleState::InTrade => {
                let now = Utc::now();
                let hour_slot = now.timestamp() / 3600;
                if now.minute() == 30 && last_reversal_hour != Some(hour_slot) {
                    engine.check_signal_reversal_exit().await;
                    last_reversal_hour = Some(hour_slot);
                }

                sleep_until(next_5min_boundary()).await;
                engine.check_pnl_exit_condition().await;
            }
        }
    }
}
