use crate::api::Pi42Client;
use crate::execution::TradeLifecycle;
use crate::indicators::{calculate_zscore, heikin_ashi};
use crate::models::{ExitReason, LifecycleState, OrderRequest};
use crate::strategy::{evaluate_entry, evaluate_pnl, signal_reversed, PnlAction, PnlThresholds};

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Instrument pair, e.g. BTCUSDT
    pub pair: String,

    /// Candle interval for signal computation
    pub interval: String,

    /// Number of candles fetched per evaluation
    pub kline_limit: u32,

    /// Trailing window for the z-score
    pub zscore_window: usize,

    /// Fixed order quantity
    pub quantity: f64,

    /// Profit/loss exit thresholds
    pub thresholds: PnlThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pair: "BTCUSDT".to_string(),
            interval: "1h".to_string(),
            kline_limit: 200,
            zscore_window: 200,
            quantity: 0.002,
            thresholds: PnlThresholds::default(),
        }
    }
}

/// Drives one instrument through the entry/hold/exit lifecycle
///
/// Owns the lifecycle state machine and the exchange client. Each cycle
/// method is invoked synchronously by the scheduling loop; any failure
/// inside a cycle degrades to "skip this cycle" and the next scheduled
/// cycle runs unaffected.
pub struct TradingEngine {
    client: Pi42Client,
    lifecycle: TradeLifecycle,
    config: EngineConfig,
}

impl TradingEngine {
    pub fn new(client: Pi42Client, config: EngineConfig) -> Self {
        Self {
            client,
            lifecycle: TradeLifecycle::new(config.quantity),
            config,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    /// Fetch fresh candles and compute (z-score, latest heikin-ashi close)
    ///
    /// Returns `None` on collaborator failure or insufficient signal; both
    /// mean "no decision this cycle".
    async fn latest_signal(&self) -> Option<(f64, f64)> {
        let candles = match self
            .client
            .fetch_klines(&self.config.pair, &self.config.interval, self.config.kline_limit)
            .await
        {
            Ok(candles) => candles,
            Err(e) => {
                tracing::warn!("Failed to fetch market data: {}", e);
                return None;
            }
        };

        if candles.is_empty() {
            tracing::warn!("No market data returned for {}", self.config.pair);
            return None;
        }

        let smoothed = heikin_ashi(&candles);
        let closes: Vec<f64> = smoothed.iter().map(|c| c.ha_close).collect();

        let Some(zscore) = calculate_zscore(&closes, self.config.zscore_window) else {
            tracing::debug!(
                "Not enough data for z-score ({} closes, window {})",
                closes.len(),
                self.config.zscore_window
            );
            return None;
        };

        let last_close = *closes.last()?;
        Some((zscore, last_close))
    }

    /// Hourly entry check, meaningful in the two waiting states
    pub async fn check_entry_condition(&mut self) {
        let Some((zscore, last_close)) = self.latest_signal().await else {
            return;
        };

        tracing::info!("Entry check: z-score {:.4}", zscore);

        let decision = evaluate_entry(
            self.lifecycle.state(),
            self.lifecycle.last_exit_direction(),
            zscore,
        );

        if let Some(side) = decision {
            tracing::info!("{:?} signal detected, entering at {:.2}", side, last_close);
            let order = self.lifecycle.open_position(side, last_close);
            self.submit(order).await;
        }
    }

    /// Hourly signal-reversal exit check while in a trade
    pub async fn check_signal_reversal_exit(&mut self) {
        let Some(side) = self.lifecycle.position().map(|p| p.side) else {
            return;
        };
        let Some((zscore, _)) = self.latest_signal().await else {
            return;
        };

        tracing::info!("Reversal check: z-score {:.4} while {:?}", zscore, side);

        if signal_reversed(side, zscore) {
            self.exit(ExitReason::SignalReversal).await;
        }
    }

    /// Five-minute profit/loss hysteresis check while in a trade
    pub async fn check_pnl_exit_condition(&mut self) {
        let Some(position) = self.lifecycle.position() else {
            return;
        };
        let armed = position.profit_threshold_crossed;

        let pnl = match self.client.fetch_unrealized_pnl().await {
            Ok(pnl) => pnl,
            Err(e) => {
                tracing::warn!("Failed to fetch wallet details: {}", e);
                return;
            }
        };

        tracing::info!("Unrealised PnL: {:.2}", pnl);

        match evaluate_pnl(pnl, armed, &self.config.thresholds) {
            PnlAction::Exit(reason) => self.exit(reason).await,
            PnlAction::ArmTrailingStop => {
                if !armed {
                    tracing::info!("Profit threshold crossed, trailing stop armed");
                }
                self.lifecycle.arm_trailing_stop();
            }
            PnlAction::Hold => {}
        }
    }

    async fn exit(&mut self, reason: ExitReason) {
        // Guarded by the lifecycle: exit without a position is a no-op
        if let Some(order) = self.lifecycle.exit_position() {
            tracing::info!("Exiting position ({:?})", reason);
            self.submit(order).await;
        }
    }

    /// Submit an order, logging failures without retrying
    ///
    /// State has already transitioned by the time the order goes out; a
    /// rejected order is surfaced as a diagnostic only.
    async fn submit(&self, order: OrderRequest) {
        if let Err(e) = self
            .client
            .place_order(&self.config.pair, order.side, order.quantity)
            .await
        {
            tracing::warn!("Order submission failed: {}", e);
        }
    }

    #[cfg(test)]
    pub fn lifecycle_mut(&mut self) -> &mut TradeLifecycle {
        &mut self.lifecycle
    }

    #[cfg(test)]
    pub fn lifecycle(&self) -> &TradeLifecycle {
        &self.lifecycle
    }
}
