use hazbot::execution::TradeLifecycle;
use hazbot::indicators::{calculate_zscore, heikin_ashi};
use hazbot::models::{LifecycleState, RawCandle, Side};
use hazbot::strategy::{
    evaluate_entry, evaluate_pnl, signal_reversed, PnlAction, PnlThresholds,
};

/// Synthetic candle series: flat base, then a trend in the last few bars
fn trending_candles(base: f64, count: usize, trend: f64) -> Vec<RawCandle> {
    (0..count)
        .map(|i| {
            let drift = if i >= count - 5 {
                trend * (i - (count - 5) + 1) as f64
            } else {
                // Mild alternation so the window never has zero variance
                if i % 2 == 0 {
                    0.5
                } else {
                    -0.5
                }
            };
            let price = base + drift;
            RawCandle {
                open: price - 0.2,
                high: price + 0.4,
                low: price - 0.4,
                close: price + 0.2,
            }
        })
        .collect()
}

fn zscore_of(candles: &[RawCandle], window: usize) -> Option<f64> {
    let smoothed = heikin_ashi(candles);
    let closes: Vec<f64> = smoothed.iter().map(|c| c.ha_close).collect();
    calculate_zscore(&closes, window)
}

#[test]
fn test_full_trade_cycle_long_to_short() {
    let window = 50;
    let mut lifecycle = TradeLifecycle::new(0.002);
    assert_eq!(lifecycle.state(), LifecycleState::WaitForEntry);

    // 1. Uptrend produces a positive z-score and a Long entry
    let candles = trending_candles(100.0, 50, 2.0);
    let zscore = zscore_of(&candles, window).expect("signal available");
    assert!(zscore > 0.0);

    let side = evaluate_entry(lifecycle.state(), lifecycle.last_exit_direction(), zscore)
        .expect("entry signal");
    assert_eq!(side, Side::Long);

    let smoothed = heikin_ashi(&candles);
    let entry_price = smoothed.last().unwrap().ha_close;
    let order = lifecycle.open_position(side, entry_price);
    assert_eq!(order.side, Side::Long);
    assert_eq!(lifecycle.state(), LifecycleState::InTrade);
    assert_eq!(lifecycle.position().unwrap().entry_price, entry_price);

    // 2. Profit rises, arms the trailing stop, then collapses
    let thresholds = PnlThresholds::default();
    for pnl in [50.0, 95.0, 150.0, 60.0] {
        let armed = lifecycle.position().unwrap().profit_threshold_crossed;
        match evaluate_pnl(pnl, armed, &thresholds) {
            PnlAction::ArmTrailingStop => lifecycle.arm_trailing_stop(),
            PnlAction::Hold => {}
            PnlAction::Exit(reason) => panic!("unexpected exit at pnl {}: {:?}", pnl, reason),
        }
    }
    assert!(lifecycle.position().unwrap().profit_threshold_crossed);

    let armed = lifecycle.position().unwrap().profit_threshold_crossed;
    let action = evaluate_pnl(15.0, armed, &thresholds);
    assert!(matches!(action, PnlAction::Exit(_)));

    let order = lifecycle.exit_position().expect("position open");
    assert_eq!(order.side, Side::Short);
    assert_eq!(lifecycle.state(), LifecycleState::WaitForOppositeEntry);
    assert_eq!(lifecycle.last_exit_direction(), Some(Side::Long));

    // 3. Z-score still positive: no re-entry in the same direction
    let side = evaluate_entry(lifecycle.state(), lifecycle.last_exit_direction(), zscore);
    assert_eq!(side, None);

    // 4. Downtrend flips the z-score and opens the opposite side
    let candles = trending_candles(100.0, 50, -2.0);
    let zscore = zscore_of(&candles, window).expect("signal available");
    assert!(zscore < 0.0);

    let side = evaluate_entry(lifecycle.state(), lifecycle.last_exit_direction(), zscore)
        .expect("opposite entry signal");
    assert_eq!(side, Side::Short);

    lifecycle.open_position(side, 95.0);
    assert_eq!(lifecycle.state(), LifecycleState::InTrade);
    assert!(lifecycle.last_exit_direction().is_none());
    assert!(!lifecycle.position().unwrap().profit_threshold_crossed);
}

#[test]
fn test_signal_reversal_closes_short() {
    let mut lifecycle = TradeLifecycle::new(0.002);
    lifecycle.open_position(Side::Short, 100.0);

    // Uptrend while short: z-score positive, reversal fires
    let candles = trending_candles(100.0, 50, 2.0);
    let zscore = zscore_of(&candles, 50).expect("signal available");
    assert!(signal_reversed(Side::Short, zscore));

    let order = lifecycle.exit_position().expect("position open");
    assert_eq!(order.side, Side::Long);
    assert_eq!(lifecycle.last_exit_direction(), Some(Side::Short));
    assert_eq!(lifecycle.state(), LifecycleState::WaitForOppositeEntry);
}

#[test]
fn test_insufficient_data_produces_no_decision() {
    let lifecycle = TradeLifecycle::new(0.002);

    // Short window: no z-score, no entry evaluation at all
    let candles = trending_candles(100.0, 20, 2.0);
    assert!(zscore_of(&candles, 200).is_none());

    // Flat market: zero variance is also "no signal"
    let flat: Vec<RawCandle> = (0..50)
        .map(|_| RawCandle {
            open: 100.0,
            high: 100.0,
            low: 100.0,
            close: 100.0,
        })
        .collect();
    assert!(zscore_of(&flat, 50).is_none());

    assert_eq!(lifecycle.state(), LifecycleState::WaitForEntry);
}
