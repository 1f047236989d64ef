use crate::models::{HeikinAshiCandle, RawCandle};

/// Convert raw OHLC candles (oldest first) into Heikin-Ashi candles
///
/// Heikin-Ashi smooths price action by averaging open/close into a
/// recursive series:
/// - ha_close = (open + high + low + close) / 4
/// - ha_open  = (prev ha_open + prev ha_close) / 2, seeded from the first
///   candle's own open/close
/// - ha_high  = max(high, ha_open, ha_close)
/// - ha_low   = min(low, ha_open, ha_close)
///
/// Each element depends on the previous derived element, so the series is
/// rebuilt from the start of the window on every call rather than patched
/// incrementally.
pub fn heikin_ashi(candles: &[RawCandle]) -> Vec<HeikinAshiCandle> {
    let mut smoothed: Vec<HeikinAshiCandle> = Vec::with_capacity(candles.len());

    for candle in candles {
        let ha_close = (candle.open + candle.high + candle.low + candle.close) / 4.0;
        let ha_open = match smoothed.last() {
            Some(prev) => (prev.ha_open + prev.ha_close) / 2.0,
            None => (candle.open + candle.close) / 2.0,
        };
        let ha_high = candle.high.max(ha_open).max(ha_close);
        let ha_low = candle.low.min(ha_open).min(ha_close);

        smoothed.push(HeikinAshiCandle {
            ha_open,
            ha_close,
            ha_high,
            ha_low,
        });
    }

    smoothed
}
