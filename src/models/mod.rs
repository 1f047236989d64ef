use serde::{Deserialize, Serialize};

/// Raw OHLC candle for one time bucket, as returned by the exchange
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawCandle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Heikin-Ashi smoothed candle
///
/// Derived from one RawCandle plus the immediately preceding smoothed
/// candle, so the series must always be recomputed from the start of
/// the window.
#[derive(Debug, Clone, PartialEq)]
pub struct HeikinAshiCandle {
    pub ha_open: f64,
    pub ha_close: f64,
    pub ha_high: f64,
    pub ha_low: f64,
}

/// Direction of a futures position
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Side {
    Long,
    Short,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Long => Side::Short,
            Side::Short => Side::Long,
        }
    }

    /// Order side string the exchange expects
    pub fn as_order_side(self) -> &'static str {
        match self {
            Side::Long => "BUY",
            Side::Short => "SELL",
        }
    }
}

/// Open position metadata
///
/// Exists only while the lifecycle is in trade. `profit_threshold_crossed`
/// arms the trailing-stop rule once unrealised profit has been above the
/// arm level.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub side: Side,
    pub entry_price: f64,
    pub profit_threshold_crossed: bool,
}

/// Trading lifecycle state
///
/// After an exit the bot does not re-enter in the same direction; it waits
/// in WaitForOppositeEntry until the z-score flips against the side that
/// was just closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    WaitForEntry,
    InTrade,
    WaitForOppositeEntry,
}

/// Why a position was closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    SignalReversal,
    TakeProfit,
    TrailingStop,
    StopLoss,
}

/// Market order request issued to the exchange
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub side: Side,
    pub quantity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Long.opposite(), Side::Short);
        assert_eq!(Side::Short.opposite(), Side::Long);
    }

    #[test]
    fn test_order_side_strings() {
        assert_eq!(Side::Long.as_order_side(), "BUY");
        assert_eq!(Side::Short.as_order_side(), "SELL");
    }

    #[test]
    fn test_position_creation() {
        let position = Position {
            side: Side::Long,
            entry_price: 64000.0,
            profit_threshold_crossed: false,
        };

        assert_eq!(position.side, Side::Long);
        assert!(!position.profit_threshold_crossed);
    }
}
