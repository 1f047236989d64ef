use crate::models::{ExitReason, Side};

/// Profit/loss exit thresholds, in the account's margin currency
#[derive(Debug, Clone)]
pub struct PnlThresholds {
    /// Unrealised profit at which the position is closed outright
    pub take_profit: f64,

    /// Profit level that arms the trailing-stop rule
    pub arm_trailing: f64,

    /// Once armed, profit falling to this level or below triggers exit
    pub trailing_floor: f64,

    /// Unrealised loss at which the position is closed
    pub stop_loss: f64,
}

impl Default for PnlThresholds {
    fn default() -> Self {
        Self {
            take_profit: 190.0,
            arm_trailing: 90.0,
            trailing_floor: 20.0,
            stop_loss: -90.0,
        }
    }
}

/// Outcome of one PnL hysteresis check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PnlAction {
    Exit(ExitReason),
    ArmTrailingStop,
    Hold,
}

/// Evaluate the profit/loss hysteresis rules for an open position
///
/// Rules are checked in fixed priority order and only the first match
/// fires: take-profit, then arming the trailing stop, then the armed
/// trailing stop, then the stop loss. The ordering is load-bearing; the
/// numeric ranges are not mutually exclusive by construction.
pub fn evaluate_pnl(pnl: f64, threshold_crossed: bool, thresholds: &PnlThresholds) -> PnlAction {
    if pnl >= thresholds.take_profit {
        PnlAction::Exit(ExitReason::TakeProfit)
    } else if pnl >= thresholds.arm_trailing {
        PnlAction::ArmTrailingStop
    } else if threshold_crossed && pnl <= thresholds.trailing_floor {
        PnlAction::Exit(ExitReason::TrailingStop)
    } else if pnl <= thresholds.stop_loss {
        PnlAction::Exit(ExitReason::StopLoss)
    } else {
        PnlAction::Hold
    }
}

/// Signal-reversal exit check
///
/// True when the z-score has crossed back through zero against the held
/// side: below zero while Long, above zero while Short.
pub fn signal_reversed(side: Side, zscore: f64) -> bool {
    match side {
        Side::Long => zscore < 0.0,
        Side::Short => zscore > 0.0,
    }
}
