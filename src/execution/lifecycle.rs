use crate::models::{LifecycleState, OrderRequest, Position, Side};

/// Owns the trading lifecycle state, the open position, and the direction
/// of the last exit
///
/// This is the single authority for state transitions: entry and exit
/// evaluators decide, but every mutation goes through these methods. One
/// instance per instrument, passed by `&mut` into each evaluation cycle,
/// so no locking is needed.
#[derive(Debug)]
pub struct TradeLifecycle {
    state: LifecycleState,
    position: Option<Position>,
    last_exit_direction: Option<Side>,
    quantity: f64,
}

impl TradeLifecycle {
    pub fn new(quantity: f64) -> Self {
        Self {
            state: LifecycleState::WaitForEntry,
            position: None,
            last_exit_direction: None,
            quantity,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    pub fn last_exit_direction(&self) -> Option<Side> {
        self.last_exit_direction
    }

    /// Open a position and transition to InTrade
    ///
    /// Records the entry price (latest Heikin-Ashi close), clears any
    /// retained exit direction, and returns the market order to submit.
    pub fn open_position(&mut self, side: Side, entry_price: f64) -> OrderRequest {
        self.position = Some(Position {
            side,
            entry_price,
            profit_threshold_crossed: false,
        });
        self.last_exit_direction = None;
        self.state = LifecycleState::InTrade;

        OrderRequest {
            side,
            quantity: self.quantity,
        }
    }

    /// Arm the trailing-stop rule on the open position
    ///
    /// No-op when no position is open.
    pub fn arm_trailing_stop(&mut self) {
        if let Some(position) = self.position.as_mut() {
            position.profit_threshold_crossed = true;
        }
    }

    /// Close the open position and transition to WaitForOppositeEntry
    ///
    /// The sole path out of InTrade: records the closed side as
    /// last_exit_direction, clears the position, and returns the
    /// opposite-side market order that flattens it. Returns `None` when
    /// no position is open (defensive no-op).
    pub fn exit_position(&mut self) -> Option<OrderRequest> {
        let position = self.position.take()?;

        self.last_exit_direction = Some(position.side);
        self.state = LifecycleState::WaitForOppositeEntry;

        Some(OrderRequest {
            side: position.side.opposite(),
            quantity: self.quantity,
        })
    }
}
