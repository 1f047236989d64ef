// Trade execution module
// The lifecycle state machine that owns position and transition state

pub mod lifecycle;

pub use lifecycle::TradeLifecycle;
