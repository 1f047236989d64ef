// Trading strategy module
// Entry transition table and the two exit evaluators

pub mod entry;
pub mod exit;

pub use entry::evaluate_entry;
pub use exit::{evaluate_pnl, signal_reversed, PnlAction, PnlThresholds};
