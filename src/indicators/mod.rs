// Technical indicators module
// Heikin-Ashi smoothing and the rolling z-score oscillator

pub mod heikin_ashi;
pub mod zscore;

pub use heikin_ashi::heikin_ashi;
pub use zscore::calculate_zscore;
