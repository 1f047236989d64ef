use crate::models::{LifecycleState, Side};

/// Entry decision from the z-score oscillator
///
/// Waiting for a fresh entry, any non-zero z-score picks a side. After an
/// exit the bot only re-enters against the side it just closed: a prior
/// Long needs the z-score below zero, a prior Short needs it above. If the
/// oscillator never flips, the bot stays in WaitForOppositeEntry
/// indefinitely; that is intentional (wait for a true reversal).
///
/// Returns the side to open, or `None` to hold. In-trade states are not
/// evaluated here; exits are handled separately.
pub fn evaluate_entry(
    state: LifecycleState,
    last_exit_direction: Option<Side>,
    zscore: f64,
) -> Option<Side> {
    match state {
        LifecycleState::WaitForEntry => {
            if zscore > 0.0 {
                Some(Side::Long)
            } else if zscore < 0.0 {
                Some(Side::Short)
            } else {
                None
            }
        }
        LifecycleState::WaitForOppositeEntry => match last_exit_direction {
            Some(Side::Long) if zscore < 0.0 => Some(Side::Short),
            Some(Side::Short) if zscore > 0.0 => Some(Side::Long),
            _ => None,
        },
        LifecycleState::InTrade => None,
    }
}
