/// Calculate the z-score of the most recent close over a trailing window
///
/// The z-score is the distance of the latest value from the window mean,
/// in units of the window's population standard deviation (divide by N,
/// not N-1). Sign indicates directional bias.
///
/// Returns `None` when fewer than `window` values exist or the window has
/// zero variance (flat price region). Callers treat `None` as "no signal
/// this cycle", never as an error.
pub fn calculate_zscore(closes: &[f64], window: usize) -> Option<f64> {
    if window == 0 || closes.len() < window {
        return None;
    }

    let tail = &closes[closes.len() - window..];
    let mean = tail.iter().sum::<f64>() / window as f64;
    let variance = tail.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / window as f64;
    let stdev = variance.sqrt();

    if stdev == 0.0 {
        return None;
    }

    let last = *tail.last()?;
    Some((last - mean) / stdev)
}
