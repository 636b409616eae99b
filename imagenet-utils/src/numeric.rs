/// Round `value` to `decimals` fractional digits.
///
/// Rounds the exact binary value, breaking exact ties to even, so `0.125`
/// becomes `0.12` and `3.815` (stored as `3.81499...`) becomes `3.81`.
/// Fixed-precision formatting is correctly rounded, so the decimal text is
/// parsed back to the nearest `f64`.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let precision = decimals as usize;
    format!("{value:.precision$}").parse().unwrap_or(value)
}

/// Format a timing the way the persisted tables expect it.
///
/// Uses the shortest representation that round-trips, but always keeps at
/// least one fractional digit so whole numbers read as `11.0` rather than `11`.
pub fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Arithmetic mean of `values`, or `None` when empty.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
