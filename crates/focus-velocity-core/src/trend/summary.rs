//! Summary statistic for the trend window.

use super::presentation::ChartPoint;

/// Mean of `value` across `points`, rounded to the nearest whole minute.
///
/// Halves round away from zero. An empty window averages to 0. Totals are
/// widened to `u128` so day values near `u64::MAX` cannot overflow.
pub fn average_value(points: &[ChartPoint]) -> u64 {
    if points.is_empty() {
        return 0;
    }
    let total: u128 = points.iter().map(|p| u128::from(p.value)).sum();
    (total as f64 / points.len() as f64).round() as u64
}
