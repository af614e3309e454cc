//! Chronological ordering and the "last 7 days" window.

use super::aggregate::DayBucket;

/// Number of most recent active days kept for the trend.
pub const TREND_WINDOW_DAYS: usize = 7;

/// Order buckets oldest first and keep the last [`TREND_WINDOW_DAYS`].
///
/// Days without sessions have no bucket, so the window spans the seven most
/// recent *active* days, not seven consecutive calendar days.
pub fn select_window<I>(buckets: I) -> Vec<DayBucket>
where
    I: IntoIterator<Item = DayBucket>,
{
    let mut ordered: Vec<DayBucket> = buckets.into_iter().collect();
    ordered.sort_by_key(|bucket| bucket.date);
    let start = ordered.len().saturating_sub(TREND_WINDOW_DAYS);
    ordered.split_off(start)
}
