//! Chart-ready points.

use serde::{Deserialize, Serialize};

use super::aggregate::DayBucket;
use super::calendar::TrendCalendar;

/// One point of the focus trend chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Short weekday label ("Mon")
    pub name: String,
    /// Focus minutes for the day
    pub value: u64,
    /// Month and day label ("Jan 5")
    pub date: String,
}

impl ChartPoint {
    pub fn from_bucket(bucket: &DayBucket, calendar: &TrendCalendar) -> Self {
        Self {
            name: calendar.weekday_label(bucket.date),
            value: bucket.total_minutes,
            date: calendar.month_day_label(bucket.date),
        }
    }
}
