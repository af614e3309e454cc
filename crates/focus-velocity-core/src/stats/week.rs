//! Zero-filled focus minutes for the current calendar week.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::session::SessionRecord;
use crate::trend::{DailyAggregator, TrendCalendar};

/// Number of calendar days in the weekly series.
pub const CALENDAR_WEEK_DAYS: u64 = 7;

/// Focus minutes for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyFocus {
    pub date: NaiveDate,
    pub minutes: u64,
}

/// One entry per day for the 7 days ending today, oldest first.
///
/// Unlike the focus trend window, days without sessions are included with
/// zero minutes.
pub fn calendar_week(sessions: &[SessionRecord], calendar: &TrendCalendar, now: DateTime<Utc>) -> Vec<DailyFocus> {
    let buckets = DailyAggregator::new(*calendar).aggregate(sessions);
    let today = calendar.day_of(now);

    (0..CALENDAR_WEEK_DAYS)
        .rev()
        .filter_map(|offset| today.checked_sub_days(chrono::Days::new(offset)))
        .map(|date| DailyFocus {
            date,
            minutes: buckets.get(&date).map_or(0, |b| b.total_minutes),
        })
        .collect()
}
