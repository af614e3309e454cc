//! Per-day accumulation of session minutes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::trace;

use super::calendar::TrendCalendar;
use crate::session::{normalize, SessionRecord};

/// Focus minutes accumulated for one local calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBucket {
    /// Local calendar day
    pub date: NaiveDate,
    /// Sum of normalized contributions of every session on `date`
    pub total_minutes: u64,
}

impl DayBucket {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            total_minutes: 0,
        }
    }
}

/// Groups session contributions by local calendar day.
#[derive(Debug, Clone, Default)]
pub struct DailyAggregator {
    calendar: TrendCalendar,
}

impl DailyAggregator {
    pub fn new(calendar: TrendCalendar) -> Self {
        Self { calendar }
    }

    /// Bucket every session by the calendar day of its timestamp.
    ///
    /// Exactly one bucket exists per distinct day in the input. Iteration
    /// order does not affect the result.
    pub fn aggregate<'a, I>(&self, sessions: I) -> HashMap<NaiveDate, DayBucket>
    where
        I: IntoIterator<Item = &'a SessionRecord>,
    {
        let mut buckets: HashMap<NaiveDate, DayBucket> = HashMap::new();

        for session in sessions {
            let date = self.calendar.day_of(session.timestamp);
            let contribution = normalize(session);
            trace!(%date, minutes = contribution.minutes, source = ?contribution.source, "session contribution");

            let bucket = buckets.entry(date).or_insert_with(|| DayBucket::new(date));
            bucket.total_minutes = bucket.total_minutes.saturating_add(contribution.minutes);
        }

        buckets
    }
}
