//! Today's focus time.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::session::{normalize, SessionRecord};
use crate::trend::TrendCalendar;

/// Focus duration split into hours and minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FocusTime {
    pub hours: u64,
    pub minutes: u64,
}

impl FocusTime {
    pub fn from_minutes(total: u64) -> Self {
        Self {
            hours: total / 60,
            minutes: total % 60,
        }
    }

    pub fn total_minutes(&self) -> u64 {
        self.hours * 60 + self.minutes
    }
}

impl fmt::Display for FocusTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m", self.hours, self.minutes)
    }
}

/// Sum of normalized minutes for sessions on the local day `day`.
pub fn focus_minutes_on(sessions: &[SessionRecord], calendar: &TrendCalendar, day: NaiveDate) -> u64 {
    sessions
        .iter()
        .filter(|s| calendar.day_of(s.timestamp) == day)
        .map(|s| normalize(s).minutes)
        .fold(0u64, u64::saturating_add)
}

/// Focus time logged on the local day containing `now`.
pub fn today_focus_time(sessions: &[SessionRecord], calendar: &TrendCalendar, now: DateTime<Utc>) -> FocusTime {
    FocusTime::from_minutes(focus_minutes_on(sessions, calendar, calendar.day_of(now)))
}
