//! Calendar-day resolution and en-US date labels.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::ValidationError;

/// Timezone-aware view of calendar days.
///
/// Every stage that buckets by day or renders a day label goes through a
/// `TrendCalendar`, so results never depend on the host's local timezone.
/// Labels always use the en-US locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendCalendar {
    tz: Tz,
}

impl Default for TrendCalendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl TrendCalendar {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn utc() -> Self {
        Self::new(Tz::UTC)
    }

    /// Resolve an IANA timezone name such as `"Europe/Paris"`.
    pub fn from_name(name: &str) -> Result<Self, ValidationError> {
        name.trim()
            .parse::<Tz>()
            .map(Self::new)
            .map_err(|_| ValidationError::UnknownTimezone(name.to_string()))
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Local calendar day of `instant`, time of day discarded.
    pub fn day_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.tz).date_naive()
    }

    /// Short weekday name, e.g. `"Mon"`.
    pub fn weekday_label(&self, date: NaiveDate) -> String {
        date.format("%a").to_string()
    }

    /// Short month and day of month, e.g. `"Jan 5"`.
    pub fn month_day_label(&self, date: NaiveDate) -> String {
        date.format("%b %-d").to_string()
    }
}
