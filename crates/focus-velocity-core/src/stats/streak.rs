//! Day streaks of completed sessions.
//!
//! Only `completed` sessions count towards a streak. A day is "active" when
//! it has at least one completed session, regardless of minutes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::session::SessionRecord;
use crate::trend::TrendCalendar;

/// Number of days shown in the streak graph.
pub const STREAK_HISTORY_DAYS: usize = 8;

/// Streak length as it stood at the end of `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakDay {
    pub date: NaiveDate,
    pub streak: u32,
}

fn completed_days(sessions: &[SessionRecord], calendar: &TrendCalendar) -> HashSet<NaiveDate> {
    sessions
        .iter()
        .filter(|s| s.status.is_completed())
        .map(|s| calendar.day_of(s.timestamp))
        .collect()
}

/// Consecutive active days ending on `last`.
fn run_ending_on(days: &HashSet<NaiveDate>, last: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = Some(last);
    while let Some(current) = day.filter(|d| days.contains(d)) {
        streak += 1;
        day = current.pred_opt();
    }
    streak
}

/// Current streak in days.
///
/// Today not being active yet does not break the streak: counting then
/// starts from yesterday.
pub fn current_streak(sessions: &[SessionRecord], calendar: &TrendCalendar, now: DateTime<Utc>) -> u32 {
    let days = completed_days(sessions, calendar);
    let today = calendar.day_of(now);

    if days.contains(&today) {
        run_ending_on(&days, today)
    } else {
        today.pred_opt().map_or(0, |yesterday| run_ending_on(&days, yesterday))
    }
}

/// Streak length at the end of each of the last `days` days, oldest first.
pub fn streak_history(
    sessions: &[SessionRecord],
    calendar: &TrendCalendar,
    now: DateTime<Utc>,
    days: usize,
) -> Vec<StreakDay> {
    let active = completed_days(sessions, calendar);
    let today = calendar.day_of(now);

    (0..days as u64)
        .rev()
        .filter_map(|offset| today.checked_sub_days(chrono::Days::new(offset)))
        .map(|date| StreakDay {
            date,
            streak: run_ending_on(&active, date),
        })
        .collect()
}
