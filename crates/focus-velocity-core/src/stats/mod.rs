//! Dashboard statistics derived from focus sessions
//!
//! This module provides the figures shown next to the focus trend:
//! today's focus time, the completed-session day streak (current and
//! per-day history) and a zero-filled series for the current calendar week.
//! All of them share the session normalization rules of the trend pipeline.

mod streak;
mod today;
mod week;

pub use streak::{current_streak, streak_history, StreakDay, STREAK_HISTORY_DAYS};
pub use today::{focus_minutes_on, today_focus_time, FocusTime};
pub use week::{calendar_week, DailyFocus, CALENDAR_WEEK_DAYS};
