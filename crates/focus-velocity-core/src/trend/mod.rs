//! Focus trend for the last seven active days.
//!
//! Sessions are normalized to whole minutes, bucketed by local calendar day,
//! ordered, cut to the most recent [`TREND_WINDOW_DAYS`] and mapped to
//! labelled [`ChartPoint`]s. The mean of the window is the headline
//! "Avg Minutes" figure.

mod aggregate;
mod cache;
mod calendar;
mod presentation;
mod summary;
mod velocity;
mod window;

pub use aggregate::{DailyAggregator, DayBucket};
pub use cache::{sessions_digest, TrendCache};
pub use calendar::TrendCalendar;
pub use presentation::ChartPoint;
pub use summary::average_value;
pub use velocity::{FocusTrend, FocusVelocity, DEFAULT_GOAL};
pub use window::{select_window, TREND_WINDOW_DAYS};
