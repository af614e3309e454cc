//! # Focus Velocity Core Library
//!
//! This library turns a log of focus sessions into the figures shown on a
//! focus dashboard: a "last 7 days" trend with its average, today's focus
//! time, the day streak and a zero-filled weekly series.
//!
//! ## Architecture
//!
//! - **Sessions**: lenient parsing of the session feed and normalization of
//!   each record to whole minutes
//! - **Trend**: a pure pipeline that buckets minutes by local calendar day,
//!   keeps the most recent active days and labels them for a chart
//! - **Stats**: supporting dashboard statistics built on the same rules
//! - **Storage**: TOML-based configuration (goal and timezone)
//!
//! ## Key Components
//!
//! - [`FocusVelocity`]: the trend pipeline
//! - [`TrendCache`]: memoizes the pipeline on session content
//! - [`TrendCalendar`]: injected timezone for day bucketing and labels
//! - [`Config`]: application configuration management

pub mod error;
pub mod session;
pub mod stats;
pub mod storage;
pub mod trend;

pub use error::{ConfigError, CoreError, ValidationError};
pub use session::{normalize, parse_sessions, Contribution, ContributionSource, SessionRecord, SessionStatus};
pub use stats::{calendar_week, current_streak, streak_history, today_focus_time, FocusTime};
pub use storage::{Config, TrendConfig};
pub use trend::{ChartPoint, DayBucket, FocusTrend, FocusVelocity, TrendCache, TrendCalendar};
