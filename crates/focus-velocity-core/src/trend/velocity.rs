//! The focus trend pipeline: normalize, bucket, window, label, average.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::aggregate::DailyAggregator;
use super::calendar::TrendCalendar;
use super::presentation::ChartPoint;
use super::summary::average_value;
use super::window::select_window;
use crate::session::SessionRecord;

/// Goal used when the caller does not set one; renders no goal line.
pub const DEFAULT_GOAL: f64 = 0.0;

/// Everything a chart renderer needs for the "Focus Trend" panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusTrend {
    /// Up to 7 points, oldest first, one per active day
    pub chart_points: Vec<ChartPoint>,
    /// Rounded mean of `chart_points[].value`
    pub average_value: u64,
    /// Daily goal in minutes, forwarded unchanged
    pub goal: f64,
}

impl FocusTrend {
    /// True when there is nothing to chart ("No data available yet").
    pub fn is_empty(&self) -> bool {
        self.chart_points.is_empty()
    }

    /// Goal reference line, only when a positive goal was set.
    pub fn goal_line(&self) -> Option<f64> {
        (self.goal > 0.0).then_some(self.goal)
    }
}

/// Computes [`FocusTrend`]s for a fixed calendar.
///
/// Stateless: every call recomputes from scratch, so concurrent callers on
/// different snapshots need no coordination.
#[derive(Debug, Clone, Default)]
pub struct FocusVelocity {
    calendar: TrendCalendar,
}

impl FocusVelocity {
    pub fn new(calendar: TrendCalendar) -> Self {
        Self { calendar }
    }

    pub fn calendar(&self) -> &TrendCalendar {
        &self.calendar
    }

    /// Chart points for the most recent active days, oldest first.
    pub fn chart_points(&self, sessions: &[SessionRecord]) -> Vec<ChartPoint> {
        let buckets = DailyAggregator::new(self.calendar).aggregate(sessions);
        let bucket_count = buckets.len();
        let window = select_window(buckets.into_values());

        debug!(
            sessions = sessions.len(),
            buckets = bucket_count,
            window = window.len(),
            "aggregated focus trend"
        );

        window
            .iter()
            .map(|bucket| ChartPoint::from_bucket(bucket, &self.calendar))
            .collect()
    }

    /// Run the full pipeline and attach `goal` unchanged.
    pub fn compute(&self, sessions: &[SessionRecord], goal: f64) -> FocusTrend {
        let chart_points = self.chart_points(sessions);
        let average_value = average_value(&chart_points);
        FocusTrend {
            chart_points,
            average_value,
            goal,
        }
    }

    /// Same as [`compute`](Self::compute); an absent list counts as empty.
    pub fn compute_optional(&self, sessions: Option<&[SessionRecord]>, goal: f64) -> FocusTrend {
        self.compute(sessions.unwrap_or(&[]), goal)
    }
}
