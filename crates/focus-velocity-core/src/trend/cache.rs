//! Content-addressed memoization of the trend pipeline.

use sha2::{Digest, Sha256};
use tracing::debug;

use super::presentation::ChartPoint;
use super::velocity::{FocusTrend, FocusVelocity};
use crate::session::SessionRecord;

/// Hex SHA-256 over the fields of every session, in order.
///
/// Two lists with equal contents produce the same digest regardless of
/// where they live in memory.
pub fn sessions_digest(sessions: &[SessionRecord]) -> String {
    let mut hasher = Sha256::new();
    hasher.update((sessions.len() as u64).to_le_bytes());
    for session in sessions {
        hasher.update(session.timestamp.timestamp().to_le_bytes());
        hasher.update(session.timestamp.timestamp_subsec_nanos().to_le_bytes());

        let status = session.status.as_str().as_bytes();
        hasher.update((status.len() as u64).to_le_bytes());
        hasher.update(status);

        hash_optional(&mut hasher, session.minutes);
        hash_optional(&mut hasher, session.elapsed_seconds);
    }
    hex::encode(hasher.finalize())
}

fn hash_optional(hasher: &mut Sha256, value: Option<f64>) {
    match value {
        Some(v) => {
            hasher.update([1u8]);
            hasher.update(v.to_bits().to_le_bytes());
        }
        None => hasher.update([0u8]),
    }
}

#[derive(Debug)]
struct CachedTrend {
    digest: String,
    chart_points: Vec<ChartPoint>,
    average_value: u64,
}

/// Remembers the last computed trend and reuses it while the session list
/// is unchanged.
///
/// The goal does not take part in the computation, so it is attached fresh
/// on every call without invalidating the entry.
#[derive(Debug)]
pub struct TrendCache {
    velocity: FocusVelocity,
    entry: Option<CachedTrend>,
    hits: u64,
    misses: u64,
}

impl TrendCache {
    pub fn new(velocity: FocusVelocity) -> Self {
        Self {
            velocity,
            entry: None,
            hits: 0,
            misses: 0,
        }
    }

    pub fn get_or_compute(&mut self, sessions: &[SessionRecord], goal: f64) -> FocusTrend {
        let digest = sessions_digest(sessions);

        let entry = match self.entry.take() {
            Some(entry) if entry.digest == digest => {
                self.hits += 1;
                entry
            }
            _ => {
                self.misses += 1;
                debug!(digest = %digest, "focus trend cache miss");
                let trend = self.velocity.compute(sessions, goal);
                CachedTrend {
                    digest,
                    chart_points: trend.chart_points,
                    average_value: trend.average_value,
                }
            }
        };

        let trend = FocusTrend {
            chart_points: entry.chart_points.clone(),
            average_value: entry.average_value,
            goal,
        };
        self.entry = Some(entry);
        trend
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }
}

impl Default for TrendCache {
    fn default() -> Self {
        Self::new(FocusVelocity::default())
    }
}
