//! Source health assessment

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::db::models::NewsSource;

/// Consecutive failures at which a source counts as failing
pub const FAILING_THRESHOLD: i32 = 3;

/// A source is stale when its last success is older than this many fetch intervals
pub const STALE_INTERVALS: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceHealth {
    Healthy,
    Degraded,
    Failing,
    /// Never fetched successfully
    Pending,
    Inactive,
}

impl SourceHealth {
    pub fn assess(source: &NewsSource, now: DateTime<Utc>) -> Self {
        if !source.is_active {
            return SourceHealth::Inactive;
        }
        if source.consecutive_failures >= FAILING_THRESHOLD {
            return SourceHealth::Failing;
        }

        let Some(last_success) = source.last_success_at else {
            return if source.consecutive_failures > 0 {
                SourceHealth::Degraded
            } else {
                SourceHealth::Pending
            };
        };

        let interval = Duration::minutes(i64::from(source.fetch_interval_minutes.max(1)));
        let stale_after = interval * STALE_INTERVALS;
        let stale = now.signed_duration_since(last_success.with_timezone(&Utc)) > stale_after;

        if source.consecutive_failures > 0 || stale {
            SourceHealth::Degraded
        } else {
            SourceHealth::Healthy
        }
    }
}
