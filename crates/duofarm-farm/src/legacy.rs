//! Whole-farm health derived from the duo's last activity.
//!
//! Before a room has per-animal ecosystem state, the farm is shown as one
//! scalar budget: [`MAX_HEALTH_HOURS`] minus the hours since either member
//! last did something (sent a doodle, a note, a gesture). It is recomputed
//! from a single timestamp on every read. Only that timestamp is persisted,
//! as part of the room's record.

use chrono::{DateTime, Utc};
use serde::Serialize;

use duofarm_types::HealthStatus;

use crate::health::{self, MAX_HEALTH_HOURS};

/// Legacy farm-wide health view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FarmHealth {
    /// Last time either member of the duo was active.
    pub last_activity_at: DateTime<Utc>,
}

impl FarmHealth {
    /// Build the view from the last activity timestamp.
    pub const fn new(last_activity_at: DateTime<Utc>) -> Self {
        Self { last_activity_at }
    }

    /// Record fresh activity. Older timestamps are ignored.
    pub fn record_activity(&mut self, at: DateTime<Utc>) {
        if at > self.last_activity_at {
            self.last_activity_at = at;
        }
    }

    /// Hours left before the farm dies, as of `now`.
    pub fn hours_until_death(&self, now: DateTime<Utc>) -> f64 {
        health::clamp_hours(MAX_HEALTH_HOURS - health::elapsed_hours(self.last_activity_at, now))
    }

    /// Remaining fraction of the budget, in `[0, 1]`.
    pub fn health_percentage(&self, now: DateTime<Utc>) -> f64 {
        self.hours_until_death(now) / MAX_HEALTH_HOURS
    }

    /// Warning tier as of `now`, using the same thresholds as animals.
    pub fn status(&self, now: DateTime<Utc>) -> HealthStatus {
        health::status_for_hours(self.hours_until_death(now))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_771_059_600, 0).unwrap_or_default()
    }

    #[test]
    fn fresh_activity_is_full_health() {
        let farm = FarmHealth::new(t0());
        assert!((farm.hours_until_death(t0()) - 24.0).abs() < 1e-9);
        assert!((farm.health_percentage(t0()) - 1.0).abs() < 1e-9);
        assert_eq!(farm.status(t0()), HealthStatus::Healthy);
    }

    #[test]
    fn tiers_follow_inactivity() {
        let farm = FarmHealth::new(t0());
        assert_eq!(farm.status(t0() + TimeDelta::hours(16)), HealthStatus::Warning);
        assert_eq!(farm.status(t0() + TimeDelta::hours(22)), HealthStatus::Critical);
        assert_eq!(farm.status(t0() + TimeDelta::hours(24)), HealthStatus::Dead);
        assert!(farm.hours_until_death(t0() + TimeDelta::hours(40)).abs() < 1e-9);
    }

    #[test]
    fn view_is_not_a_running_counter() {
        let farm = FarmHealth::new(t0());
        let later = t0() + TimeDelta::hours(5);
        // Reading twice gives the same answer.
        assert!((farm.hours_until_death(later) - farm.hours_until_death(later)).abs() < 1e-12);
        assert!((farm.hours_until_death(later) - 19.0).abs() < 1e-9);
    }

    #[test]
    fn activity_resets_budget_but_never_goes_back() {
        let mut farm = FarmHealth::new(t0());
        let later = t0() + TimeDelta::hours(20);
        farm.record_activity(later);
        assert_eq!(farm.last_activity_at, later);
        farm.record_activity(t0());
        assert_eq!(farm.last_activity_at, later);
    }
}
