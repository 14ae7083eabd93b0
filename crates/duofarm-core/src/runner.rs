//! Periodic health refresh for a shared farm session.
//!
//! [`run_refresh_loop`] wakes up on a fixed interval, applies time decay to
//! the room's animals, and hands a [`RefreshReport`] to a
//! [`RefreshCallback`]. The loop runs until the shutdown channel flips to
//! `true` or its sender is dropped.
//!
//! Decay is a running subtraction checkpointed at every refresh, so the
//! interval only controls how fresh the displayed figures are. It never
//! changes how fast animals lose health.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{Mutex, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use duofarm_types::{AnimalId, HealthStatus};

use crate::clock::Clock;
use crate::session::{FarmOverview, FarmSession};

/// A session shared between the refresh loop and request handlers.
pub type SharedSession<C> = Arc<Mutex<FarmSession<C>>>;

/// What one refresh changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshReport {
    /// Animals whose health reached zero during this refresh.
    pub newly_dead: Vec<AnimalId>,
    /// Health figures after the refresh.
    pub overview: FarmOverview,
}

/// Result of a refresh loop run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshResult {
    /// Number of refreshes performed.
    pub refreshes: u64,
    /// Worst warning tier seen at the last refresh.
    pub final_status: HealthStatus,
}

/// Callback invoked after each refresh.
///
/// Runs while the session lock is held, so implementations should be quick.
/// Persisting the farm every few refreshes is the typical use.
pub trait RefreshCallback<C: Clock>: Send {
    /// Called after a refresh completes.
    fn on_refresh(&mut self, report: &RefreshReport, session: &FarmSession<C>);
}

/// A no-op refresh callback.
pub struct NoOpCallback;

impl<C: Clock> RefreshCallback<C> for NoOpCallback {
    fn on_refresh(&mut self, _report: &RefreshReport, _session: &FarmSession<C>) {}
}

/// Refresh the session's farm every `period` until shutdown.
///
/// The first refresh happens immediately. A warning is logged whenever the
/// farm's worst tier gets more severe than it was at the previous refresh.
pub async fn run_refresh_loop<C: Clock>(
    session: &SharedSession<C>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
    callback: &mut dyn RefreshCallback<C>,
) -> RefreshResult {
    let mut ticker = tokio::time::interval(period.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut refreshes: u64 = 0;
    let mut last_status = session.lock().await.overview().worst_status();

    info!(
        interval_ms = u64::try_from(period.as_millis()).unwrap_or(u64::MAX),
        status = %last_status,
        "Refresh loop starting"
    );

    loop {
        if *shutdown.borrow() {
            info!("Shutdown requested");
            break;
        }

        tokio::select! {
            biased;
            changed = shutdown.changed() => {
                if changed.is_err() {
                    info!("Shutdown channel closed");
                    break;
                }
                continue;
            }
            _ = ticker.tick() => {}
        }

        let mut guard = session.lock().await;
        let newly_dead = guard.update_health();
        let overview = guard.overview();
        refreshes = refreshes.saturating_add(1);

        for animal_id in &newly_dead {
            warn!(room_id = %guard.room_id(), %animal_id, "Animal died");
        }

        let status = overview.worst_status();
        if status > last_status {
            warn!(
                room_id = %guard.room_id(),
                from = %last_status,
                to = %status,
                health_percentage = overview.health_percentage(),
                "Farm health worsened"
            );
        } else {
            debug!(
                room_id = %guard.room_id(),
                refresh = refreshes,
                %status,
                health_percentage = overview.health_percentage(),
                "Farm refreshed"
            );
        }
        last_status = status;

        let report = RefreshReport {
            newly_dead,
            overview,
        };
        callback.on_refresh(&report, &guard);
        drop(guard);
    }

    let result = RefreshResult {
        refreshes,
        final_status: last_status,
    };
    info!(
        refreshes = result.refreshes,
        final_status = %result.final_status,
        "Refresh loop stopped"
    );
    result
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeDelta, Utc};
    use duofarm_types::{RoomId, RoomRecord, Species};

    use super::*;
    use crate::clock::ManualClock;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_771_059_600, 0).unwrap_or_default()
    }

    fn shared_farm() -> (SharedSession<ManualClock>, ManualClock) {
        let clock = ManualClock::new(t0());
        let handle = clock.clone();
        let mut session = FarmSession::new(RoomRecord::new(RoomId::new(), t0(), t0(), 0), clock);
        session.gift_animal(Species::Chicken);
        (Arc::new(Mutex::new(session)), handle)
    }

    /// Advances the farm clock on every refresh and stops after a fixed count.
    struct Stepper {
        clock: ManualClock,
        step: TimeDelta,
        stop_after: u64,
        seen: u64,
        reports: Vec<RefreshReport>,
        shutdown: watch::Sender<bool>,
    }

    impl RefreshCallback<ManualClock> for Stepper {
        fn on_refresh(&mut self, report: &RefreshReport, _session: &FarmSession<ManualClock>) {
            self.reports.push(report.clone());
            self.seen = self.seen.saturating_add(1);
            self.clock.advance(self.step);
            if self.seen >= self.stop_after {
                let _ = self.shutdown.send(true);
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn loop_stops_on_shutdown_signal() {
        let (session, clock) = shared_farm();
        let (tx, rx) = watch::channel(false);
        let mut stepper = Stepper {
            clock,
            step: TimeDelta::hours(1),
            stop_after: 3,
            seen: 0,
            reports: Vec::new(),
            shutdown: tx,
        };

        let result = run_refresh_loop(&session, Duration::from_secs(30), rx, &mut stepper).await;

        assert_eq!(result.refreshes, 3);
        assert_eq!(stepper.reports.len(), 3);
        assert_eq!(result.final_status, HealthStatus::Healthy);
    }

    #[tokio::test(start_paused = true)]
    async fn loop_reports_deaths_once() {
        let (session, clock) = shared_farm();
        let (tx, rx) = watch::channel(false);
        let mut stepper = Stepper {
            clock,
            step: TimeDelta::hours(13),
            stop_after: 4,
            seen: 0,
            reports: Vec::new(),
            shutdown: tx,
        };

        let result = run_refresh_loop(&session, Duration::from_secs(30), rx, &mut stepper).await;

        // Refreshes at 0h, 13h, 26h, 39h: the chicken dies at the third.
        let deaths: Vec<usize> = stepper.reports.iter().map(|r| r.newly_dead.len()).collect();
        assert_eq!(deaths, vec![0, 0, 1, 0]);
        assert_eq!(result.final_status, HealthStatus::Dead);
    }

    #[tokio::test(start_paused = true)]
    async fn already_signalled_shutdown_runs_nothing() {
        let (session, _clock) = shared_farm();
        let (_tx, rx) = watch::channel(true);
        let result = run_refresh_loop(&session, Duration::from_secs(30), rx, &mut NoOpCallback).await;
        assert_eq!(result.refreshes, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_sender_stops_loop() {
        let (session, _clock) = shared_farm();
        let (tx, rx) = watch::channel(false);
        drop(tx);
        let result = run_refresh_loop(&session, Duration::from_secs(30), rx, &mut NoOpCallback).await;
        // The first tick is immediate but the closed channel wins the biased select.
        assert_eq!(result.refreshes, 0);
    }
}
