//! A single room's farm session.
//!
//! [`FarmSession`] is the one owner of a room's farm engine and points
//! wallet. Everything that mutates the farm goes through it, which is what
//! keeps decay and feeding from racing on the same animal. Share it between
//! tasks as `Arc<tokio::sync::Mutex<FarmSession<_>>>` (see
//! [`SharedSession`](crate::runner::SharedSession)).
//!
//! A room starts without per-animal state. Until the first plant or animal
//! is bought, the farm is reported through the legacy whole-farm view,
//! which only tracks the duo's last activity. That timestamp, the room's
//! start date, and the points balance live in a [`RoomRecord`] that is
//! saved with every save, so none of them reset when the host restarts.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use duofarm_farm::{
    FarmEcosystemEngine, FarmError, FarmHealth, FeedOutcome, PointsWallet, PurchaseReceipt,
    purchase,
};
use duofarm_types::{
    AnimalId, FarmEcosystem, FarmSummary, HealthStatus, Plant, RoomId, RoomRecord, Species,
};

use crate::clock::Clock;
use crate::store::{EcosystemStore, StoreError};

/// Errors that can occur during session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The room has no per-animal farm yet.
    #[error("room {0} has no farm ecosystem yet")]
    NotInitialized(RoomId),

    /// A farm operation was refused.
    #[error("farm error: {source}")]
    Farm {
        /// The underlying farm error.
        #[from]
        source: FarmError,
    },

    /// Loading or saving the farm failed.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },
}

/// Health figures for display, from whichever model the room is on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum FarmOverview {
    /// Per-animal ecosystem aggregates.
    Ecosystem(FarmSummary),
    /// Whole-farm view derived from last activity.
    Legacy {
        /// Hours before the farm dies.
        hours_until_death: f64,
        /// Remaining fraction of the budget.
        health_percentage: f64,
        /// Warning tier.
        status: HealthStatus,
    },
}

impl FarmOverview {
    /// The most severe warning tier in this overview.
    pub const fn worst_status(&self) -> HealthStatus {
        match self {
            Self::Ecosystem(summary) => summary.worst_status,
            Self::Legacy { status, .. } => *status,
        }
    }

    /// The headline health percentage in this overview.
    pub const fn health_percentage(&self) -> f64 {
        match self {
            Self::Ecosystem(summary) => summary.overall_health_percentage,
            Self::Legacy {
                health_percentage, ..
            } => *health_percentage,
        }
    }
}

/// Everything persisted for a room, detached from its session.
///
/// Taking a snapshot is cheap enough to do under the session lock, and the
/// snapshot can then be written without holding it.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomSnapshot {
    /// The room's bookkeeping.
    pub room: RoomRecord,
    /// The farm, if the room has one yet.
    pub farm: Option<FarmEcosystem>,
}

impl RoomSnapshot {
    /// Write the snapshot to `store`. Returns whether a farm was written.
    pub fn save_to(&self, store: &dyn EcosystemStore) -> Result<bool, StoreError> {
        store.save_room(&self.room)?;
        match &self.farm {
            Some(farm) => {
                store.save(farm)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Owner of one room's farm, wallet, and clock.
#[derive(Debug)]
pub struct FarmSession<C: Clock> {
    room_id: RoomId,
    started_at: DateTime<Utc>,
    clock: C,
    engine: Option<FarmEcosystemEngine>,
    legacy: FarmHealth,
    wallet: PointsWallet,
}

impl<C: Clock> FarmSession<C> {
    /// Open a session for a room with no farm ecosystem yet.
    ///
    /// The record supplies when the duo paired up (shop unlock days count
    /// from it), their last activity, and their points balance.
    pub const fn new(room: RoomRecord, clock: C) -> Self {
        Self {
            room_id: room.room_id,
            started_at: room.started_at,
            clock,
            engine: None,
            legacy: FarmHealth::new(room.last_activity_at),
            wallet: PointsWallet::new(room.points_balance),
        }
    }

    /// Open a session and restore the room from `store`.
    ///
    /// A saved room record wins over `defaults`, which only describe a room
    /// the store has never seen. The farm is restored if one was saved.
    pub fn load(
        store: &dyn EcosystemStore,
        defaults: RoomRecord,
        clock: C,
    ) -> Result<Self, SessionError> {
        let room_id = defaults.room_id;
        let room = match store.load_room(room_id)? {
            Some(saved) => {
                info!(
                    %room_id,
                    started_at = %saved.started_at,
                    last_activity_at = %saved.last_activity_at,
                    points_balance = saved.points_balance,
                    "Room record restored"
                );
                saved
            }
            None => {
                info!(%room_id, "New room");
                defaults
            }
        };

        let mut session = Self::new(room, clock);
        if let Some(farm) = store.load(room_id)? {
            let engine = FarmEcosystemEngine::restore(farm);
            info!(
                %room_id,
                animals = engine.animal_count(),
                last_updated_at = %engine.last_updated_at(),
                "Farm restored"
            );
            session.engine = Some(engine);
        } else {
            info!(%room_id, "No saved farm; using whole-farm health until first purchase");
        }
        Ok(session)
    }

    /// The room's bookkeeping as of now.
    pub const fn room_record(&self) -> RoomRecord {
        RoomRecord::new(
            self.room_id,
            self.started_at,
            self.legacy.last_activity_at,
            self.wallet.balance(),
        )
    }

    /// Copy out everything that gets persisted.
    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            room: self.room_record(),
            farm: self.engine.as_ref().map(|e| e.state().clone()),
        }
    }

    /// Save the room record and the farm to `store`.
    ///
    /// Returns `false` if the room has no farm yet; the record is saved
    /// either way.
    pub fn save(&self, store: &dyn EcosystemStore) -> Result<bool, SessionError> {
        store.save_room(&self.room_record())?;
        let Some(engine) = &self.engine else {
            debug!(room_id = %self.room_id, "Room record saved");
            return Ok(false);
        };
        store.save(engine.state())?;
        debug!(room_id = %self.room_id, "Farm saved");
        Ok(true)
    }

    /// The hosted room.
    pub const fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// The session's clock.
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// The farm engine, if the room has one.
    pub const fn engine(&self) -> Option<&FarmEcosystemEngine> {
        self.engine.as_ref()
    }

    /// Whether the room has per-animal state.
    pub const fn is_initialized(&self) -> bool {
        self.engine.is_some()
    }

    /// The duo's wallet.
    pub const fn wallet(&self) -> &PointsWallet {
        &self.wallet
    }

    /// Whole days since the duo paired up (day 0 is the first day).
    pub fn day(&self) -> u32 {
        let days = self.clock.now().signed_duration_since(self.started_at).num_days();
        u32::try_from(days.max(0)).unwrap_or(u32::MAX)
    }

    /// Create the per-animal farm if it does not exist yet.
    pub fn initialize_ecosystem(&mut self) -> &mut FarmEcosystemEngine {
        let room_id = self.room_id;
        let now = self.clock.now();
        self.engine.get_or_insert_with(|| {
            info!(%room_id, "Farm ecosystem initialized");
            FarmEcosystemEngine::new(room_id, now)
        })
    }

    /// Note that a member of the duo did something.
    pub fn record_activity(&mut self) {
        self.legacy.record_activity(self.clock.now());
    }

    /// Add earned points to the wallet.
    pub fn credit_points(&mut self, amount: u64) -> Result<u64, SessionError> {
        Ok(self.wallet.credit(amount)?)
    }

    /// Apply time decay to every animal. Returns animals that just died.
    pub fn update_health(&mut self) -> Vec<AnimalId> {
        let now = self.clock.now();
        self.engine
            .as_mut()
            .map(|engine| engine.update_health(now))
            .unwrap_or_default()
    }

    /// Feed one unit of `plant` to an animal.
    ///
    /// Decay is applied first, so the hours since the last refresh are
    /// charged before the plant's nutrition is added.
    pub fn feed(&mut self, animal_id: AnimalId, plant: Plant) -> Result<FeedOutcome, SessionError> {
        let now = self.clock.now();
        let engine = self
            .engine
            .as_mut()
            .ok_or(SessionError::NotInitialized(self.room_id))?;
        engine.update_health(now);
        Ok(engine.try_feed_animal(animal_id, plant, now)?)
    }

    /// Buy plants with points, creating the farm if needed.
    pub fn buy_plant(&mut self, plant: Plant, quantity: u32) -> Result<PurchaseReceipt, SessionError> {
        let day = self.day();
        let now = self.clock.now();
        self.with_purchase(|engine, wallet| {
            purchase::purchase_plant(engine, wallet, plant, quantity, day, now)
        })
    }

    /// Adopt an animal with points, creating the farm if needed.
    pub fn adopt(&mut self, species: Species) -> Result<AnimalId, SessionError> {
        let day = self.day();
        let now = self.clock.now();
        self.with_purchase(|engine, wallet| {
            purchase::adopt_animal(engine, wallet, species, day, now).map(|(id, _receipt)| id)
        })
    }

    /// Adopt an animal without charging points (starter gifts).
    pub fn gift_animal(&mut self, species: Species) -> AnimalId {
        let now = self.clock.now();
        self.initialize_ecosystem().add_animal(species, now)
    }

    /// Remove dead animals from the farm.
    pub fn remove_dead_animals(&mut self) -> Vec<AnimalId> {
        let now = self.clock.now();
        self.engine
            .as_mut()
            .map(|engine| engine.remove_dead_animals(now))
            .unwrap_or_default()
    }

    /// Current health figures for display.
    pub fn overview(&self) -> FarmOverview {
        match &self.engine {
            Some(engine) => FarmOverview::Ecosystem(engine.summary()),
            None => {
                let now = self.clock.now();
                FarmOverview::Legacy {
                    hours_until_death: self.legacy.hours_until_death(now),
                    health_percentage: self.legacy.health_percentage(now),
                    status: self.legacy.status(now),
                }
            }
        }
    }

    /// Run a purchase against the farm, creating the farm only if the
    /// purchase goes through.
    fn with_purchase<T>(
        &mut self,
        purchase: impl FnOnce(&mut FarmEcosystemEngine, &mut PointsWallet) -> Result<T, FarmError>,
    ) -> Result<T, SessionError> {
        let existed = self.engine.is_some();
        let mut engine = self
            .engine
            .take()
            .unwrap_or_else(|| FarmEcosystemEngine::new(self.room_id, self.clock.now()));

        let result = purchase(&mut engine, &mut self.wallet);
        if existed || result.is_ok() {
            if !existed {
                info!(room_id = %self.room_id, "Farm ecosystem initialized");
            }
            self.engine = Some(engine);
        }
        Ok(result?)
    }
}
