//! Core entity structs for the Duofarm ecosystem.
//!
//! These are the persisted shapes: what a store saves per room and what the
//! front end receives. Behaviour lives in `duofarm-farm`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{HealthStatus, Plant, Species};
use crate::ids::{AnimalId, RoomId};

// ---------------------------------------------------------------------------
// AnimalHealth
// ---------------------------------------------------------------------------

/// Health state of one animal individual.
///
/// `hours_until_death` is a running budget: it is checkpointed against
/// `last_fed_at` on every recalculation rather than derived from a fixed
/// origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AnimalHealth {
    /// Unique id of this individual.
    pub id: AnimalId,
    /// Species of this individual (not unique across a farm).
    pub species: Species,
    /// Last time health was recalculated or the animal was fed.
    pub last_fed_at: DateTime<Utc>,
    /// Remaining health budget in hours, within `[0, 24]`.
    pub hours_until_death: f64,
}

// ---------------------------------------------------------------------------
// FarmEcosystem
// ---------------------------------------------------------------------------

/// Per-room farm state: the animals and the plant inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FarmEcosystem {
    /// The room that owns this farm.
    pub room_id: RoomId,
    /// Live (and not yet pruned dead) animals keyed by individual id.
    pub animals: BTreeMap<AnimalId, AnimalHealth>,
    /// Plant quantities owned. A plant with no stock has no entry.
    pub plant_inventory: BTreeMap<Plant, u32>,
    /// Last time the farm was mutated.
    pub last_updated_at: DateTime<Utc>,
}

impl FarmEcosystem {
    /// Create an empty farm for a room.
    pub const fn new(room_id: RoomId, now: DateTime<Utc>) -> Self {
        Self {
            room_id,
            animals: BTreeMap::new(),
            plant_inventory: BTreeMap::new(),
            last_updated_at: now,
        }
    }
}

// ---------------------------------------------------------------------------
// RoomRecord
// ---------------------------------------------------------------------------

/// Per-room bookkeeping kept alongside the farm.
///
/// Exists from the moment a room is hosted, including rooms that have not
/// bought anything yet and therefore have no [`FarmEcosystem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RoomRecord {
    /// The room this record belongs to.
    pub room_id: RoomId,
    /// When the duo paired up. Shop unlock days count from here.
    pub started_at: DateTime<Utc>,
    /// Last time either member of the duo was active.
    pub last_activity_at: DateTime<Utc>,
    /// The duo's shared points balance.
    pub points_balance: u64,
}

impl RoomRecord {
    /// Create a record for a freshly paired room.
    pub const fn new(
        room_id: RoomId,
        started_at: DateTime<Utc>,
        last_activity_at: DateTime<Utc>,
        points_balance: u64,
    ) -> Self {
        Self {
            room_id,
            started_at,
            last_activity_at,
            points_balance,
        }
    }
}

// ---------------------------------------------------------------------------
// FarmSummary
// ---------------------------------------------------------------------------

/// Aggregate health figures polled by the UI and notification layers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FarmSummary {
    /// Number of tracked animals, dead ones included.
    pub animal_count: u32,
    /// Mean health percentage of living animals (`1.0` for an empty farm).
    pub overall_health_percentage: f64,
    /// Animals in the critical tier.
    pub critical_count: u32,
    /// Animals in the dead tier.
    pub dead_count: u32,
    /// Most severe tier on the farm.
    pub worst_status: HealthStatus,
}
