//! Farm ecosystem engine for Duofarm.
//!
//! This crate is the logic layer for a duo's farm: everything that operates
//! on farm state without touching I/O. It sits between `duofarm-types`
//! (which defines the data structures) and `duofarm-core` (which handles
//! persistence, clocks, and scheduling).
//!
//! # Modules
//!
//! - [`catalog`] -- Static plant and animal shop entries ([`PlantInfo`], [`AnimalInfo`])
//! - [`ecosystem`] -- The engine that owns a room's farm ([`FarmEcosystemEngine`])
//! - [`error`] -- Error types for farm operations ([`FarmError`])
//! - [`health`] -- Per-animal decay, feeding, and warning tiers
//! - [`inventory`] -- Plant inventory bookkeeping
//! - [`legacy`] -- Whole-farm health derived from last activity ([`FarmHealth`])
//! - [`purchase`] -- Unlock-gated, points-debited shop purchases
//! - [`wallet`] -- The duo's shared points balance ([`PointsWallet`])

pub mod catalog;
pub mod ecosystem;
pub mod error;
pub mod health;
pub mod inventory;
pub mod legacy;
pub mod purchase;
pub mod wallet;

// Re-export primary types at crate root for convenience.
pub use catalog::{AnimalInfo, PlantInfo, animal_info, plant_info};
pub use ecosystem::{FarmEcosystemEngine, FeedOutcome};
pub use error::FarmError;
pub use health::{CRITICAL_THRESHOLD_HOURS, MAX_HEALTH_HOURS, WARNING_THRESHOLD_HOURS};
pub use legacy::FarmHealth;
pub use purchase::{PurchaseReceipt, adopt_animal, purchase_plant};
pub use wallet::PointsWallet;
