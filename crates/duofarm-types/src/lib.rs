//! Shared type definitions for the Duofarm ecosystem.
//!
//! This crate is the single source of truth for the data shapes used across
//! the workspace. Types defined here flow downstream to `TypeScript` via
//! `ts-rs` for front-end consumers.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for animals and rooms
//! - [`enums`] -- Species, plants, and health tiers
//! - [`structs`] -- Animal health, farm ecosystem, room record, and summary structs

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{HealthStatus, Plant, Species};
pub use ids::{AnimalId, RoomId};
pub use structs::{AnimalHealth, FarmEcosystem, FarmSummary, RoomRecord};
