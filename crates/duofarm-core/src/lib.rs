//! Host layer for the Duofarm farm ecosystem.
//!
//! The farm engine in `duofarm-farm` is pure and synchronous. This crate
//! wraps it with everything a running service needs: a clock, a place to
//! persist each room's farm, a single owner per room, and a periodic
//! refresh.
//!
//! # Modules
//!
//! - [`clock`] -- [`Clock`] trait with wall-clock and manual implementations.
//! - [`config`] -- Configuration loading from `duofarm-config.yaml` into
//!   strongly-typed structs.
//! - [`runner`] -- The periodic health refresh loop.
//! - [`session`] -- [`FarmSession`], the single owner of one room's farm.
//! - [`store`] -- [`EcosystemStore`] trait with memory and JSON-file stores.
//!
//! [`Clock`]: clock::Clock
//! [`FarmSession`]: session::FarmSession
//! [`EcosystemStore`]: store::EcosystemStore

pub mod clock;
pub mod config;
pub mod runner;
pub mod session;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, DuofarmConfig};
pub use runner::{
    NoOpCallback, RefreshCallback, RefreshReport, RefreshResult, SharedSession, run_refresh_loop,
};
pub use session::{FarmOverview, FarmSession, RoomSnapshot, SessionError};
pub use store::{EcosystemStore, JsonFileStore, MemoryStore, StoreError};
