//! Error types for the duofarm-farm crate.
//!
//! The engine's public feeding API reports failure as a plain `false`; the
//! `try_*` variants and the wallet/purchase helpers return these typed
//! errors so callers can tell the user why nothing happened.

use duofarm_types::{AnimalId, Plant};

/// Errors that can occur during farm operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FarmError {
    /// No animal with the given id lives on this farm.
    #[error("animal not found: {0}")]
    AnimalNotFound(AnimalId),

    /// The farm holds none of the requested plant.
    #[error("out of stock: no {0} in the plant inventory")]
    OutOfStock(Plant),

    /// The wallet cannot cover a purchase.
    #[error("insufficient points: need {required} but only have {available}")]
    InsufficientPoints {
        /// Points the purchase costs.
        required: u64,
        /// Points currently in the wallet.
        available: u64,
    },

    /// The catalog entry is not unlocked yet for this duo.
    #[error("{item} unlocks on day {unlock_day} (currently day {current_day})")]
    Locked {
        /// Catalog key of the locked item.
        item: &'static str,
        /// Day the item becomes available.
        unlock_day: u32,
        /// The duo's current day.
        current_day: u32,
    },

    /// Attempted to buy zero units of something.
    #[error("purchase quantity must be at least 1")]
    ZeroQuantity,

    /// An arithmetic overflow occurred in a points or stock computation.
    #[error("arithmetic overflow: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },
}
