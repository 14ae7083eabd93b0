//! Enumeration types for the Duofarm ecosystem.
//!
//! Species and plants are closed sets compiled into the app, so they are
//! enums rather than free-form strings. Their serialized form is the
//! `snake_case` catalog key (`"chicken"`, `"wheat"`), which is also what the
//! backing store and the front end use.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Species
// ---------------------------------------------------------------------------

/// A kind of farm animal the duo can adopt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Species {
    /// The starter animal, available from day one.
    Chicken,
    /// A duck, unlocked shortly after the chicken.
    Duck,
    /// A rabbit.
    Rabbit,
    /// A sheep.
    Sheep,
    /// A pig.
    Pig,
    /// A goat.
    Goat,
    /// A cow, one of the late unlocks.
    Cow,
    /// A horse, the last unlock.
    Horse,
}

impl Species {
    /// Every species in catalog order.
    pub const ALL: [Self; 8] = [
        Self::Chicken,
        Self::Duck,
        Self::Rabbit,
        Self::Sheep,
        Self::Pig,
        Self::Goat,
        Self::Cow,
        Self::Horse,
    ];

    /// The stable catalog key for this species.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Chicken => "chicken",
            Self::Duck => "duck",
            Self::Rabbit => "rabbit",
            Self::Sheep => "sheep",
            Self::Pig => "pig",
            Self::Goat => "goat",
            Self::Cow => "cow",
            Self::Horse => "horse",
        }
    }

    /// Look up a species by its catalog key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key() == key)
    }
}

impl core::fmt::Display for Species {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.key())
    }
}

// ---------------------------------------------------------------------------
// Plant
// ---------------------------------------------------------------------------

/// A plant the duo can buy and feed to animals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Plant {
    /// Cheap staple feed.
    Wheat,
    /// Carrots.
    Carrot,
    /// Corn.
    Corn,
    /// Clover.
    Clover,
    /// Apples.
    Apple,
    /// Pumpkins.
    Pumpkin,
    /// Golden hay, restores an animal fully.
    GoldenHay,
}

impl Plant {
    /// Every plant in catalog order.
    pub const ALL: [Self; 7] = [
        Self::Wheat,
        Self::Carrot,
        Self::Corn,
        Self::Clover,
        Self::Apple,
        Self::Pumpkin,
        Self::GoldenHay,
    ];

    /// The stable catalog key for this plant.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Wheat => "wheat",
            Self::Carrot => "carrot",
            Self::Corn => "corn",
            Self::Clover => "clover",
            Self::Apple => "apple",
            Self::Pumpkin => "pumpkin",
            Self::GoldenHay => "golden_hay",
        }
    }

    /// Look up a plant by its catalog key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }
}

impl core::fmt::Display for Plant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.key())
    }
}

// ---------------------------------------------------------------------------
// HealthStatus
// ---------------------------------------------------------------------------

/// Warning tier derived from an animal's remaining hours.
///
/// Variants are declared from least to most severe so that the derived
/// [`Ord`] gives `Healthy < Warning < Critical < Dead`, and the worst tier
/// of a farm is simply the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum HealthStatus {
    /// More than 8 hours left.
    Healthy,
    /// Between 2 and 8 hours left; the animal is dying.
    Warning,
    /// 2 hours or less left.
    Critical,
    /// No hours left.
    Dead,
}

impl HealthStatus {
    /// Whether this tier still counts as alive.
    pub const fn is_alive(self) -> bool {
        !matches!(self, Self::Dead)
    }
}

impl core::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Warning => write!(f, "warning"),
            Self::Critical => write!(f, "critical"),
            Self::Dead => write!(f, "dead"),
        }
    }
}
