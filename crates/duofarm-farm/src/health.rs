//! Per-animal health mechanics: decay over wall-clock time and feeding.
//!
//! An animal carries a health budget of at most [`MAX_HEALTH_HOURS`] hours.
//! Every recalculation subtracts the hours elapsed since `last_fed_at` and
//! then moves `last_fed_at` to the recalculation instant, so decay is a
//! running subtraction checkpointed at each call:
//!
//! - calling [`apply_decay`] twice in a row only subtracts the gap between
//!   the two calls;
//! - polling less often gives one larger decay with the same end state.
//!
//! Feeding adds `MAX_HEALTH_HOURS * nutrition / 100` hours, capped at the
//! maximum.

use chrono::{DateTime, Utc};
use duofarm_types::{AnimalHealth, AnimalId, HealthStatus, Species};

/// Ceiling on an animal's health budget, in hours.
pub const MAX_HEALTH_HOURS: f64 = 24.0;

/// Above this many hours an animal is healthy.
pub const WARNING_THRESHOLD_HOURS: f64 = 8.0;

/// At or below this many hours (and above zero) an animal is critical.
pub const CRITICAL_THRESHOLD_HOURS: f64 = 2.0;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Create a fresh animal at full health, fed at `now`.
pub const fn new_animal(id: AnimalId, species: Species, now: DateTime<Utc>) -> AnimalHealth {
    AnimalHealth {
        id,
        species,
        last_fed_at: now,
        hours_until_death: MAX_HEALTH_HOURS,
    }
}

/// Hours between `from` and `to`.
///
/// A negative span (the clock moved backwards) counts as zero.
pub fn elapsed_hours(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    to.signed_duration_since(from)
        .to_std()
        .map_or(0.0, |d| d.as_secs_f64() / SECONDS_PER_HOUR)
}

/// Clamp an hour value into `[0, MAX_HEALTH_HOURS]`. NaN becomes zero.
pub fn clamp_hours(hours: f64) -> f64 {
    if hours.is_nan() {
        return 0.0;
    }
    hours.clamp(0.0, MAX_HEALTH_HOURS)
}

/// Classify a remaining-hours value into its warning tier.
pub fn status_for_hours(hours: f64) -> HealthStatus {
    if hours > WARNING_THRESHOLD_HOURS {
        HealthStatus::Healthy
    } else if hours > CRITICAL_THRESHOLD_HOURS {
        HealthStatus::Warning
    } else if hours > 0.0 {
        HealthStatus::Critical
    } else {
        HealthStatus::Dead
    }
}

/// Fraction of the maximum budget remaining, in `[0, 1]`.
pub fn health_percentage(animal: &AnimalHealth) -> f64 {
    (animal.hours_until_death / MAX_HEALTH_HOURS).clamp(0.0, 1.0)
}

/// Current warning tier of an animal.
pub fn status(animal: &AnimalHealth) -> HealthStatus {
    status_for_hours(animal.hours_until_death)
}

/// Subtract the hours elapsed since the last checkpoint and move the
/// checkpoint to `now`.
///
/// Returns the number of hours actually removed from the budget.
pub fn apply_decay(animal: &mut AnimalHealth, now: DateTime<Utc>) -> f64 {
    let before = animal.hours_until_death;
    let elapsed = elapsed_hours(animal.last_fed_at, now);
    animal.hours_until_death = clamp_hours(before - elapsed);
    animal.last_fed_at = now;
    before - animal.hours_until_death
}

/// Hours restored by a plant with the given nutrition percentage.
pub fn nutrition_gain_hours(nutrition_value: u8) -> f64 {
    MAX_HEALTH_HOURS * (f64::from(nutrition_value.min(100)) / 100.0)
}

/// Restore health from a plant and move the checkpoint to `now`.
///
/// Returns the number of hours actually added, which is less than the
/// plant's nominal gain when the animal was already near full health.
pub fn apply_feed(animal: &mut AnimalHealth, nutrition_value: u8, now: DateTime<Utc>) -> f64 {
    let before = animal.hours_until_death;
    animal.hours_until_death = clamp_hours(before + nutrition_gain_hours(nutrition_value));
    animal.last_fed_at = now;
    animal.hours_until_death - before
}
