//! The farm ecosystem engine.
//!
//! [`FarmEcosystemEngine`] owns one room's [`FarmEcosystem`] and is the only
//! thing that mutates it. Every operation takes the current instant
//! explicitly, so the engine is a deterministic function of its state and
//! the times it is handed. It performs no I/O and never fails loudly: the
//! only refusals are feeding an unknown animal or feeding from an empty
//! inventory slot, both of which leave the farm untouched.
//!
//! The engine is not `Sync`-aware. Callers serialize access by giving it a
//! single owner (see `duofarm-core`'s `FarmSession`).

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use duofarm_types::{
    AnimalHealth, AnimalId, FarmEcosystem, FarmSummary, HealthStatus, Plant, RoomId, Species,
};

use crate::catalog;
use crate::error::FarmError;
use crate::health;
use crate::inventory;

/// Details of a successful feeding.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedOutcome {
    /// The animal that was fed.
    pub animal_id: AnimalId,
    /// The plant consumed.
    pub plant: Plant,
    /// Hours actually restored (after capping at the maximum).
    pub hours_gained: f64,
    /// The animal's budget after feeding.
    pub hours_until_death: f64,
    /// Units of the plant left in stock.
    pub remaining_stock: u32,
}

/// Owner and mutator of a single room's farm.
#[derive(Debug, Clone, PartialEq)]
pub struct FarmEcosystemEngine {
    farm: FarmEcosystem,
}

impl FarmEcosystemEngine {
    /// Start an empty farm for `room_id`.
    pub const fn new(room_id: RoomId, now: DateTime<Utc>) -> Self {
        Self {
            farm: FarmEcosystem::new(room_id, now),
        }
    }

    /// Take ownership of a farm loaded from a store.
    ///
    /// Stored data is normalized on the way in: hour budgets are clamped to
    /// the valid range, zero-quantity inventory entries are dropped, and the
    /// animal map is re-keyed by each animal's own id.
    pub fn restore(mut farm: FarmEcosystem) -> Self {
        let stored = farm.animals.len();
        farm.animals = core::mem::take(&mut farm.animals)
            .into_values()
            .map(|mut animal| {
                animal.hours_until_death = health::clamp_hours(animal.hours_until_death);
                (animal.id, animal)
            })
            .collect();
        inventory::prune_empty(&mut farm.plant_inventory);

        if farm.animals.len() != stored {
            info!(
                room_id = %farm.room_id,
                stored,
                kept = farm.animals.len(),
                "Dropped animals with duplicate ids while restoring farm"
            );
        }

        Self { farm }
    }

    /// Borrow the underlying farm state (for persistence and display).
    pub const fn state(&self) -> &FarmEcosystem {
        &self.farm
    }

    /// Give the farm state back, e.g. to hand it to a store.
    pub fn into_state(self) -> FarmEcosystem {
        self.farm
    }

    /// The room this farm belongs to.
    pub const fn room_id(&self) -> RoomId {
        self.farm.room_id
    }

    /// Last time the farm was mutated.
    pub const fn last_updated_at(&self) -> DateTime<Utc> {
        self.farm.last_updated_at
    }

    // -----------------------------------------------------------------------
    // Animals
    // -----------------------------------------------------------------------

    /// Adopt a new individual of `species` at full health.
    ///
    /// Species validity and affordability are the caller's concern.
    pub fn add_animal(&mut self, species: Species, now: DateTime<Utc>) -> AnimalId {
        let mut id = AnimalId::new();
        while self.farm.animals.contains_key(&id) {
            id = AnimalId::new();
        }

        self.farm.animals.insert(id, health::new_animal(id, species, now));
        self.farm.last_updated_at = now;

        debug!(room_id = %self.farm.room_id, animal_id = %id, %species, "Animal added");
        id
    }

    /// Look up one animal.
    pub fn animal(&self, id: AnimalId) -> Option<&AnimalHealth> {
        self.farm.animals.get(&id)
    }

    /// All tracked animals, dead ones included.
    pub fn animals(&self) -> impl Iterator<Item = &AnimalHealth> {
        self.farm.animals.values()
    }

    /// Number of tracked animals, dead ones included.
    pub fn animal_count(&self) -> usize {
        self.farm.animals.len()
    }

    /// Apply time decay to every animal and checkpoint them at `now`.
    ///
    /// Returns the ids of animals that died during this update.
    pub fn update_health(&mut self, now: DateTime<Utc>) -> Vec<AnimalId> {
        let mut newly_dead = Vec::new();

        for animal in self.farm.animals.values_mut() {
            let was_alive = health::status(animal).is_alive();
            health::apply_decay(animal, now);
            if was_alive && !health::status(animal).is_alive() {
                newly_dead.push(animal.id);
            }
        }
        self.farm.last_updated_at = now;

        if !newly_dead.is_empty() {
            info!(
                room_id = %self.farm.room_id,
                count = newly_dead.len(),
                "Animals died since the last health update"
            );
        }
        newly_dead
    }

    /// Feed one unit of `plant` to an animal, reporting why it failed.
    ///
    /// On error nothing is mutated.
    pub fn try_feed_animal(
        &mut self,
        id: AnimalId,
        plant: Plant,
        now: DateTime<Utc>,
    ) -> Result<FeedOutcome, FarmError> {
        let Some(animal) = self.farm.animals.get_mut(&id) else {
            return Err(FarmError::AnimalNotFound(id));
        };
        let remaining_stock = inventory::take_one(&mut self.farm.plant_inventory, plant)?;

        let hours_gained = health::apply_feed(animal, catalog::plant_info(plant).nutrition_value, now);
        let hours_until_death = animal.hours_until_death;
        self.farm.last_updated_at = now;

        debug!(
            room_id = %self.farm.room_id,
            animal_id = %id,
            %plant,
            hours_gained,
            hours_until_death,
            remaining_stock,
            "Animal fed"
        );

        Ok(FeedOutcome {
            animal_id: id,
            plant,
            hours_gained,
            hours_until_death,
            remaining_stock,
        })
    }

    /// Feed one unit of `plant` to an animal.
    ///
    /// Returns `false`, leaving the farm untouched, when the animal does not
    /// exist or the plant is out of stock.
    pub fn feed_animal(&mut self, id: AnimalId, plant: Plant, now: DateTime<Utc>) -> bool {
        self.try_feed_animal(id, plant, now).is_ok()
    }

    /// Remove every dead animal, returning their ids.
    ///
    /// Dead animals are never pruned implicitly. `last_updated_at` moves to
    /// `now` only if something was removed.
    pub fn remove_dead_animals(&mut self, now: DateTime<Utc>) -> Vec<AnimalId> {
        let dead: Vec<AnimalId> = self
            .farm
            .animals
            .values()
            .filter(|a| !health::status(a).is_alive())
            .map(|a| a.id)
            .collect();
        for id in &dead {
            self.farm.animals.remove(id);
        }
        if !dead.is_empty() {
            self.farm.last_updated_at = now;
            debug!(room_id = %self.farm.room_id, removed = dead.len(), "Dead animals removed");
        }
        dead
    }

    /// The healthiest individual of each species present.
    ///
    /// Display code that shows one animal per species should use this
    /// rather than picking arbitrarily.
    pub fn healthiest_by_species(&self) -> BTreeMap<Species, &AnimalHealth> {
        let mut best: BTreeMap<Species, &AnimalHealth> = BTreeMap::new();
        for animal in self.farm.animals.values() {
            match best.entry(animal.species) {
                Entry::Vacant(slot) => {
                    slot.insert(animal);
                }
                Entry::Occupied(mut slot) => {
                    if animal.hours_until_death > slot.get().hours_until_death {
                        slot.insert(animal);
                    }
                }
            }
        }
        best
    }

    // -----------------------------------------------------------------------
    // Plants
    // -----------------------------------------------------------------------

    /// Add `quantity` units of `plant` to the inventory.
    ///
    /// Points are debited by the caller before this is called. Stock
    /// saturates at `u32::MAX`. Buying zero units changes nothing, not even
    /// `last_updated_at`.
    pub fn buy_plant(&mut self, plant: Plant, quantity: u32, now: DateTime<Utc>) {
        if quantity == 0 {
            return;
        }
        inventory::add_plant(&mut self.farm.plant_inventory, plant, quantity);
        self.farm.last_updated_at = now;
        debug!(
            room_id = %self.farm.room_id,
            %plant,
            quantity,
            stock = inventory::quantity(&self.farm.plant_inventory, plant),
            "Plants stocked"
        );
    }

    /// Units of `plant` in stock.
    pub fn plant_quantity(&self, plant: Plant) -> u32 {
        inventory::quantity(&self.farm.plant_inventory, plant)
    }

    /// The whole plant inventory.
    pub const fn plant_inventory(&self) -> &BTreeMap<Plant, u32> {
        &self.farm.plant_inventory
    }

    // -----------------------------------------------------------------------
    // Aggregates
    // -----------------------------------------------------------------------

    /// Mean health percentage over living animals.
    ///
    /// An empty farm reports `1.0` (nothing to worry about); a farm whose
    /// animals are all dead reports `0.0`.
    pub fn overall_health_percentage(&self) -> f64 {
        if self.farm.animals.is_empty() {
            return 1.0;
        }

        let (sum, living) = self
            .farm
            .animals
            .values()
            .filter(|a| health::status(a).is_alive())
            .fold((0.0_f64, 0_u32), |(sum, n), a| {
                (sum + health::health_percentage(a), n.saturating_add(1))
            });

        if living == 0 {
            return 0.0;
        }
        sum / f64::from(living)
    }

    /// Number of animals in the critical tier.
    pub fn critical_animals_count(&self) -> u32 {
        self.count_with_status(HealthStatus::Critical)
    }

    /// Number of dead animals still tracked.
    pub fn dead_animals_count(&self) -> u32 {
        self.count_with_status(HealthStatus::Dead)
    }

    /// Most severe tier across all animals (`Healthy` for an empty farm).
    pub fn worst_warning_level(&self) -> HealthStatus {
        self.farm
            .animals
            .values()
            .map(health::status)
            .max()
            .unwrap_or(HealthStatus::Healthy)
    }

    /// All aggregates in one snapshot.
    pub fn summary(&self) -> FarmSummary {
        FarmSummary {
            animal_count: u32::try_from(self.farm.animals.len()).unwrap_or(u32::MAX),
            overall_health_percentage: self.overall_health_percentage(),
            critical_count: self.critical_animals_count(),
            dead_count: self.dead_animals_count(),
            worst_status: self.worst_warning_level(),
        }
    }

    fn count_with_status(&self, status: HealthStatus) -> u32 {
        let n = self
            .farm
            .animals
            .values()
            .filter(|a| health::status(a) == status)
            .count();
        u32::try_from(n).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;
    use crate::health::MAX_HEALTH_HOURS;

    const EPS: f64 = 1e-9;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_771_059_600, 0).unwrap_or_default()
    }

    fn engine() -> FarmEcosystemEngine {
        FarmEcosystemEngine::new(RoomId::new(), t0())
    }

    fn hours_of(engine: &FarmEcosystemEngine, id: AnimalId) -> f64 {
        engine.animal(id).map_or(f64::NAN, |a| a.hours_until_death)
    }

    fn set_hours(engine: &mut FarmEcosystemEngine, id: AnimalId, hours: f64) {
        if let Some(a) = engine.farm.animals.get_mut(&id) {
            a.hours_until_death = hours;
        }
    }

    #[test]
    fn add_animal_starts_full() {
        let mut eco = engine();
        let id = eco.add_animal(Species::Chicken, t0());
        let animal = eco.animal(id);
        assert!(animal.is_some());
        assert!(approx(hours_of(&eco, id), MAX_HEALTH_HOURS));
        assert_eq!(animal.map(|a| a.last_fed_at), Some(t0()));
        assert_eq!(animal.map(|a| a.species), Some(Species::Chicken));
    }

    #[test]
    fn same_species_individuals_are_tracked_independently() {
        let mut eco = engine();
        let a = eco.add_animal(Species::Sheep, t0());
        let b = eco.add_animal(Species::Sheep, t0());
        assert_ne!(a, b);
        assert_eq!(eco.animal_count(), 2);

        set_hours(&mut eco, a, 5.0);
        assert!(approx(hours_of(&eco, b), MAX_HEALTH_HOURS));
    }

    #[test]
    fn decay_then_feed_scenario() {
        let mut eco = engine();
        let id = eco.add_animal(Species::Chicken, t0());
        eco.buy_plant(Plant::Wheat, 1, t0());

        let t10 = t0() + TimeDelta::hours(10);
        eco.update_health(t10);
        assert!(approx(hours_of(&eco, id), 14.0));
        assert_eq!(eco.animal(id).map(health::status), Some(HealthStatus::Healthy));

        assert!(eco.feed_animal(id, Plant::Wheat, t10));
        assert!(approx(hours_of(&eco, id), 21.2));
    }

    #[test]
    fn critical_animal_dies_and_clamps() {
        let mut eco = engine();
        let id = eco.add_animal(Species::Pig, t0());
        set_hours(&mut eco, id, 1.5);
        assert_eq!(eco.worst_warning_level(), HealthStatus::Critical);

        let died = eco.update_health(t0() + TimeDelta::hours(2));
        assert!(approx(hours_of(&eco, id), 0.0));
        assert_eq!(died, vec![id]);
        assert_eq!(eco.worst_warning_level(), HealthStatus::Dead);

        // Already dead animals are not reported again.
        let died_again = eco.update_health(t0() + TimeDelta::hours(3));
        assert!(died_again.is_empty());
    }

    #[test]
    fn repeated_updates_do_not_double_count() {
        let mut eco = engine();
        let id = eco.add_animal(Species::Duck, t0());
        let t = t0() + TimeDelta::hours(6);
        eco.update_health(t);
        eco.update_health(t);
        eco.update_health(t + TimeDelta::seconds(360));
        assert!(approx(hours_of(&eco, id), 24.0 - 6.0 - 0.1));
        assert_eq!(eco.last_updated_at(), t + TimeDelta::seconds(360));
    }

    #[test]
    fn sparse_polling_reaches_same_state() {
        let mut frequent = engine();
        let id = frequent.add_animal(Species::Cow, t0());
        let mut sparse = frequent.clone();

        for minute in 1..=300 {
            frequent.update_health(t0() + TimeDelta::minutes(minute));
        }
        sparse.update_health(t0() + TimeDelta::minutes(300));

        assert!((hours_of(&frequent, id) - hours_of(&sparse, id)).abs() < 1e-6);
    }

    #[test]
    fn feed_with_empty_inventory_is_noop() {
        let mut eco = engine();
        let id = eco.add_animal(Species::Chicken, t0());
        set_hours(&mut eco, id, 10.0);
        let before = eco.clone();

        assert!(!eco.feed_animal(id, Plant::Wheat, t0() + TimeDelta::hours(1)));
        assert_eq!(eco, before);
        assert_eq!(
            eco.try_feed_animal(id, Plant::Wheat, t0()),
            Err(FarmError::OutOfStock(Plant::Wheat))
        );
    }

    #[test]
    fn feed_unknown_animal_is_noop() {
        let mut eco = engine();
        eco.add_animal(Species::Chicken, t0());
        eco.buy_plant(Plant::Corn, 2, t0());
        let before = eco.clone();

        let stranger = AnimalId::new();
        assert!(!eco.feed_animal(stranger, Plant::Corn, t0() + TimeDelta::hours(1)));
        assert_eq!(eco, before);
        assert_eq!(eco.plant_quantity(Plant::Corn), 2);
        assert_eq!(
            eco.try_feed_animal(stranger, Plant::Corn, t0()),
            Err(FarmError::AnimalNotFound(stranger))
        );
    }

    #[test]
    fn golden_hay_restores_dead_budget_to_exactly_max() {
        let mut eco = engine();
        let id = eco.add_animal(Species::Goat, t0());
        set_hours(&mut eco, id, 0.0);
        eco.buy_plant(Plant::GoldenHay, 1, t0());
        assert!(eco.feed_animal(id, Plant::GoldenHay, t0()));
        assert!(approx(hours_of(&eco, id), MAX_HEALTH_HOURS));
    }

    #[test]
    fn repeated_feeding_never_exceeds_max() {
        let mut eco = engine();
        let id = eco.add_animal(Species::Rabbit, t0());
        eco.buy_plant(Plant::Carrot, 5, t0());
        for _ in 0..5 {
            assert!(eco.feed_animal(id, Plant::Carrot, t0()));
            assert!(hours_of(&eco, id) <= MAX_HEALTH_HOURS);
        }
        assert!(approx(hours_of(&eco, id), MAX_HEALTH_HOURS));
    }

    #[test]
    fn feeding_last_unit_removes_inventory_key() {
        let mut eco = engine();
        let id = eco.add_animal(Species::Chicken, t0());
        eco.buy_plant(Plant::Wheat, 3, t0());
        assert_eq!(eco.plant_quantity(Plant::Wheat), 3);

        for expected_left in [2, 1, 0] {
            let outcome = eco.try_feed_animal(id, Plant::Wheat, t0());
            assert_eq!(outcome.map(|o| o.remaining_stock), Ok(expected_left));
        }
        assert!(!eco.plant_inventory().contains_key(&Plant::Wheat));
        assert!(!eco.feed_animal(id, Plant::Wheat, t0()));
    }

    #[test]
    fn successful_feed_bumps_last_updated() {
        let mut eco = engine();
        let id = eco.add_animal(Species::Chicken, t0());
        eco.buy_plant(Plant::Wheat, 1, t0());
        let later = t0() + TimeDelta::hours(2);
        assert!(eco.feed_animal(id, Plant::Wheat, later));
        assert_eq!(eco.last_updated_at(), later);
        assert_eq!(eco.animal(id).map(|a| a.last_fed_at), Some(later));
    }

    #[test]
    fn invariant_holds_over_mixed_sequence() {
        let mut eco = engine();
        let a = eco.add_animal(Species::Chicken, t0());
        let b = eco.add_animal(Species::Horse, t0());
        eco.buy_plant(Plant::Pumpkin, 50, t0());

        let mut now = t0();
        for step in 0_i64..200 {
            now += TimeDelta::minutes(17 * (step % 7));
            eco.update_health(now);
            if step % 3 == 0 {
                eco.feed_animal(a, Plant::Pumpkin, now);
            }
            if step % 11 == 0 {
                eco.feed_animal(b, Plant::Pumpkin, now);
            }
            for animal in eco.animals() {
                assert!(animal.hours_until_death >= 0.0);
                assert!(animal.hours_until_death <= MAX_HEALTH_HOURS);
            }
        }
    }

    #[test]
    fn overall_percentage_edge_cases() {
        let mut eco = engine();
        assert!(approx(eco.overall_health_percentage(), 1.0));

        let id = eco.add_animal(Species::Chicken, t0());
        set_hours(&mut eco, id, 0.0);
        assert!(approx(eco.overall_health_percentage(), 0.0));
    }

    #[test]
    fn overall_percentage_ignores_dead() {
        let mut eco = engine();
        let alive = eco.add_animal(Species::Chicken, t0());
        let dead = eco.add_animal(Species::Duck, t0());
        set_hours(&mut eco, alive, 12.0);
        set_hours(&mut eco, dead, 0.0);
        assert!(approx(eco.overall_health_percentage(), 0.5));
    }

    #[test]
    fn counts_and_worst_level() {
        let mut eco = engine();
        assert_eq!(eco.worst_warning_level(), HealthStatus::Healthy);

        let ids: Vec<AnimalId> = (0..4).map(|_| eco.add_animal(Species::Sheep, t0())).collect();
        for (id, hours) in ids.iter().zip([20.0, 6.0, 1.0, 0.0]) {
            set_hours(&mut eco, *id, hours);
        }

        assert_eq!(eco.critical_animals_count(), 1);
        assert_eq!(eco.dead_animals_count(), 1);
        assert_eq!(eco.worst_warning_level(), HealthStatus::Dead);

        let summary = eco.summary();
        assert_eq!(summary.animal_count, 4);
        assert_eq!(summary.critical_count, 1);
        assert_eq!(summary.dead_count, 1);
        assert_eq!(summary.worst_status, HealthStatus::Dead);
        assert!(approx(summary.overall_health_percentage, 27.0 / 3.0 / 24.0));
    }

    #[test]
    fn prune_removes_only_dead() {
        let mut eco = engine();
        let alive = eco.add_animal(Species::Chicken, t0());
        let dead = eco.add_animal(Species::Chicken, t0());
        set_hours(&mut eco, dead, 0.0);

        assert_eq!(eco.remove_dead_animals(t0()), vec![dead]);
        assert!(eco.animal(alive).is_some());
        assert!(eco.animal(dead).is_none());
        assert!(eco.remove_dead_animals(t0()).is_empty());
    }

    #[test]
    fn buying_plants_bumps_last_updated() {
        let mut eco = engine();
        let later = t0() + TimeDelta::hours(3);
        eco.buy_plant(Plant::Wheat, 2, later);
        assert_eq!(eco.plant_quantity(Plant::Wheat), 2);
        assert_eq!(eco.last_updated_at(), later);

        eco.buy_plant(Plant::Wheat, 0, later + TimeDelta::hours(1));
        assert_eq!(eco.last_updated_at(), later);
    }

    #[test]
    fn pruning_bumps_last_updated_only_when_something_goes() {
        let mut eco = engine();
        let dead = eco.add_animal(Species::Duck, t0());
        set_hours(&mut eco, dead, 0.0);

        let later = t0() + TimeDelta::hours(5);
        assert_eq!(eco.remove_dead_animals(later), vec![dead]);
        assert_eq!(eco.last_updated_at(), later);

        assert!(eco.remove_dead_animals(later + TimeDelta::hours(1)).is_empty());
        assert_eq!(eco.last_updated_at(), later);
    }

    #[test]
    fn healthiest_by_species_picks_best_individual() {
        let mut eco = engine();
        let weak = eco.add_animal(Species::Chicken, t0());
        let strong = eco.add_animal(Species::Chicken, t0());
        let cow = eco.add_animal(Species::Cow, t0());
        set_hours(&mut eco, weak, 3.0);
        set_hours(&mut eco, strong, 18.0);

        let best = eco.healthiest_by_species();
        assert_eq!(best.len(), 2);
        assert_eq!(best.get(&Species::Chicken).map(|a| a.id), Some(strong));
        assert_eq!(best.get(&Species::Cow).map(|a| a.id), Some(cow));
    }

    #[test]
    fn restore_normalizes_stored_state() {
        let mut eco = engine();
        let id = eco.add_animal(Species::Chicken, t0());
        let mut farm = eco.into_state();
        if let Some(a) = farm.animals.get_mut(&id) {
            a.hours_until_death = 99.0;
        }
        farm.plant_inventory.insert(Plant::Apple, 0);
        farm.plant_inventory.insert(Plant::Corn, 2);

        let restored = FarmEcosystemEngine::restore(farm);
        assert!(approx(hours_of(&restored, id), MAX_HEALTH_HOURS));
        assert!(!restored.plant_inventory().contains_key(&Plant::Apple));
        assert_eq!(restored.plant_quantity(Plant::Corn), 2);
    }
}
