//! Plant inventory operations.
//!
//! The inventory maps each [`Plant`] to the quantity the duo owns. A plant
//! whose quantity reaches zero is removed from the map, so a present key
//! always means "at least one in stock".

use std::collections::BTreeMap;

use duofarm_types::Plant;

use crate::error::FarmError;

/// Quantity of `plant` currently in stock.
pub fn quantity(inventory: &BTreeMap<Plant, u32>, plant: Plant) -> u32 {
    inventory.get(&plant).copied().unwrap_or(0)
}

/// Add `amount` units of `plant`, creating the entry if needed.
///
/// There is no stock ceiling; the count saturates at `u32::MAX`. Adding
/// zero units leaves the map untouched.
pub fn add_plant(inventory: &mut BTreeMap<Plant, u32>, plant: Plant, amount: u32) {
    if amount == 0 {
        return;
    }
    let entry = inventory.entry(plant).or_insert(0);
    *entry = entry.saturating_add(amount);
}

/// Remove one unit of `plant`, returning the quantity left.
///
/// Fails without touching the map if the plant is out of stock. Removes
/// the key entirely when the quantity reaches zero.
pub fn take_one(inventory: &mut BTreeMap<Plant, u32>, plant: Plant) -> Result<u32, FarmError> {
    let current = quantity(inventory, plant);
    let remaining = current.checked_sub(1).ok_or(FarmError::OutOfStock(plant))?;

    if remaining == 0 {
        inventory.remove(&plant);
    } else {
        inventory.insert(plant, remaining);
    }

    Ok(remaining)
}

/// Drop any zero-quantity entries, e.g. from a hand-edited save file.
pub fn prune_empty(inventory: &mut BTreeMap<Plant, u32>) {
    inventory.retain(|_, q| *q > 0);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_inventory() -> BTreeMap<Plant, u32> {
        BTreeMap::new()
    }

    #[test]
    fn quantity_of_absent_plant_is_zero() {
        let inv = empty_inventory();
        assert_eq!(quantity(&inv, Plant::Wheat), 0);
        assert!(inv.is_empty());
    }

    #[test]
    fn add_creates_and_stacks() {
        let mut inv = empty_inventory();
        add_plant(&mut inv, Plant::Wheat, 3);
        add_plant(&mut inv, Plant::Wheat, 2);
        assert_eq!(quantity(&inv, Plant::Wheat), 5);
    }

    #[test]
    fn add_zero_does_not_create_entry() {
        let mut inv = empty_inventory();
        add_plant(&mut inv, Plant::Corn, 0);
        assert!(inv.is_empty());
    }

    #[test]
    fn add_saturates() {
        let mut inv = empty_inventory();
        add_plant(&mut inv, Plant::Corn, u32::MAX);
        add_plant(&mut inv, Plant::Corn, 10);
        assert_eq!(quantity(&inv, Plant::Corn), u32::MAX);
    }

    #[test]
    fn take_one_decrements() {
        let mut inv = empty_inventory();
        inv.insert(Plant::Carrot, 2);
        assert_eq!(take_one(&mut inv, Plant::Carrot), Ok(1));
        assert_eq!(quantity(&inv, Plant::Carrot), 1);
    }

    #[test]
    fn take_last_removes_key() {
        let mut inv = empty_inventory();
        inv.insert(Plant::Carrot, 1);
        assert_eq!(take_one(&mut inv, Plant::Carrot), Ok(0));
        assert_eq!(inv.get(&Plant::Carrot), None);
    }

    #[test]
    fn take_from_empty_fails_without_change() {
        let mut inv = empty_inventory();
        inv.insert(Plant::Apple, 4);
        let result = take_one(&mut inv, Plant::Wheat);
        assert_eq!(result, Err(FarmError::OutOfStock(Plant::Wheat)));
        assert_eq!(inv.len(), 1);
        assert_eq!(quantity(&inv, Plant::Apple), 4);
    }

    #[test]
    fn prune_drops_zero_entries() {
        let mut inv = empty_inventory();
        inv.insert(Plant::Wheat, 3);
        inv.insert(Plant::Apple, 0);
        inv.insert(Plant::Corn, 2);
        prune_empty(&mut inv);
        assert_eq!(inv.len(), 2);
        assert!(!inv.contains_key(&Plant::Apple));
    }
}
