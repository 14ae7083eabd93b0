//! Shop purchases: unlock gates, points, then the engine.
//!
//! The engine itself never looks at costs. These helpers sit in front of it
//! and check the catalog's unlock day, debit the wallet, and only then
//! stock plants or adopt an animal. If any check fails, neither the wallet
//! nor the farm changes.

use chrono::{DateTime, Utc};
use tracing::info;

use duofarm_types::{AnimalId, Plant, Species};

use crate::catalog;
use crate::ecosystem::FarmEcosystemEngine;
use crate::error::FarmError;
use crate::wallet::PointsWallet;

/// What a successful purchase cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseReceipt {
    /// Points debited.
    pub points_spent: u64,
    /// Wallet balance after the debit.
    pub balance_after: u64,
}

/// Buy `quantity` units of `plant` on duo day `day`.
///
/// Fails with [`FarmError::ArithmeticOverflow`] if the stock could not hold
/// the whole quantity, so points are never charged for units that would be
/// dropped.
pub fn purchase_plant(
    engine: &mut FarmEcosystemEngine,
    wallet: &mut PointsWallet,
    plant: Plant,
    quantity: u32,
    day: u32,
    now: DateTime<Utc>,
) -> Result<PurchaseReceipt, FarmError> {
    if quantity == 0 {
        return Err(FarmError::ZeroQuantity);
    }

    let entry = catalog::plant_info(plant);
    check_unlocked(plant.key(), entry.unlock_day, day)?;

    engine
        .plant_quantity(plant)
        .checked_add(quantity)
        .ok_or_else(|| FarmError::ArithmeticOverflow {
            context: format!("{plant} stock overflow"),
        })?;

    let total = u64::from(entry.cost)
        .checked_mul(u64::from(quantity))
        .ok_or_else(|| FarmError::ArithmeticOverflow {
            context: String::from("plant purchase total overflow"),
        })?;
    let balance_after = wallet.debit(total)?;
    engine.buy_plant(plant, quantity, now);

    info!(
        room_id = %engine.room_id(),
        %plant,
        quantity,
        points_spent = total,
        balance_after,
        "Plants purchased"
    );

    Ok(PurchaseReceipt {
        points_spent: total,
        balance_after,
    })
}

/// Adopt one animal of `species` on duo day `day`.
pub fn adopt_animal(
    engine: &mut FarmEcosystemEngine,
    wallet: &mut PointsWallet,
    species: Species,
    day: u32,
    now: DateTime<Utc>,
) -> Result<(AnimalId, PurchaseReceipt), FarmError> {
    let entry = catalog::animal_info(species);
    check_unlocked(species.key(), entry.unlock_day, day)?;

    let cost = u64::from(entry.cost);
    let balance_after = wallet.debit(cost)?;
    let animal_id = engine.add_animal(species, now);

    info!(
        room_id = %engine.room_id(),
        %animal_id,
        %species,
        points_spent = cost,
        balance_after,
        "Animal adopted"
    );

    Ok((
        animal_id,
        PurchaseReceipt {
            points_spent: cost,
            balance_after,
        },
    ))
}

fn check_unlocked(item: &'static str, unlock_day: u32, day: u32) -> Result<(), FarmError> {
    if day < unlock_day {
        return Err(FarmError::Locked {
            item,
            unlock_day,
            current_day: day,
        });
    }
    Ok(())
}
