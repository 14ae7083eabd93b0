//! Static catalog of plants and animals.
//!
//! The catalog is compiled in and read-only. Each entry carries its points
//! cost and the duo day on which it unlocks; plants also carry a nutrition
//! value, the percentage of an animal's maximum health one unit restores.

use serde::Serialize;

use duofarm_types::{Plant, Species};

// ---------------------------------------------------------------------------
// Entry types
// ---------------------------------------------------------------------------

/// A plant catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlantInfo {
    /// The plant this entry describes.
    pub plant: Plant,
    /// Name shown in the shop.
    pub display_name: &'static str,
    /// Image asset name.
    pub asset: &'static str,
    /// Price in points for one unit.
    pub cost: u32,
    /// Percentage (0--100) of maximum health restored per unit.
    pub nutrition_value: u8,
    /// Duo day on which the plant becomes purchasable.
    pub unlock_day: u32,
    /// Shop description.
    pub description: &'static str,
}

/// An animal catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnimalInfo {
    /// The species this entry describes.
    pub species: Species,
    /// Name shown in the shop.
    pub display_name: &'static str,
    /// Image asset name.
    pub asset: &'static str,
    /// Price in points to adopt one individual.
    pub cost: u32,
    /// Duo day on which the species becomes adoptable.
    pub unlock_day: u32,
    /// Shop description.
    pub description: &'static str,
}

// ---------------------------------------------------------------------------
// Plant table
// ---------------------------------------------------------------------------

static WHEAT: PlantInfo = PlantInfo {
    plant: Plant::Wheat,
    display_name: "Wheat",
    asset: "plant_wheat",
    cost: 10,
    nutrition_value: 30,
    unlock_day: 0,
    description: "A humble bundle of wheat. Every farm starts here.",
};

static CARROT: PlantInfo = PlantInfo {
    plant: Plant::Carrot,
    display_name: "Carrot",
    asset: "plant_carrot",
    cost: 15,
    nutrition_value: 40,
    unlock_day: 0,
    description: "Crunchy and sweet. Rabbits will thank you.",
};

static CORN: PlantInfo = PlantInfo {
    plant: Plant::Corn,
    display_name: "Corn",
    asset: "plant_corn",
    cost: 20,
    nutrition_value: 50,
    unlock_day: 3,
    description: "A hearty cob that keeps bellies full for half a day.",
};

static CLOVER: PlantInfo = PlantInfo {
    plant: Plant::Clover,
    display_name: "Clover",
    asset: "plant_clover",
    cost: 25,
    nutrition_value: 60,
    unlock_day: 5,
    description: "Fresh clover from the meadow. Maybe one has four leaves.",
};

static APPLE: PlantInfo = PlantInfo {
    plant: Plant::Apple,
    display_name: "Apple",
    asset: "plant_apple",
    cost: 35,
    nutrition_value: 70,
    unlock_day: 7,
    description: "A shiny red apple, shared between two.",
};

static PUMPKIN: PlantInfo = PlantInfo {
    plant: Plant::Pumpkin,
    display_name: "Pumpkin",
    asset: "plant_pumpkin",
    cost: 50,
    nutrition_value: 85,
    unlock_day: 14,
    description: "Big enough for the whole barn.",
};

static GOLDEN_HAY: PlantInfo = PlantInfo {
    plant: Plant::GoldenHay,
    display_name: "Golden Hay",
    asset: "plant_golden_hay",
    cost: 80,
    nutrition_value: 100,
    unlock_day: 30,
    description: "Restores any animal to full health.",
};

/// Catalog entry for a plant.
pub fn plant_info(plant: Plant) -> &'static PlantInfo {
    match plant {
        Plant::Wheat => &WHEAT,
        Plant::Carrot => &CARROT,
        Plant::Corn => &CORN,
        Plant::Clover => &CLOVER,
        Plant::Apple => &APPLE,
        Plant::Pumpkin => &PUMPKIN,
        Plant::GoldenHay => &GOLDEN_HAY,
    }
}

/// All plant entries in shop order.
pub fn plants() -> impl Iterator<Item = &'static PlantInfo> {
    Plant::ALL.into_iter().map(plant_info)
}

/// Plant entries available on duo day `day`.
pub fn plants_unlocked(day: u32) -> impl Iterator<Item = &'static PlantInfo> {
    plants().filter(move |p| p.unlock_day <= day)
}

// ---------------------------------------------------------------------------
// Animal table
// ---------------------------------------------------------------------------

static CHICKEN: AnimalInfo = AnimalInfo {
    species: Species::Chicken,
    display_name: "Chicken",
    asset: "animal_chicken",
    cost: 50,
    unlock_day: 0,
    description: "Your first farm friend. Clucks when you send a doodle.",
};

static DUCK: AnimalInfo = AnimalInfo {
    species: Species::Duck,
    display_name: "Duck",
    asset: "animal_duck",
    cost: 80,
    unlock_day: 2,
    description: "Waddles over whenever a note arrives.",
};

static RABBIT: AnimalInfo = AnimalInfo {
    species: Species::Rabbit,
    display_name: "Rabbit",
    asset: "animal_rabbit",
    cost: 100,
    unlock_day: 4,
    description: "Soft, quick, and very fond of carrots.",
};

static SHEEP: AnimalInfo = AnimalInfo {
    species: Species::Sheep,
    display_name: "Sheep",
    asset: "animal_sheep",
    cost: 150,
    unlock_day: 7,
    description: "A fluffy companion for your first week together.",
};

static PIG: AnimalInfo = AnimalInfo {
    species: Species::Pig,
    display_name: "Pig",
    asset: "animal_pig",
    cost: 200,
    unlock_day: 10,
    description: "Happiest in the mud, hungriest at dinner.",
};

static GOAT: AnimalInfo = AnimalInfo {
    species: Species::Goat,
    display_name: "Goat",
    asset: "animal_goat",
    cost: 250,
    unlock_day: 14,
    description: "Will try to eat the fence. Feed it first.",
};

static COW: AnimalInfo = AnimalInfo {
    species: Species::Cow,
    display_name: "Cow",
    asset: "animal_cow",
    cost: 400,
    unlock_day: 21,
    description: "Gentle and patient, like a three-week streak.",
};

static HORSE: AnimalInfo = AnimalInfo {
    species: Species::Horse,
    display_name: "Horse",
    asset: "animal_horse",
    cost: 600,
    unlock_day: 30,
    description: "A whole month together earns you a horse.",
};

/// Catalog entry for a species.
pub fn animal_info(species: Species) -> &'static AnimalInfo {
    match species {
        Species::Chicken => &CHICKEN,
        Species::Duck => &DUCK,
        Species::Rabbit => &RABBIT,
        Species::Sheep => &SHEEP,
        Species::Pig => &PIG,
        Species::Goat => &GOAT,
        Species::Cow => &COW,
        Species::Horse => &HORSE,
    }
}

/// All animal entries in shop order.
pub fn animals() -> impl Iterator<Item = &'static AnimalInfo> {
    Species::ALL.into_iter().map(animal_info)
}

/// Animal entries available on duo day `day`.
pub fn animals_unlocked(day: u32) -> impl Iterator<Item = &'static AnimalInfo> {
    animals().filter(move |a| a.unlock_day <= day)
}
