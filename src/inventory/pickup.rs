use bevy::prelude::*;
use serde::Deserialize;

use super::registry::ItemRegistry;
use super::store::Inventory;
use crate::core::GameCommand;

fn default_amount() -> u32 {
    1
}

/// Zone that gives an item on touch and then disappears.
#[derive(Component, Debug, Clone, Deserialize)]
pub struct ItemPickup {
    pub item: String,
    #[serde(default = "default_amount")]
    pub amount: u32,
    #[serde(default)]
    pub sound: Option<String>,
}

impl ItemPickup {
    pub fn new(item: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            amount: 1,
            sound: None,
        }
    }
}

/// Broken prop fixed by spending an item.
#[derive(Component, Debug, Clone, Deserialize)]
pub struct RepairSpot {
    pub required_item: String,
    #[serde(default = "default_amount")]
    pub amount: u32,
    /// Image swapped in once repaired
    #[serde(default)]
    pub repaired_sprite: Option<String>,
    /// Repair on entry instead of on the interact key
    #[serde(default)]
    pub auto_use: bool,
    #[serde(default)]
    pub sound: Option<String>,
    #[serde(default)]
    pub on_repaired: Vec<GameCommand>,
}

impl RepairSpot {
    pub fn new(required_item: impl Into<String>) -> Self {
        Self {
            required_item: required_item.into(),
            amount: 1,
            repaired_sprite: None,
            auto_use: false,
            sound: None,
            on_repaired: Vec::new(),
        }
    }

    /// Spend the required item. Non-consumable items only need to be held.
    pub fn try_repair(&self, inventory: &mut Inventory, registry: &ItemRegistry) -> bool {
        if !inventory.has(&self.required_item, self.amount) {
            return false;
        }
        let consumable = registry.get(&self.required_item).map_or(true, |def| def.consumable);
        if consumable {
            inventory.use_item(&self.required_item, self.amount)
        } else {
            true
        }
    }
}

/// Added once a repair spot has been fixed.
#[derive(Component, Debug)]
pub struct Repaired;

/// Present on repair spots the player is touching.
#[derive(Component, Debug)]
pub struct RepairInRange;
