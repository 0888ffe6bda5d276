//! Inventory module - item counts, item definitions, pickups and repairs.

mod pickup;
mod plugin;
mod registry;
mod store;

pub use pickup::{ItemPickup, RepairInRange, RepairSpot, Repaired};
pub use plugin::{InventoryPlugin, ItemHud};
pub use registry::{load_item_file, ItemDefinition, ItemFile, ItemRegistry, ITEMS_PATH};
pub use store::Inventory;
