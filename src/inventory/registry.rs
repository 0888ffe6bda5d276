//! Item definitions loaded from RON.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::core::{read_ron, DataLoadError};

pub const ITEMS_PATH: &str = "assets/data/items.ron";

fn default_consumable() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ItemDefinition {
    pub id: String,
    pub display_name: String,
    /// Image path under assets/
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default = "default_consumable")]
    pub consumable: bool,
}

/// Root of assets/data/items.ron.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemFile {
    pub items: Vec<ItemDefinition>,
}

#[derive(Resource, Debug, Default)]
pub struct ItemRegistry {
    items: HashMap<String, ItemDefinition>,
}

impl ItemRegistry {
    /// Build from definitions. A repeated id keeps the first and is logged.
    pub fn new(definitions: impl IntoIterator<Item = ItemDefinition>) -> Self {
        let mut items = HashMap::new();
        for def in definitions {
            if items.contains_key(&def.id) {
                warn!("Duplicate item id '{}', skipping", def.id);
                continue;
            }
            items.insert(def.id.clone(), def);
        }
        Self { items }
    }

    pub fn get(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.get(id)
    }

    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).map_or(id, |def| def.display_name.as_str())
    }

    /// Definitions ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &ItemDefinition> {
        let mut defs: Vec<&ItemDefinition> = self.items.values().collect();
        defs.sort_by(|a, b| a.id.cmp(&b.id));
        defs.into_iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub fn load_item_file(path: &Path) -> Result<ItemFile, DataLoadError> {
    match read_ron::<ItemFile>(path) {
        Ok(file) => Ok(file),
        Err(DataLoadError::FileNotFound(p)) => {
            warn!("Item file not found: {}", p);
            Ok(ItemFile::default())
        }
        Err(e) => Err(e),
    }
}

pub fn load_item_registry(mut registry: ResMut<ItemRegistry>) {
    if !registry.is_empty() {
        return;
    }
    match load_item_file(Path::new(ITEMS_PATH)) {
        Ok(file) => {
            *registry = ItemRegistry::new(file.items);
            info!("Loaded {} item definitions", registry.len());
        }
        Err(e) => error!("{}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_items_and_skip_duplicates() {
        let file: ItemFile = ron::from_str(
            r#"(
                items: [
                    (id: "wood", display_name: "Madera", icon: Some("sprites/items/wood.png")),
                    (id: "key", display_name: "Llave", consumable: false),
                    (id: "wood", display_name: "Otra madera"),
                ],
            )"#,
        )
        .unwrap();
        let registry = ItemRegistry::new(file.items);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.display_name("wood"), "Madera");
        assert!(registry.get("wood").is_some_and(|def| def.consumable));
        assert!(registry.get("key").is_some_and(|def| !def.consumable));
        assert_eq!(registry.display_name("rope"), "rope");
    }
}
