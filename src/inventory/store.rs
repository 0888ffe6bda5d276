use bevy::prelude::*;
use std::collections::HashMap;

/// Item counts by id. Entries disappear when they reach zero.
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct Inventory {
    items: HashMap<String, u32>,
}

impl Inventory {
    /// Add `amount` of `id` and return the new count.
    pub fn add(&mut self, id: &str, amount: u32) -> u32 {
        let count = self.items.entry(id.to_string()).or_insert(0);
        *count = count.saturating_add(amount);
        *count
    }

    pub fn has(&self, id: &str, required: u32) -> bool {
        self.items.get(id).is_some_and(|&count| count >= required)
    }

    /// Consume `amount` of `id`. Fails without changing anything when there
    /// are not enough.
    pub fn use_item(&mut self, id: &str, amount: u32) -> bool {
        if !self.has(id, amount) {
            return false;
        }
        let Some(count) = self.items.get_mut(id) else {
            return false;
        };
        *count -= amount;
        if *count == 0 {
            self.items.remove(id);
        }
        true
    }

    pub fn count(&self, id: &str) -> u32 {
        self.items.get(id).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
