//! Menu catalog.
//!
//! The kitchen never owns dish definitions. It reads them through [`MenuCatalog`] every time it
//! needs a name, a station or an estimated time, so edits to the catalog are visible immediately.

use crate::model::DishId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

/// A menu entry: what the dish is called, where it is cooked and roughly how long it takes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DishDefinition {
    pub id: DishId,
    pub name: String,
    /// Kitchen station that prepares this dish (e.g. `grill`, `fry`).
    pub station: String,
    /// Estimated preparation time in minutes. Drives station queue priority.
    pub estimated_preparation_time: u32,
}

impl DishDefinition {
    pub fn new(
        id: impl Into<DishId>,
        name: impl Into<String>,
        station: impl Into<String>,
        estimated_preparation_time: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            station: station.into(),
            estimated_preparation_time,
        }
    }
}

/// Read-only view of the menu used by the kitchen.
pub trait MenuCatalog: Send + Sync {
    /// Looks up a single definition. `None` means the dish is not on the menu.
    fn lookup(&self, id: DishId) -> Option<DishDefinition>;

    /// Every definition on the menu, sorted by id.
    fn list(&self) -> Vec<DishDefinition>;
}

/// Menu held in memory, seeded from configuration.
#[derive(Debug, Default)]
pub struct InMemoryMenu {
    dishes: RwLock<HashMap<DishId, DishDefinition>>,
}

impl InMemoryMenu {
    pub fn new(definitions: impl IntoIterator<Item = DishDefinition>) -> Self {
        let dishes = definitions.into_iter().map(|d| (d.id, d)).collect();
        Self {
            dishes: RwLock::new(dishes),
        }
    }

    /// Inserts or replaces a definition.
    pub fn upsert(&self, definition: DishDefinition) {
        debug!(dish_id = %definition.id, name = %definition.name, "Menu entry updated");
        self.dishes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(definition.id, definition);
    }

    /// Removes a definition, returning it if it existed.
    pub fn remove(&self, id: DishId) -> Option<DishDefinition> {
        self.dishes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
    }

    pub fn len(&self) -> usize {
        self.dishes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MenuCatalog for InMemoryMenu {
    fn lookup(&self, id: DishId) -> Option<DishDefinition> {
        self.dishes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    fn list(&self) -> Vec<DishDefinition> {
        let mut all: Vec<_> = self
            .dishes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        all.sort_by_key(|d| d.id);
        all
    }
}
