//! Kitchen configuration.
//!
//! A config file is JSON. It is either a full object,
//!
//! ```json
//! {
//!   "channel_capacity": 64,
//!   "menu": [
//!     { "id": 7, "name": "Burger", "station": "grill", "estimated_preparation_time": 10 }
//!   ]
//! }
//! ```
//!
//! or just the menu array, which is how menu files have always been written.

use crate::model::{DishDefinition, InMemoryMenu};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

fn default_channel_capacity() -> usize {
    32
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KitchenConfig {
    pub menu: Vec<DishDefinition>,
    /// Bound of the kitchen actor's request queue.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ConfigFile {
    Full(KitchenConfig),
    MenuOnly(Vec<DishDefinition>),
}

impl Default for KitchenConfig {
    fn default() -> Self {
        Self {
            menu: vec![
                DishDefinition::new(1u32, "Caesar Salad", "cold", 4),
                DishDefinition::new(2u32, "Chicken Skewer", "grill", 8),
                DishDefinition::new(3u32, "Fries", "fry", 5),
                DishDefinition::new(4u32, "Onion Rings", "fry", 5),
                DishDefinition::new(7u32, "Burger", "grill", 10),
                DishDefinition::new(9u32, "Ribeye", "grill", 18),
            ],
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl KitchenConfig {
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config = match serde_json::from_str::<ConfigFile>(content)? {
            ConfigFile::Full(config) => config,
            ConfigFile::MenuOnly(menu) => KitchenConfig {
                menu,
                channel_capacity: default_channel_capacity(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_capacity == 0 {
            return Err(ConfigError::Invalid("channel_capacity must be > 0".to_string()));
        }
        if self.menu.is_empty() {
            return Err(ConfigError::Invalid("menu must not be empty".to_string()));
        }

        let mut seen = HashSet::new();
        for dish in &self.menu {
            if !seen.insert(dish.id) {
                return Err(ConfigError::Invalid(format!("menu[{}] is defined twice", dish.id.0)));
            }
            if dish.name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "menu[{}].name must not be empty",
                    dish.id.0
                )));
            }
            if dish.station.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "menu[{}].station must not be empty",
                    dish.id.0
                )));
            }
        }
        Ok(())
    }

    pub fn build_menu(&self) -> InMemoryMenu {
        InMemoryMenu::new(self.menu.iter().cloned())
    }
}

/// Reads and validates a config file.
pub fn load_config(path: &Path) -> Result<KitchenConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config = KitchenConfig::from_json(&content)?;
    info!(path = %path.display(), dishes = config.menu.len(), "Config loaded");
    Ok(config)
}
