//! # Ranking Aggregator
//!
//! Popularity leaderboard. A dish scores when it is delivered and loses the point again if the
//! table sends it back, so the count is always deliveries minus returns and never negative.

use crate::model::{DishId, MenuCatalog};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// One leaderboard line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Default)]
pub struct RankingBoard {
    counts: HashMap<DishId, u32>,
}

impl RankingBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, dish_id: DishId) {
        let count = self.counts.entry(dish_id).or_insert(0);
        *count += 1;
        debug!(%dish_id, count = *count, "Ranking incremented");
    }

    /// Takes one point away, stopping at zero.
    pub fn decrement(&mut self, dish_id: DishId) {
        if let Some(count) = self.counts.get_mut(&dish_id) {
            *count = count.saturating_sub(1);
            debug!(%dish_id, count = *count, "Ranking decremented");
        }
    }

    pub fn count(&self, dish_id: DishId) -> u32 {
        self.counts.get(&dish_id).copied().unwrap_or(0)
    }

    /// Leaderboard sorted by count descending, then dish id ascending.
    ///
    /// Names come from `menu` at call time. Dishes no longer on the menu are left out.
    pub fn snapshot(&self, menu: &dyn MenuCatalog) -> Vec<RankingEntry> {
        let mut scored: Vec<(DishId, u32)> = self.counts.iter().map(|(&id, &c)| (id, c)).collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        scored
            .into_iter()
            .filter_map(|(dish_id, count)| {
                menu.lookup(dish_id).map(|definition| RankingEntry {
                    name: definition.name,
                    count,
                })
            })
            .collect()
    }
}
