//! Dish instances and their state machine.
//!
//! Transitions:
//! - `WAITING → IN_PROGRESS → DONE → DELIVERED`
//! - `DELIVERED → RETURNED → IN_PROGRESS` (a returned dish is cooked again)
//! - `WAITING | IN_PROGRESS | RETURNED → CANCELED` (order cancellation)
//!
//! The machine is a plain transition table over two enums; see [`DishState::next`].

use crate::error::CommandError;
use crate::model::{DishId, InstanceId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Lifecycle state of a single dish instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DishState {
    Waiting,
    InProgress,
    Done,
    Delivered,
    /// Sent back by the table. Queued again like `Waiting`, tracked apart for ranking.
    Returned,
    Canceled,
}

/// Events that drive [`DishState`] transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DishEvent {
    StartPreparation,
    Finish,
    Deliver,
    ReturnDish,
    Cancel,
}

impl DishState {
    /// The transition table. `None` means the event is rejected in this state.
    pub fn next(self, event: DishEvent) -> Option<DishState> {
        use DishEvent::*;
        use DishState::*;

        match (self, event) {
            (Waiting | Returned, StartPreparation) => Some(InProgress),
            (InProgress, Finish) => Some(Done),
            (Done, Deliver) => Some(Delivered),
            (Delivered, ReturnDish) => Some(Returned),
            (Waiting | InProgress | Returned, Cancel) => Some(Canceled),
            _ => None,
        }
    }

    /// Dish sits in a station queue waiting for a cook.
    pub fn awaits_preparation(self) -> bool {
        matches!(self, DishState::Waiting | DishState::Returned)
    }

    /// Dish no longer counts toward the order being ready.
    pub fn is_settled(self) -> bool {
        matches!(self, DishState::Canceled | DishState::Delivered)
    }
}

impl Display for DishState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DishState::Waiting => "WAITING",
            DishState::InProgress => "IN_PROGRESS",
            DishState::Done => "DONE",
            DishState::Delivered => "DELIVERED",
            DishState::Returned => "RETURNED",
            DishState::Canceled => "CANCELED",
        };
        f.write_str(name)
    }
}

impl Display for DishEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DishEvent::StartPreparation => "start_preparation",
            DishEvent::Finish => "finish",
            DishEvent::Deliver => "deliver",
            DishEvent::ReturnDish => "return_dish",
            DishEvent::Cancel => "cancel",
        };
        f.write_str(name)
    }
}

/// One concrete preparation unit of a menu dish within an order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DishInstance {
    pub instance_id: InstanceId,
    pub dish_id: DishId,
    pub created_at: DateTime<Utc>,
    pub last_changed_at: DateTime<Utc>,
    pub state: DishState,
}

impl DishInstance {
    /// Creates a new instance in `WAITING`.
    pub fn new(instance_id: InstanceId, dish_id: DishId) -> Self {
        let now = Utc::now();
        Self {
            instance_id,
            dish_id,
            created_at: now,
            last_changed_at: now,
            state: DishState::Waiting,
        }
    }

    /// Whether `event` would be accepted, without applying it.
    pub fn accepts(&self, event: DishEvent) -> bool {
        self.state.next(event).is_some()
    }

    /// Applies `event`, returning the new state. The dish is untouched on rejection.
    pub fn apply(&mut self, event: DishEvent) -> Result<DishState, CommandError> {
        let next = self.state.next(event).ok_or_else(|| {
            CommandError::InvalidTransition(format!(
                "{} cannot {} while {}",
                self.instance_id, event, self.state
            ))
        })?;
        self.state = next;
        self.last_changed_at = Utc::now();
        Ok(next)
    }
}
