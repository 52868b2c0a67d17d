//! Outbound events.
//!
//! Wire shape is `{"event": "<kind>", "data": {...}}`. Kind tags and field names are part of the
//! client contract and must not change.

use crate::error::CommandError;
use crate::model::{DishDefinition, InstanceId, OrderId};
use crate::protocol::CommandKind;
use crate::ranking::RankingEntry;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum Event {
    OrderRegistered {
        order_id: OrderId,
    },
    DishInPreparation {
        order_id: OrderId,
        instance_id: InstanceId,
    },
    DishDone {
        order_id: OrderId,
        instance_id: InstanceId,
        order_ready: bool,
    },
    OrderDelivered {
        order_id: OrderId,
    },
    DishReturned {
        order_id: OrderId,
        instance_id: InstanceId,
        station: String,
    },
    OrderCanceled {
        order_id: OrderId,
    },
    RankingUpdated {
        ranking: Vec<RankingEntry>,
    },
    MenuUpdated {
        menu: Vec<DishDefinition>,
    },
    /// Sent only to the connection whose command was refused.
    RequestFailed {
        command: CommandKind,
        error: String,
        message: String,
    },
}

impl Event {
    pub fn request_failed(command: CommandKind, error: &CommandError) -> Self {
        Event::RequestFailed {
            command,
            error: error.code().to_string(),
            message: error.to_string(),
        }
    }

    /// The wire tag, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::OrderRegistered { .. } => "order_registered",
            Event::DishInPreparation { .. } => "dish_in_preparation",
            Event::DishDone { .. } => "dish_done",
            Event::OrderDelivered { .. } => "order_delivered",
            Event::DishReturned { .. } => "dish_returned",
            Event::OrderCanceled { .. } => "order_canceled",
            Event::RankingUpdated { .. } => "ranking_updated",
            Event::MenuUpdated { .. } => "menu_updated",
            Event::RequestFailed { .. } => "request_failed",
        }
    }
}
