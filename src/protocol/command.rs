//! Inbound commands.
//!
//! A command is kept as the raw JSON the transport decoded, `{"command": "<kind>", "data": {...}}`.
//! Field-level validation happens later, in the pipeline, so the transport only has to find the
//! kind.

use crate::error::CommandError;
use crate::model::{DishId, InstanceId, OrderId};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt::Display;

/// The six mutating operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    NewOrder,
    StartPreparation,
    CancelOrder,
    MarkDishDone,
    ConfirmDelivery,
    ReturnDish,
}

impl Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CommandKind::NewOrder => "new_order",
            CommandKind::StartPreparation => "start_preparation",
            CommandKind::CancelOrder => "cancel_order",
            CommandKind::MarkDishDone => "mark_dish_done",
            CommandKind::ConfirmDelivery => "confirm_delivery",
            CommandKind::ReturnDish => "return_dish",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub kind: CommandKind,
    pub payload: Value,
}

impl Command {
    pub const KIND_FIELD: &'static str = "command";
    pub const DATA_FIELD: &'static str = "data";

    /// Reads the command kind out of a decoded message. The rest is validated by the pipeline.
    pub fn from_json(payload: Value) -> Result<Self, CommandError> {
        let kind = payload
            .get(Self::KIND_FIELD)
            .cloned()
            .ok_or_else(|| CommandError::MalformedRequest("missing `command`".into()))
            .and_then(|raw| {
                serde_json::from_value::<CommandKind>(raw)
                    .map_err(|e| CommandError::MalformedRequest(format!("unknown `command`: {e}")))
            })?;
        Ok(Self { kind, payload })
    }

    fn with_data(kind: CommandKind, data: Value) -> Self {
        let payload = json!({ "command": kind, "data": data });
        Self { kind, payload }
    }

    pub fn new_order(dishes: &[DishId]) -> Self {
        Self::with_data(CommandKind::NewOrder, json!({ "dishes": dishes }))
    }

    pub fn start_preparation(order_id: OrderId, instance_id: InstanceId) -> Self {
        Self::with_data(
            CommandKind::StartPreparation,
            json!({ "order_id": order_id, "instance_id": instance_id }),
        )
    }

    pub fn cancel_order(order_id: OrderId) -> Self {
        Self::with_data(CommandKind::CancelOrder, json!({ "order_id": order_id }))
    }

    pub fn mark_dish_done(order_id: OrderId, instance_id: InstanceId) -> Self {
        Self::with_data(
            CommandKind::MarkDishDone,
            json!({ "order_id": order_id, "instance_id": instance_id }),
        )
    }

    pub fn confirm_delivery(order_id: OrderId) -> Self {
        Self::with_data(CommandKind::ConfirmDelivery, json!({ "order_id": order_id }))
    }

    pub fn return_dish(order_id: OrderId, instance_id: InstanceId) -> Self {
        Self::with_data(
            CommandKind::ReturnDish,
            json!({ "order_id": order_id, "instance_id": instance_id }),
        )
    }
}
