//! The individual validators.
//!
//! Each one is a plain function over the request context. They assume the validators before them
//! already ran, which is why [`Pipeline`](super::Pipeline) fixes their order.

use super::context::{Lookup, RequestContext};
use crate::error::CommandError;
use crate::model::{DishId, InstanceId, OrderId};
use crate::protocol::CommandKind;
use serde_json::{Map, Value};

/// Fields a command must carry inside `data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Dishes,
    OrderId,
    InstanceId,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Dishes => "dishes",
            Field::OrderId => "order_id",
            Field::InstanceId => "instance_id",
        }
    }

    pub fn required_by(command: CommandKind) -> &'static [Field] {
        match command {
            CommandKind::NewOrder => &[Field::Dishes],
            CommandKind::CancelOrder | CommandKind::ConfirmDelivery => &[Field::OrderId],
            CommandKind::StartPreparation | CommandKind::MarkDishDone | CommandKind::ReturnDish => {
                &[Field::OrderId, Field::InstanceId]
            }
        }
    }
}

fn malformed(message: impl Into<String>) -> CommandError {
    CommandError::MalformedRequest(message.into())
}

fn read_id(data: &Map<String, Value>, field: Field) -> Result<u64, CommandError> {
    let raw = data
        .get(field.name())
        .ok_or_else(|| malformed(format!("missing `{}`", field.name())))?;
    raw.as_u64()
        .ok_or_else(|| {
            malformed(format!(
                "`{}` must be a non-negative integer, got {raw}",
                field.name()
            ))
        })
}

fn read_dishes(data: &Map<String, Value>) -> Result<Vec<DishId>, CommandError> {
    let raw = data
        .get(Field::Dishes.name())
        .and_then(Value::as_array)
        .ok_or_else(|| malformed("`dishes` must be an array"))?;

    raw.iter()
        .map(|entry| {
            entry
                .as_u64()
                .and_then(|id| u32::try_from(id).ok())
                .map(DishId)
                .ok_or_else(|| malformed(format!("`dishes` entry {entry} is not a dish id")))
        })
        .collect()
}

/// Requires a `data` object holding every field the command needs.
pub fn extract_payload(
    ctx: &mut RequestContext<'_>,
    _lookup: &Lookup<'_>,
) -> Result<(), CommandError> {
    let payload = ctx.payload;
    let data = payload
        .get("data")
        .and_then(Value::as_object)
        .ok_or_else(|| malformed("missing `data` object"))?;

    for &field in Field::required_by(ctx.command) {
        match field {
            Field::Dishes => ctx.dishes = Some(read_dishes(data)?),
            Field::OrderId => ctx.order_id = Some(OrderId(read_id(data, field)?)),
            Field::InstanceId => ctx.instance_id = Some(InstanceId(read_id(data, field)?)),
        }
    }
    Ok(())
}

/// Resolves `order_id` against the order table.
pub fn lookup_order<'a>(
    ctx: &mut RequestContext<'a>,
    lookup: &Lookup<'a>,
) -> Result<(), CommandError> {
    let order_id = ctx.order_id.ok_or_else(|| malformed("missing `order_id`"))?;
    let order = lookup
        .orders
        .get(&order_id)
        .ok_or(CommandError::OrderNotFound(order_id))?;
    ctx.order = Some(order);
    Ok(())
}

/// Resolves `instance_id` inside the already-resolved order.
pub fn lookup_instance(
    ctx: &mut RequestContext<'_>,
    _lookup: &Lookup<'_>,
) -> Result<(), CommandError> {
    let instance_id = ctx.instance_id.ok_or_else(|| malformed("missing `instance_id`"))?;
    let order = ctx.order.ok_or_else(|| malformed("order was not resolved"))?;
    let instance = order.dish(instance_id).ok_or_else(|| {
        CommandError::DishNotFound(format!("{instance_id} in {}", order.id))
    })?;
    ctx.instance = Some(instance);
    Ok(())
}

/// Looks up the menu definition of the resolved instance.
pub fn resolve_definition(
    ctx: &mut RequestContext<'_>,
    lookup: &Lookup<'_>,
) -> Result<(), CommandError> {
    let instance = ctx.instance.ok_or_else(|| malformed("dish instance was not resolved"))?;
    let definition = lookup.menu.lookup(instance.dish_id).ok_or_else(|| {
        CommandError::DishNotFound(format!("{} is not on the menu", instance.dish_id))
    })?;
    ctx.definition = Some(definition);
    Ok(())
}

/// Only the station that cooks a dish may advance it.
pub fn authorize_station(
    ctx: &mut RequestContext<'_>,
    _lookup: &Lookup<'_>,
) -> Result<(), CommandError> {
    let definition = ctx
        .definition
        .as_ref()
        .ok_or_else(|| malformed("dish definition was not resolved"))?;

    match ctx.origin.role.station_name() {
        Some(station) if station == definition.station => Ok(()),
        _ => Err(CommandError::StationNotAuthorized {
            role: ctx.origin.role.to_string(),
            station: definition.station.clone(),
        }),
    }
}
