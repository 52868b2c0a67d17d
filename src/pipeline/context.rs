//! State threaded through the validator chain.

use crate::error::CommandError;
use crate::model::{
    ActorRole, ConnectionId, DishDefinition, DishId, DishInstance, InstanceId, MenuCatalog, Order,
    OrderId,
};
use crate::protocol::CommandKind;
use serde_json::Value;
use std::collections::HashMap;

/// Who sent the command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub connection_id: ConnectionId,
    pub role: ActorRole,
}

/// Read-only view of kitchen state that validators resolve against.
pub struct Lookup<'a> {
    pub orders: &'a HashMap<OrderId, Order>,
    pub menu: &'a dyn MenuCatalog,
}

/// Mutable request context. Each validator fills in what it resolved.
#[derive(Debug)]
pub struct RequestContext<'a> {
    pub command: CommandKind,
    pub payload: &'a Value,
    pub origin: &'a Origin,
    pub dishes: Option<Vec<DishId>>,
    pub order_id: Option<OrderId>,
    pub instance_id: Option<InstanceId>,
    pub order: Option<&'a Order>,
    pub instance: Option<&'a DishInstance>,
    pub definition: Option<DishDefinition>,
}

impl<'a> RequestContext<'a> {
    pub fn new(command: CommandKind, payload: &'a Value, origin: &'a Origin) -> Self {
        Self {
            command,
            payload,
            origin,
            dishes: None,
            order_id: None,
            instance_id: None,
            order: None,
            instance: None,
            definition: None,
        }
    }

    /// Drops the borrows of kitchen state, keeping what the operation needs to mutate it.
    pub fn into_resolved(self) -> Resolved {
        Resolved {
            dishes: self.dishes,
            order_id: self.order.map(|o| o.id),
            instance_id: self.instance.map(|d| d.instance_id),
            definition: self.definition,
        }
    }
}

/// Owned outcome of a successful pipeline run.
///
/// Accessors fail with `MalformedRequest` when asked for something the command's pipeline does
/// not resolve, which would be a wiring mistake rather than a client error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolved {
    dishes: Option<Vec<DishId>>,
    order_id: Option<OrderId>,
    instance_id: Option<InstanceId>,
    definition: Option<DishDefinition>,
}

impl Resolved {
    pub fn dishes(&self) -> Result<&[DishId], CommandError> {
        self.dishes.as_deref().ok_or_else(|| unresolved("dishes"))
    }

    pub fn order_id(&self) -> Result<OrderId, CommandError> {
        self.order_id.ok_or_else(|| unresolved("order"))
    }

    pub fn instance_id(&self) -> Result<InstanceId, CommandError> {
        self.instance_id.ok_or_else(|| unresolved("dish instance"))
    }

    pub fn definition(&self) -> Result<&DishDefinition, CommandError> {
        self.definition.as_ref().ok_or_else(|| unresolved("dish definition"))
    }
}

fn unresolved(what: &str) -> CommandError {
    CommandError::MalformedRequest(format!("{what} was not resolved"))
}
