//! A table's order and the dishes it asked for.
//!
//! Every mutator here validates before it writes, so a rejected call leaves the order exactly as it
//! was. Locking and notifications are the kitchen's job, not the order's.

use crate::error::CommandError;
use crate::model::{
    DishDefinition, DishEvent, DishId, DishInstance, DishState, InstanceId, MenuCatalog, OrderId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::warn;

/// Overall state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderState {
    Pending,
    InProgress,
    Ready,
    Delivered,
    Canceled,
}

impl Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OrderState::Pending => "PENDING",
            OrderState::InProgress => "IN_PROGRESS",
            OrderState::Ready => "READY",
            OrderState::Delivered => "DELIVERED",
            OrderState::Canceled => "CANCELED",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub state: OrderState,
    /// In the order the dishes were requested.
    pub dishes: Vec<DishInstance>,
    pub created_at: DateTime<Utc>,
}

/// Splits requested dish ids into known definitions and unknown ids.
///
/// Unknown ids are logged and skipped; they never fail the request on their own.
pub fn resolve_dishes(
    requested: &[DishId],
    menu: &dyn MenuCatalog,
) -> (Vec<DishDefinition>, Vec<DishId>) {
    let mut resolved = Vec::with_capacity(requested.len());
    let mut unknown = Vec::new();
    for &dish_id in requested {
        match menu.lookup(dish_id) {
            Some(definition) => resolved.push(definition),
            None => {
                warn!(%dish_id, "Unknown dish requested, skipping");
                unknown.push(dish_id);
            }
        }
    }
    (resolved, unknown)
}

impl Order {
    /// Builds a `PENDING` order with one `WAITING` instance per definition.
    pub fn create(
        id: OrderId,
        definitions: &[DishDefinition],
        mut next_instance_id: impl FnMut() -> InstanceId,
    ) -> Self {
        let dishes = definitions
            .iter()
            .map(|definition| DishInstance::new(next_instance_id(), definition.id))
            .collect();
        Self {
            id,
            state: OrderState::Pending,
            dishes,
            created_at: Utc::now(),
        }
    }

    pub fn dish(&self, instance_id: InstanceId) -> Option<&DishInstance> {
        self.dishes.iter().find(|d| d.instance_id == instance_id)
    }

    fn dish_mut(&mut self, instance_id: InstanceId) -> Result<&mut DishInstance, CommandError> {
        let order_id = self.id;
        self.dishes
            .iter_mut()
            .find(|d| d.instance_id == instance_id)
            .ok_or_else(|| CommandError::DishNotFound(format!("{instance_id} in {order_id}")))
    }

    /// Readiness rule: something is owed to the table and all of it is `DONE`.
    ///
    /// Canceled dishes are never owed. Delivered dishes were already served, which matters once a
    /// dish has been returned and cooked again.
    pub fn all_dishes_done(&self) -> bool {
        let mut owed = self.dishes.iter().filter(|d| !d.state.is_settled()).peekable();
        owed.peek().is_some() && owed.all(|d| d.state == DishState::Done)
    }

    /// Promotes an active order to `READY` when the readiness rule holds.
    ///
    /// Returns whether the order is `READY` afterwards. Other states are left alone.
    pub fn recompute_state(&mut self) -> bool {
        if matches!(self.state, OrderState::Pending | OrderState::InProgress)
            && self.all_dishes_done()
        {
            self.state = OrderState::Ready;
        }
        self.state == OrderState::Ready
    }

    /// Applies a dish-level event to one instance of this order.
    pub fn transition_dish(
        &mut self,
        instance_id: InstanceId,
        event: DishEvent,
    ) -> Result<DishState, CommandError> {
        self.dish_mut(instance_id)?.apply(event)
    }

    /// A cook picked up `instance_id`.
    pub fn start_dish(&mut self, instance_id: InstanceId) -> Result<(), CommandError> {
        self.transition_dish(instance_id, DishEvent::StartPreparation)?;
        if self.state == OrderState::Pending {
            self.state = OrderState::InProgress;
        }
        Ok(())
    }

    /// A cook finished `instance_id`. Returns whether the whole order is now ready.
    pub fn finish_dish(&mut self, instance_id: InstanceId) -> Result<bool, CommandError> {
        self.transition_dish(instance_id, DishEvent::Finish)?;
        Ok(self.recompute_state())
    }

    /// Cancels the order and every dish still in the kitchen.
    ///
    /// Done and delivered dishes keep their state. Returns the instances that were canceled.
    pub fn cancel(&mut self) -> Result<Vec<InstanceId>, CommandError> {
        if !matches!(self.state, OrderState::Pending | OrderState::InProgress) {
            return Err(CommandError::InvalidTransition(format!(
                "{} cannot be canceled while {}",
                self.id, self.state
            )));
        }

        let mut canceled = Vec::new();
        for dish in self.dishes.iter_mut().filter(|d| d.accepts(DishEvent::Cancel)) {
            dish.apply(DishEvent::Cancel)?;
            canceled.push(dish.instance_id);
        }
        self.state = OrderState::Canceled;
        Ok(canceled)
    }

    /// Hands a `READY` order to the table. Returns the menu id of every dish served now.
    pub fn deliver(&mut self) -> Result<Vec<DishId>, CommandError> {
        if self.state != OrderState::Ready {
            return Err(CommandError::InvalidTransition(format!(
                "{} cannot be delivered while {}",
                self.id, self.state
            )));
        }

        let mut served = Vec::new();
        for dish in self.dishes.iter_mut().filter(|d| d.state == DishState::Done) {
            dish.apply(DishEvent::Deliver)?;
            served.push(dish.dish_id);
        }
        self.state = OrderState::Delivered;
        Ok(served)
    }

    /// The table sent `instance_id` back. The order returns to `IN_PROGRESS`.
    pub fn return_dish(&mut self, instance_id: InstanceId) -> Result<DishId, CommandError> {
        if self.state == OrderState::Canceled {
            return Err(CommandError::InvalidTransition(format!(
                "{} is canceled, nothing can be returned",
                self.id
            )));
        }

        let dish = self.dish_mut(instance_id)?;
        dish.apply(DishEvent::ReturnDish)?;
        let dish_id = dish.dish_id;
        self.state = OrderState::InProgress;
        Ok(dish_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InMemoryMenu;

    fn menu() -> InMemoryMenu {
        InMemoryMenu::new([
            DishDefinition::new(7, "Steak", "grill", 10),
            DishDefinition::new(3, "Fries", "fry", 5),
        ])
    }

    fn order_of(ids: &[u32]) -> Order {
        let requested: Vec<DishId> = ids.iter().copied().map(DishId).collect();
        let (definitions, _) = resolve_dishes(&requested, &menu());
        let mut next = 0;
        Order::create(OrderId(1), &definitions, || {
            next += 1;
            InstanceId(next)
        })
    }

    fn cook(order: &mut Order, instance: u64) -> bool {
        order.start_dish(InstanceId(instance)).unwrap();
        order.finish_dish(InstanceId(instance)).unwrap()
    }

    #[test]
    fn test_resolve_skips_unknown_ids() {
        let (resolved, unknown) = resolve_dishes(&[DishId(7), DishId(42), DishId(3)], &menu());
        let ids: Vec<_> = resolved.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![DishId(7), DishId(3)]);
        assert_eq!(unknown, vec![DishId(42)]);
    }

    #[test]
    fn test_create_keeps_request_order() {
        let order = order_of(&[7, 7, 3]);
        assert_eq!(order.state, OrderState::Pending);
        let dishes: Vec<_> = order.dishes.iter().map(|d| (d.instance_id.0, d.dish_id.0)).collect();
        assert_eq!(dishes, vec![(1, 7), (2, 7), (3, 3)]);
        assert!(order.dishes.iter().all(|d| d.state == DishState::Waiting));
    }

    #[test]
    fn test_ready_only_when_every_dish_done() {
        let mut order = order_of(&[7, 3]);
        order.start_dish(InstanceId(1)).unwrap();
        assert_eq!(order.state, OrderState::InProgress);

        assert!(!order.finish_dish(InstanceId(1)).unwrap());
        assert_eq!(order.state, OrderState::InProgress);

        assert!(cook(&mut order, 2));
        assert_eq!(order.state, OrderState::Ready);
    }

    #[test]
    fn test_deliver_requires_ready_and_leaves_state_on_failure() {
        let mut order = order_of(&[7]);
        let before = order.clone();
        assert!(matches!(order.deliver(), Err(CommandError::InvalidTransition(_))));
        assert_eq!(order, before);

        cook(&mut order, 1);
        assert_eq!(order.deliver().unwrap(), vec![DishId(7)]);
        assert_eq!(order.state, OrderState::Delivered);
        assert_eq!(order.dishes[0].state, DishState::Delivered);
    }

    #[test]
    fn test_return_reopens_order_and_allows_redelivery() {
        let mut order = order_of(&[7, 3]);
        cook(&mut order, 1);
        cook(&mut order, 2);
        order.deliver().unwrap();

        assert_eq!(order.return_dish(InstanceId(2)).unwrap(), DishId(3));
        assert_eq!(order.state, OrderState::InProgress);
        assert_eq!(order.dish(InstanceId(2)).unwrap().state, DishState::Returned);
        assert!(!order.all_dishes_done());

        assert!(cook(&mut order, 2));
        assert_eq!(order.deliver().unwrap(), vec![DishId(3)]);
    }

    #[test]
    fn test_return_rejects_undelivered_dish() {
        let mut order = order_of(&[7]);
        let before = order.clone();
        let err = order.return_dish(InstanceId(1)).unwrap_err();
        assert!(matches!(err, CommandError::InvalidTransition(_)));
        assert_eq!(order, before);
    }

    #[test]
    fn test_cancel_spares_delivered_dishes() {
        let mut order = order_of(&[7, 3, 3]);
        cook(&mut order, 1);
        cook(&mut order, 2);
        cook(&mut order, 3);
        order.deliver().unwrap();
        order.return_dish(InstanceId(1)).unwrap();

        let canceled = order.cancel().unwrap();
        assert_eq!(canceled, vec![InstanceId(1)]);
        assert_eq!(order.state, OrderState::Canceled);
        assert_eq!(order.dish(InstanceId(2)).unwrap().state, DishState::Delivered);
        assert!(order.cancel().is_err());
    }

    #[test]
    fn test_cancel_leaves_done_dishes_done() {
        let mut order = order_of(&[7, 3]);
        cook(&mut order, 1);

        let canceled = order.cancel().unwrap();
        assert_eq!(canceled, vec![InstanceId(2)]);
        assert_eq!(order.dish(InstanceId(1)).unwrap().state, DishState::Done);
        assert_eq!(order.dish(InstanceId(2)).unwrap().state, DishState::Canceled);
    }

    #[test]
    fn test_missing_instance_is_dish_not_found() {
        let mut order = order_of(&[7]);
        let err = order.start_dish(InstanceId(99)).unwrap_err();
        assert!(matches!(err, CommandError::DishNotFound(_)));
    }
}
