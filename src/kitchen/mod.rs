//! The kitchen core.
//!
//! [`Kitchen`] owns every order, the station queues, the ranking board, the chef review queue and
//! the set of live connections. It is plain synchronous state: whoever owns it is the mutual
//! exclusion domain. In this crate that is the [`KitchenActor`](crate::runtime::KitchenActor) task.
//!
//! Mutating operations never talk to connections directly. They return [`Notification`]s and the
//! owner hands them to [`Kitchen::dispatch`] once the operation has finished.

pub mod connections;

pub use connections::{Connection, ConnectionRegistry, Notification};

use crate::error::CommandError;
use crate::model::{
    resolve_dishes, ActorRole, ConnectionId, DishDefinition, InstanceId, MenuCatalog, Order,
    OrderId,
};
use crate::pipeline::{Lookup, Origin, Pipeline, RequestContext, Resolved};
use crate::protocol::{Command, CommandKind, Event};
use crate::ranking::{RankingBoard, RankingEntry};
use crate::scheduler::{StationScheduler, WorkItem};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

/// Outcome of a command that passed validation and was applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Executed {
    /// The order the command created or acted on.
    pub order_id: OrderId,
    pub notifications: Vec<Notification>,
}

pub struct Kitchen {
    menu: Arc<dyn MenuCatalog>,
    orders: HashMap<OrderId, Order>,
    scheduler: StationScheduler,
    ranking: RankingBoard,
    review_queue: VecDeque<OrderId>,
    connections: ConnectionRegistry,
    next_order_id: u64,
    next_instance_id: u64,
}

fn order_mut(
    orders: &mut HashMap<OrderId, Order>,
    id: OrderId,
) -> Result<&mut Order, CommandError> {
    orders.get_mut(&id).ok_or(CommandError::OrderNotFound(id))
}

impl Kitchen {
    pub fn new(menu: Arc<dyn MenuCatalog>) -> Self {
        Self {
            menu,
            orders: HashMap::new(),
            scheduler: StationScheduler::new(),
            ranking: RankingBoard::new(),
            review_queue: VecDeque::new(),
            connections: ConnectionRegistry::new(),
            next_order_id: 0,
            next_instance_id: 0,
        }
    }

    pub fn connections(&self) -> &ConnectionRegistry {
        &self.connections
    }

    /// Validates `command` from connection `from` and applies it.
    ///
    /// On error nothing has changed and the caller should tell `from`, and only `from`.
    pub fn execute(
        &mut self,
        from: ConnectionId,
        command: &Command,
    ) -> Result<Executed, CommandError> {
        let origin = self
            .connections
            .origin(from)
            .ok_or_else(|| CommandError::MalformedRequest(format!("{from} is not registered")))?;

        let resolved = {
            let lookup = Lookup {
                orders: &self.orders,
                menu: self.menu.as_ref(),
            };
            let ctx = RequestContext::new(command.kind, &command.payload, &origin);
            Pipeline::for_command(command.kind).run(ctx, &lookup)?
        };

        match command.kind {
            CommandKind::NewOrder => self.new_order(&origin, &resolved),
            CommandKind::StartPreparation => self.start_preparation(&resolved),
            CommandKind::CancelOrder => self.cancel_order(&resolved),
            CommandKind::MarkDishDone => self.mark_dish_done(&resolved),
            CommandKind::ConfirmDelivery => self.confirm_delivery(&resolved),
            CommandKind::ReturnDish => self.return_dish(&resolved),
        }
    }

    fn new_order(
        &mut self,
        origin: &Origin,
        resolved: &Resolved,
    ) -> Result<Executed, CommandError> {
        let (definitions, unknown) = resolve_dishes(resolved.dishes()?, self.menu.as_ref());
        if definitions.is_empty() {
            return Err(CommandError::MalformedRequest(
                "order contains no dish that is on the menu".into(),
            ));
        }

        self.next_order_id += 1;
        let order_id = OrderId(self.next_order_id);
        let next_instance_id = &mut self.next_instance_id;
        let order = Order::create(order_id, &definitions, || {
            *next_instance_id += 1;
            InstanceId(*next_instance_id)
        });

        for (dish, definition) in order.dishes.iter().zip(&definitions) {
            let item = WorkItem::new(
                dish.instance_id,
                order_id,
                definition.estimated_preparation_time,
            );
            self.scheduler.enqueue(&definition.station, item);
        }
        self.review_queue.push_back(order_id);
        info!(%order_id, dishes = order.dishes.len(), skipped = unknown.len(), "Order registered");
        self.orders.insert(order_id, order);

        let mut recipients = self.connections.with_role(&ActorRole::ChefManager);
        if !recipients.contains(&origin.connection_id) {
            recipients.insert(0, origin.connection_id);
        }
        Ok(Executed {
            order_id,
            notifications: vec![Notification::new(recipients, Event::OrderRegistered { order_id })],
        })
    }

    fn start_preparation(&mut self, resolved: &Resolved) -> Result<Executed, CommandError> {
        let order_id = resolved.order_id()?;
        let instance_id = resolved.instance_id()?;
        let station = &resolved.definition()?.station;
        order_mut(&mut self.orders, order_id)?.start_dish(instance_id)?;
        // Started without a pull: its queue entry must not outlive it.
        self.scheduler.remove(instance_id);
        info!(%order_id, %instance_id, %station, "Dish in preparation");
        Ok(self.broadcast(
            order_id,
            Event::DishInPreparation {
                order_id,
                instance_id,
            },
        ))
    }

    fn cancel_order(&mut self, resolved: &Resolved) -> Result<Executed, CommandError> {
        let order_id = resolved.order_id()?;
        let canceled = order_mut(&mut self.orders, order_id)?.cancel()?;
        info!(%order_id, dishes = canceled.len(), "Order canceled");
        Ok(self.broadcast(order_id, Event::OrderCanceled { order_id }))
    }

    fn mark_dish_done(&mut self, resolved: &Resolved) -> Result<Executed, CommandError> {
        let order_id = resolved.order_id()?;
        let instance_id = resolved.instance_id()?;
        let order_ready = order_mut(&mut self.orders, order_id)?.finish_dish(instance_id)?;
        info!(%order_id, %instance_id, order_ready, "Dish done");
        Ok(self.broadcast(
            order_id,
            Event::DishDone {
                order_id,
                instance_id,
                order_ready,
            },
        ))
    }

    fn confirm_delivery(&mut self, resolved: &Resolved) -> Result<Executed, CommandError> {
        let order_id = resolved.order_id()?;
        let served = order_mut(&mut self.orders, order_id)?.deliver()?;
        for &dish_id in &served {
            self.ranking.increment(dish_id);
        }
        info!(%order_id, dishes = served.len(), "Order delivered");

        let mut executed = self.broadcast(order_id, Event::OrderDelivered { order_id });
        executed.notifications.push(self.ranking_notification());
        Ok(executed)
    }

    fn return_dish(&mut self, resolved: &Resolved) -> Result<Executed, CommandError> {
        let order_id = resolved.order_id()?;
        let instance_id = resolved.instance_id()?;
        let definition = resolved.definition()?.clone();

        let dish_id = order_mut(&mut self.orders, order_id)?.return_dish(instance_id)?;
        self.ranking.decrement(dish_id);
        self.scheduler.enqueue(
            &definition.station,
            WorkItem::new(instance_id, order_id, definition.estimated_preparation_time),
        );
        warn!(%order_id, %instance_id, %dish_id, station = %definition.station, "Dish returned");

        let mut executed = self.broadcast(
            order_id,
            Event::DishReturned {
                order_id,
                instance_id,
                station: definition.station,
            },
        );
        executed.notifications.push(self.ranking_notification());
        Ok(executed)
    }

    fn broadcast(&self, order_id: OrderId, event: Event) -> Executed {
        Executed {
            order_id,
            notifications: vec![Notification::new(self.connections.all(), event)],
        }
    }

    fn ranking_notification(&self) -> Notification {
        Notification::new(
            self.connections.with_role(&ActorRole::RankingDisplay),
            Event::RankingUpdated {
                ranking: self.ranking_snapshot(),
            },
        )
    }

    /// Adds a connection. Receptionists get the menu and ranking displays the leaderboard.
    pub fn register(
        &mut self,
        role: ActorRole,
        outbox: UnboundedSender<Event>,
    ) -> (ConnectionId, Vec<Notification>) {
        let initial = match role {
            ActorRole::Receptionist => Some(Event::MenuUpdated { menu: self.menu() }),
            ActorRole::RankingDisplay => Some(Event::RankingUpdated {
                ranking: self.ranking_snapshot(),
            }),
            ActorRole::Station(_) | ActorRole::ChefManager => None,
        };
        let id = self.connections.register(role, outbox);
        (id, initial.map(|event| Notification::to(id, event)).into_iter().collect())
    }

    pub fn deregister(&mut self, id: ConnectionId) -> bool {
        self.connections.deregister(id)
    }

    pub fn dispatch(&self, notifications: Vec<Notification>) {
        self.connections.dispatch(notifications);
    }

    pub fn ranking_snapshot(&self) -> Vec<RankingEntry> {
        self.ranking.snapshot(self.menu.as_ref())
    }

    /// Next dish `station` should cook.
    ///
    /// Entries whose dish was canceled while queued are discarded on the way.
    pub fn next_dish(&mut self, station: &str) -> Option<WorkItem> {
        while let Some(item) = self.scheduler.pop(station) {
            let waiting = self
                .orders
                .get(&item.order_id)
                .and_then(|order| order.dish(item.instance_id))
                .is_some_and(|dish| dish.state.awaits_preparation());
            if waiting {
                return Some(item);
            }
            debug!(station, instance_id = %item.instance_id, "Discarding stale work item");
        }
        None
    }

    /// Oldest order the chef has not reviewed yet.
    pub fn next_order_for_review(&mut self) -> Option<OrderId> {
        self.review_queue.pop_front()
    }

    pub fn order(&self, id: OrderId) -> Option<Order> {
        self.orders.get(&id).cloned()
    }

    pub fn menu(&self) -> Vec<DishDefinition> {
        self.menu.list()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DishId, DishState, InMemoryMenu, OrderState};
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    struct Harness {
        kitchen: Kitchen,
        menu: Arc<InMemoryMenu>,
        receptionist: ConnectionId,
        grill: ConnectionId,
        fry: ConnectionId,
        chef: ConnectionId,
        display: ConnectionId,
        display_rx: UnboundedReceiver<Event>,
    }

    impl Harness {
        fn new() -> Self {
            let menu = Arc::new(InMemoryMenu::new([
                DishDefinition::new(7u32, "Burger", "grill", 10),
                DishDefinition::new(3u32, "Fries", "fry", 5),
                DishDefinition::new(2u32, "Skewer", "grill", 6),
            ]));
            let mut kitchen = Kitchen::new(menu.clone());
            let (tx, _) = mpsc::unbounded_channel();
            let (receptionist, _) = kitchen.register(ActorRole::Receptionist, tx.clone());
            let (grill, _) = kitchen.register(ActorRole::station("grill"), tx.clone());
            let (fry, _) = kitchen.register(ActorRole::station("fry"), tx.clone());
            let (chef, _) = kitchen.register(ActorRole::ChefManager, tx);
            let (display_tx, display_rx) = mpsc::unbounded_channel();
            let (display, _) = kitchen.register(ActorRole::RankingDisplay, display_tx);
            Self {
                kitchen,
                menu,
                receptionist,
                grill,
                fry,
                chef,
                display,
                display_rx,
            }
        }

        fn place(&mut self, dishes: &[u32]) -> OrderId {
            let dishes: Vec<DishId> = dishes.iter().copied().map(DishId).collect();
            self.kitchen
                .execute(self.receptionist, &Command::new_order(&dishes))
                .unwrap()
                .order_id
        }

        fn station_of(&self, order_id: OrderId, instance_id: InstanceId) -> ConnectionId {
            let order = self.kitchen.order(order_id).unwrap();
            let dish_id = order.dish(instance_id).unwrap().dish_id;
            if self.menu.lookup(dish_id).unwrap().station == "grill" {
                self.grill
            } else {
                self.fry
            }
        }

        fn cook(&mut self, order_id: OrderId, instance_id: InstanceId) {
            let station = self.station_of(order_id, instance_id);
            self.kitchen
                .execute(station, &Command::start_preparation(order_id, instance_id))
                .unwrap();
            self.kitchen
                .execute(station, &Command::mark_dish_done(order_id, instance_id))
                .unwrap();
        }

        fn cook_all(&mut self, order_id: OrderId) {
            let instances: Vec<InstanceId> = self
                .kitchen
                .order(order_id)
                .unwrap()
                .dishes
                .iter()
                .map(|d| d.instance_id)
                .collect();
            for instance_id in instances {
                self.cook(order_id, instance_id);
            }
        }

        fn instance(&self, order_id: OrderId, index: usize) -> InstanceId {
            self.kitchen.order(order_id).unwrap().dishes[index].instance_id
        }

        fn count(&self, dish_id: u32) -> u32 {
            self.kitchen.ranking.count(DishId(dish_id))
        }
    }

    #[test]
    fn test_new_order_routes_dishes_to_their_stations() {
        let mut h = Harness::new();
        let executed = h
            .kitchen
            .execute(h.receptionist, &Command::new_order(&[DishId(7), DishId(7), DishId(3)]))
            .unwrap();
        let order_id = executed.order_id;

        let order = h.kitchen.order(order_id).unwrap();
        assert_eq!(order.state, OrderState::Pending);
        assert_eq!(order.dishes.len(), 3);
        assert!(order.dishes.iter().all(|d| d.state == DishState::Waiting));

        assert_eq!(h.kitchen.scheduler.len("grill"), 2);
        assert_eq!(h.kitchen.scheduler.len("fry"), 1);
        let first = h.kitchen.next_dish("grill").unwrap();
        let second = h.kitchen.next_dish("grill").unwrap();
        assert_eq!(first.instance_id, order.dishes[0].instance_id);
        assert_eq!(second.instance_id, order.dishes[1].instance_id);
        assert_eq!(h.kitchen.next_dish("fry").unwrap().estimated_preparation_time, 5);
        assert!(h.kitchen.next_dish("fry").is_none());

        assert_eq!(
            executed.notifications,
            vec![Notification::new(
                vec![h.receptionist, h.chef],
                Event::OrderRegistered { order_id }
            )]
        );
        assert_eq!(h.kitchen.next_order_for_review(), Some(order_id));
        assert_eq!(h.kitchen.next_order_for_review(), None);
    }

    #[test]
    fn test_unknown_dishes_are_skipped_but_an_empty_order_is_refused() {
        let mut h = Harness::new();
        let order_id = h.place(&[7, 99]);
        assert_eq!(h.kitchen.order(order_id).unwrap().dishes.len(), 1);

        let err = h
            .kitchen
            .execute(h.receptionist, &Command::new_order(&[DishId(99)]))
            .unwrap_err();
        assert!(matches!(err, CommandError::MalformedRequest(_)));
        assert!(h.kitchen.order(OrderId(2)).is_none());
    }

    #[test]
    fn test_shorter_dishes_are_cooked_first() {
        let mut h = Harness::new();
        h.place(&[7]);
        let skewer_order = h.place(&[2]);
        let item = h.kitchen.next_dish("grill").unwrap();
        assert_eq!(item.order_id, skewer_order);
        assert_eq!(item.estimated_preparation_time, 6);
    }

    #[test]
    fn test_finishing_every_dish_makes_the_order_ready() {
        let mut h = Harness::new();
        let order_id = h.place(&[7, 7, 3]);
        let burger = h.instance(order_id, 0);

        h.kitchen
            .execute(h.grill, &Command::start_preparation(order_id, burger))
            .unwrap();
        assert_eq!(h.kitchen.order(order_id).unwrap().state, OrderState::InProgress);

        let executed = h
            .kitchen
            .execute(h.grill, &Command::mark_dish_done(order_id, burger))
            .unwrap();
        assert_eq!(
            executed.notifications[0].event,
            Event::DishDone {
                order_id,
                instance_id: burger,
                order_ready: false,
            }
        );
        assert_eq!(executed.notifications[0].recipients, h.kitchen.connections().all());

        h.cook(order_id, h.instance(order_id, 1));
        let fries = h.instance(order_id, 2);
        h.kitchen
            .execute(h.fry, &Command::start_preparation(order_id, fries))
            .unwrap();
        let executed = h
            .kitchen
            .execute(h.fry, &Command::mark_dish_done(order_id, fries))
            .unwrap();
        assert_eq!(
            executed.notifications[0].event,
            Event::DishDone {
                order_id,
                instance_id: fries,
                order_ready: true,
            }
        );
        assert_eq!(h.kitchen.order(order_id).unwrap().state, OrderState::Ready);
    }

    #[test]
    fn test_delivery_updates_ranking_and_displays() {
        let mut h = Harness::new();
        let order_id = h.place(&[7, 7, 3]);
        h.cook_all(order_id);
        while h.display_rx.try_recv().is_ok() {}

        let executed = h
            .kitchen
            .execute(h.receptionist, &Command::confirm_delivery(order_id))
            .unwrap();
        let order = h.kitchen.order(order_id).unwrap();
        assert_eq!(order.state, OrderState::Delivered);
        assert!(order.dishes.iter().all(|d| d.state == DishState::Delivered));
        assert_eq!(h.count(7), 2);
        assert_eq!(h.count(3), 1);

        assert_eq!(executed.notifications.len(), 2);
        assert_eq!(executed.notifications[0].event, Event::OrderDelivered { order_id });
        let ranking = Event::RankingUpdated {
            ranking: vec![
                RankingEntry {
                    name: "Burger".into(),
                    count: 2,
                },
                RankingEntry {
                    name: "Fries".into(),
                    count: 1,
                },
            ],
        };
        assert_eq!(executed.notifications[1], Notification::new(vec![h.display], ranking.clone()));

        h.kitchen.dispatch(executed.notifications);
        assert_eq!(h.display_rx.try_recv().unwrap(), Event::OrderDelivered { order_id });
        assert_eq!(h.display_rx.try_recv().unwrap(), ranking);
    }

    #[test]
    fn test_delivery_before_ready_changes_nothing() {
        let mut h = Harness::new();
        let order_id = h.place(&[7, 3]);
        h.cook(order_id, h.instance(order_id, 0));
        let before = h.kitchen.order(order_id).unwrap();
        let fry_backlog = h.kitchen.scheduler.len("fry");
        let ranking = h.kitchen.ranking_snapshot();

        let err = h
            .kitchen
            .execute(h.receptionist, &Command::confirm_delivery(order_id))
            .unwrap_err();
        assert!(matches!(err, CommandError::InvalidTransition(_)));
        assert_eq!(h.kitchen.order(order_id).unwrap(), before);
        assert_eq!(h.count(7), 0);
        assert_eq!(h.kitchen.scheduler.len("fry"), fry_backlog);
        assert_eq!(h.kitchen.ranking_snapshot(), ranking);
    }

    #[test]
    fn test_returned_dish_goes_back_to_its_station() {
        let mut h = Harness::new();
        let order_id = h.place(&[7, 7, 3]);
        h.cook_all(order_id);
        h.kitchen
            .execute(h.receptionist, &Command::confirm_delivery(order_id))
            .unwrap();
        while h.kitchen.next_dish("grill").is_some() {}

        let fries = h.instance(order_id, 2);
        let executed = h
            .kitchen
            .execute(h.receptionist, &Command::return_dish(order_id, fries))
            .unwrap();
        assert_eq!(
            executed.notifications[0].event,
            Event::DishReturned {
                order_id,
                instance_id: fries,
                station: "fry".into(),
            }
        );

        let order = h.kitchen.order(order_id).unwrap();
        assert_eq!(order.state, OrderState::InProgress);
        assert_eq!(order.dish(fries).unwrap().state, DishState::Returned);
        assert_eq!(h.count(3), 0);
        assert_eq!(h.count(7), 2);

        let item = h.kitchen.next_dish("fry").unwrap();
        assert_eq!(item.instance_id, fries);
        assert_eq!(item.estimated_preparation_time, 5);
        assert!(h.kitchen.next_dish("grill").is_none());

        // Cooking it again makes the order ready; only the returned dish is owed.
        h.cook(order_id, fries);
        assert_eq!(h.kitchen.order(order_id).unwrap().state, OrderState::Ready);
        h.kitchen
            .execute(h.receptionist, &Command::confirm_delivery(order_id))
            .unwrap();
        assert_eq!(h.count(3), 1);
        assert_eq!(h.count(7), 2);
    }

    #[test]
    fn test_returned_dish_waits_behind_earlier_equal_dishes() {
        let mut h = Harness::new();
        let first = h.place(&[7]);
        let returned = h.instance(first, 0);
        // Started straight away, never pulled through the queue.
        h.cook(first, returned);
        assert!(h.kitchen.scheduler.is_empty("grill"));
        h.kitchen
            .execute(h.receptionist, &Command::confirm_delivery(first))
            .unwrap();

        let second = h.place(&[7]);
        let waiting = h.instance(second, 0);
        h.kitchen
            .execute(h.receptionist, &Command::return_dish(first, returned))
            .unwrap();

        assert_eq!(h.kitchen.scheduler.len("grill"), 2);
        assert_eq!(h.kitchen.next_dish("grill").unwrap().instance_id, waiting);
        assert_eq!(h.kitchen.next_dish("grill").unwrap().instance_id, returned);
        assert!(h.kitchen.next_dish("grill").is_none());
    }

    #[test]
    fn test_requeued_dish_uses_current_menu_time() {
        let mut h = Harness::new();
        let order_id = h.place(&[7]);
        let burger = h.instance(order_id, 0);
        h.cook(order_id, burger);
        h.kitchen
            .execute(h.receptionist, &Command::confirm_delivery(order_id))
            .unwrap();

        h.menu.upsert(DishDefinition::new(7u32, "Burger", "grill", 12));
        h.kitchen
            .execute(h.receptionist, &Command::return_dish(order_id, burger))
            .unwrap();
        assert_eq!(
            h.kitchen.next_dish("grill").unwrap().estimated_preparation_time,
            12
        );
    }

    #[test]
    fn test_return_of_undelivered_dish_is_refused() {
        let mut h = Harness::new();
        let delivered = h.place(&[7]);
        h.cook_all(delivered);
        h.kitchen
            .execute(h.receptionist, &Command::confirm_delivery(delivered))
            .unwrap();

        let order_id = h.place(&[7]);
        let burger = h.instance(order_id, 0);
        let before = h.kitchen.order(order_id).unwrap();
        let count = h.count(7);
        let grill_backlog = h.kitchen.scheduler.len("grill");
        let ranking = h.kitchen.ranking_snapshot();

        let err = h
            .kitchen
            .execute(h.receptionist, &Command::return_dish(order_id, burger))
            .unwrap_err();
        assert!(matches!(err, CommandError::InvalidTransition(_)));
        assert_eq!(h.kitchen.order(order_id).unwrap(), before);
        assert_eq!(h.count(7), count);
        assert_eq!(h.kitchen.scheduler.len("grill"), grill_backlog);
        assert_eq!(h.kitchen.ranking_snapshot(), ranking);
    }

    #[test]
    fn test_cancel_keeps_done_dishes_done() {
        let mut h = Harness::new();
        let order_id = h.place(&[7, 3]);
        let burger = h.instance(order_id, 0);
        let fries = h.instance(order_id, 1);
        h.cook(order_id, burger);

        h.kitchen
            .execute(h.receptionist, &Command::cancel_order(order_id))
            .unwrap();
        let order = h.kitchen.order(order_id).unwrap();
        assert_eq!(order.state, OrderState::Canceled);
        assert_eq!(order.dish(burger).unwrap().state, DishState::Done);
        assert_eq!(order.dish(fries).unwrap().state, DishState::Canceled);
        assert!(h.kitchen.next_dish("fry").is_none());
    }

    #[test]
    fn test_ranking_never_goes_negative() {
        let mut h = Harness::new();
        let first = h.place(&[3]);
        h.cook_all(first);
        h.kitchen
            .execute(h.receptionist, &Command::confirm_delivery(first))
            .unwrap();
        let fries = h.instance(first, 0);
        h.kitchen
            .execute(h.receptionist, &Command::return_dish(first, fries))
            .unwrap();
        assert_eq!(h.count(3), 0);
        assert!(h.kitchen.ranking_snapshot().iter().all(|e| e.count == 0));
    }

    #[test]
    fn test_cancel_leaves_delivered_dishes_alone() {
        let mut h = Harness::new();
        let order_id = h.place(&[7, 3]);
        h.cook_all(order_id);
        h.kitchen
            .execute(h.receptionist, &Command::confirm_delivery(order_id))
            .unwrap();
        let burger = h.instance(order_id, 0);
        h.kitchen
            .execute(h.receptionist, &Command::return_dish(order_id, burger))
            .unwrap();

        h.kitchen
            .execute(h.receptionist, &Command::cancel_order(order_id))
            .unwrap();
        let order = h.kitchen.order(order_id).unwrap();
        assert_eq!(order.state, OrderState::Canceled);
        assert_eq!(order.dish(burger).unwrap().state, DishState::Canceled);
        assert_eq!(order.dishes[1].state, DishState::Delivered);
        assert!(h.kitchen.next_dish("grill").is_none());
    }

    #[test]
    fn test_canceled_dishes_are_dropped_from_queues() {
        let mut h = Harness::new();
        let order_id = h.place(&[7, 3]);
        let burger = h.instance(order_id, 0);
        h.kitchen
            .execute(h.grill, &Command::start_preparation(order_id, burger))
            .unwrap();

        let executed = h
            .kitchen
            .execute(h.chef, &Command::cancel_order(order_id))
            .unwrap();
        assert_eq!(executed.notifications[0].event, Event::OrderCanceled { order_id });
        let order = h.kitchen.order(order_id).unwrap();
        assert!(order.dishes.iter().all(|d| d.state == DishState::Canceled));
        assert!(h.kitchen.next_dish("grill").is_none());
        assert!(h.kitchen.next_dish("fry").is_none());

        let err = h
            .kitchen
            .execute(h.chef, &Command::cancel_order(order_id))
            .unwrap_err();
        assert!(matches!(err, CommandError::InvalidTransition(_)));
    }

    #[test]
    fn test_only_the_owning_station_may_advance_a_dish() {
        let mut h = Harness::new();
        let order_id = h.place(&[7]);
        let burger = h.instance(order_id, 0);
        let err = h
            .kitchen
            .execute(h.fry, &Command::start_preparation(order_id, burger))
            .unwrap_err();
        assert!(matches!(err, CommandError::StationNotAuthorized { .. }));
        assert_eq!(
            h.kitchen.order(order_id).unwrap().dishes[0].state,
            DishState::Waiting
        );
    }

    #[test]
    fn test_commands_from_unregistered_connections_are_malformed() {
        let mut h = Harness::new();
        h.kitchen.deregister(h.receptionist);
        let err = h
            .kitchen
            .execute(h.receptionist, &Command::new_order(&[DishId(7)]))
            .unwrap_err();
        assert!(matches!(err, CommandError::MalformedRequest(_)));
    }

    #[test]
    fn test_new_connections_receive_initial_state() {
        let mut h = Harness::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let (id, notifications) = h.kitchen.register(ActorRole::Receptionist, tx.clone());
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].recipients, vec![id]);
        match &notifications[0].event {
            Event::MenuUpdated { menu } => {
                let ids: Vec<DishId> = menu.iter().map(|d| d.id).collect();
                assert_eq!(ids, vec![DishId(2), DishId(3), DishId(7)]);
            }
            other => panic!("unexpected event {other:?}"),
        }

        let (_, notifications) = h.kitchen.register(ActorRole::RankingDisplay, tx.clone());
        assert_eq!(notifications[0].event, Event::RankingUpdated { ranking: vec![] });

        let (_, notifications) = h.kitchen.register(ActorRole::station("grill"), tx);
        assert!(notifications.is_empty());
    }

    #[test]
    fn test_independent_kitchens_do_not_share_state() {
        let mut a = Harness::new();
        let b = Harness::new();
        a.place(&[7]);
        assert!(a.kitchen.order(OrderId(1)).is_some());
        assert!(b.kitchen.order(OrderId(1)).is_none());
    }
}
