use super::KitchenError;
use crate::model::{ActorRole, ConnectionId, DishDefinition, Order, OrderId};
use crate::protocol::{Command, Event};
use crate::ranking::RankingEntry;
use crate::scheduler::WorkItem;
use tokio::sync::{mpsc, oneshot};

/// One-shot reply channel carried by every request.
pub type Response<T> = oneshot::Sender<Result<T, KitchenError>>;

/// Messages understood by the [`KitchenActor`](super::KitchenActor).
///
/// `Execute` carries one of the six mutating commands. Everything else is connection management or
/// a read-only snapshot, served in the same queue so it never races a mutation.
#[derive(Debug)]
pub enum KitchenRequest {
    Register {
        role: ActorRole,
        outbox: mpsc::UnboundedSender<Event>,
        respond_to: Response<ConnectionId>,
    },
    Deregister {
        connection_id: ConnectionId,
        respond_to: Response<bool>,
    },
    Execute {
        origin: ConnectionId,
        command: Command,
        respond_to: Response<OrderId>,
    },
    RankingSnapshot {
        respond_to: Response<Vec<RankingEntry>>,
    },
    NextDish {
        station: String,
        respond_to: Response<Option<WorkItem>>,
    },
    NextOrderForReview {
        respond_to: Response<Option<OrderId>>,
    },
    GetOrder {
        order_id: OrderId,
        respond_to: Response<Option<Order>>,
    },
    Menu {
        respond_to: Response<Vec<DishDefinition>>,
    },
}
