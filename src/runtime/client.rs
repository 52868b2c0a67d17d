use super::{KitchenError, KitchenRequest, Response};
use crate::model::{ActorRole, ConnectionId, DishDefinition, DishId, InstanceId, Order, OrderId};
use crate::protocol::{Command, Event};
use crate::ranking::RankingEntry;
use crate::scheduler::WorkItem;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

/// A registered connection: its id plus the stream of events the kitchen sends it.
#[derive(Debug)]
pub struct Session {
    pub connection_id: ConnectionId,
    pub role: ActorRole,
    pub events: mpsc::UnboundedReceiver<Event>,
}

/// Cheap, cloneable handle to the [`KitchenActor`](super::KitchenActor).
#[derive(Clone)]
pub struct KitchenClient {
    sender: mpsc::Sender<KitchenRequest>,
}

impl KitchenClient {
    pub fn new(sender: mpsc::Sender<KitchenRequest>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(Response<T>) -> KitchenRequest,
    ) -> Result<T, KitchenError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| KitchenError::ActorClosed)?;
        response.await.map_err(|_| KitchenError::ActorDropped)?
    }

    /// Registers a connection whose events go to `outbox`.
    #[instrument(skip(self, outbox))]
    pub async fn register(
        &self,
        role: ActorRole,
        outbox: mpsc::UnboundedSender<Event>,
    ) -> Result<ConnectionId, KitchenError> {
        debug!("Sending request");
        self.request(|respond_to| KitchenRequest::Register {
            role,
            outbox,
            respond_to,
        })
        .await
    }

    /// Registers a connection and hands back its event stream.
    pub async fn connect(&self, role: ActorRole) -> Result<Session, KitchenError> {
        let (outbox, events) = mpsc::unbounded_channel();
        let connection_id = self.register(role.clone(), outbox).await?;
        Ok(Session {
            connection_id,
            role,
            events,
        })
    }

    #[instrument(skip(self))]
    pub async fn deregister(&self, connection_id: ConnectionId) -> Result<bool, KitchenError> {
        debug!("Sending request");
        self.request(|respond_to| KitchenRequest::Deregister {
            connection_id,
            respond_to,
        })
        .await
    }

    /// Runs `command` on behalf of `origin`. Returns the order it created or acted on.
    #[instrument(skip(self, command), fields(kind = %command.kind))]
    pub async fn execute(
        &self,
        origin: ConnectionId,
        command: Command,
    ) -> Result<OrderId, KitchenError> {
        debug!(payload = %command.payload, "Sending request");
        self.request(|respond_to| KitchenRequest::Execute {
            origin,
            command,
            respond_to,
        })
        .await
    }

    pub async fn new_order(
        &self,
        origin: ConnectionId,
        dishes: &[DishId],
    ) -> Result<OrderId, KitchenError> {
        self.execute(origin, Command::new_order(dishes)).await
    }

    pub async fn start_preparation(
        &self,
        origin: ConnectionId,
        order_id: OrderId,
        instance_id: InstanceId,
    ) -> Result<(), KitchenError> {
        self.execute(origin, Command::start_preparation(order_id, instance_id))
            .await
            .map(drop)
    }

    pub async fn cancel_order(
        &self,
        origin: ConnectionId,
        order_id: OrderId,
    ) -> Result<(), KitchenError> {
        self.execute(origin, Command::cancel_order(order_id)).await.map(drop)
    }

    pub async fn mark_dish_done(
        &self,
        origin: ConnectionId,
        order_id: OrderId,
        instance_id: InstanceId,
    ) -> Result<(), KitchenError> {
        self.execute(origin, Command::mark_dish_done(order_id, instance_id))
            .await
            .map(drop)
    }

    pub async fn confirm_delivery(
        &self,
        origin: ConnectionId,
        order_id: OrderId,
    ) -> Result<(), KitchenError> {
        self.execute(origin, Command::confirm_delivery(order_id)).await.map(drop)
    }

    pub async fn return_dish(
        &self,
        origin: ConnectionId,
        order_id: OrderId,
        instance_id: InstanceId,
    ) -> Result<(), KitchenError> {
        self.execute(origin, Command::return_dish(order_id, instance_id))
            .await
            .map(drop)
    }

    #[instrument(skip(self))]
    pub async fn ranking_snapshot(&self) -> Result<Vec<RankingEntry>, KitchenError> {
        self.request(|respond_to| KitchenRequest::RankingSnapshot { respond_to }).await
    }

    /// Pulls the next dish for `station`. `None` means the station has nothing to do.
    #[instrument(skip(self))]
    pub async fn next_dish(&self, station: &str) -> Result<Option<WorkItem>, KitchenError> {
        let station = station.to_string();
        self.request(|respond_to| KitchenRequest::NextDish {
            station,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn next_order_for_review(&self) -> Result<Option<OrderId>, KitchenError> {
        self.request(|respond_to| KitchenRequest::NextOrderForReview { respond_to })
            .await
    }

    #[instrument(skip(self))]
    pub async fn order(&self, order_id: OrderId) -> Result<Option<Order>, KitchenError> {
        self.request(|respond_to| KitchenRequest::GetOrder {
            order_id,
            respond_to,
        })
        .await
    }

    pub async fn menu(&self) -> Result<Vec<DishDefinition>, KitchenError> {
        self.request(|respond_to| KitchenRequest::Menu { respond_to }).await
    }
}
