use super::{KitchenClient, KitchenError, KitchenRequest};
use crate::kitchen::{Kitchen, Notification};
use crate::model::MenuCatalog;
use crate::protocol::Event;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Owns the [`Kitchen`] and serves requests one at a time.
///
/// The kitchen is only ever touched from inside [`run`](Self::run), so there is no lock around
/// it. A request is fully applied and its events are queued on every recipient's outbox before
/// the next request is read, which keeps each connection's event stream in commit order.
pub struct KitchenActor {
    receiver: mpsc::Receiver<KitchenRequest>,
    kitchen: Kitchen,
}

impl KitchenActor {
    pub fn new(buffer_size: usize, menu: Arc<dyn MenuCatalog>) -> (Self, KitchenClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            kitchen: Kitchen::new(menu),
        };
        (actor, KitchenClient::new(sender))
    }

    /// Runs until every client has been dropped.
    pub async fn run(mut self) {
        info!("Kitchen actor started");

        while let Some(msg) = self.receiver.recv().await {
            self.handle(msg);
        }

        info!(connections = self.kitchen.connections().len(), "Kitchen actor shutdown");
    }

    fn handle(&mut self, msg: KitchenRequest) {
        match msg {
            KitchenRequest::Register {
                role,
                outbox,
                respond_to,
            } => {
                let (connection_id, initial) = self.kitchen.register(role, outbox);
                self.kitchen.dispatch(initial);
                let _ = respond_to.send(Ok(connection_id));
            }
            KitchenRequest::Deregister {
                connection_id,
                respond_to,
            } => {
                let removed = self.kitchen.deregister(connection_id);
                let _ = respond_to.send(Ok(removed));
            }
            KitchenRequest::Execute {
                origin,
                command,
                respond_to,
            } => {
                debug!(%origin, kind = %command.kind, payload = %command.payload, "Execute");
                let result = match self.kitchen.execute(origin, &command) {
                    Ok(executed) => {
                        self.kitchen.dispatch(executed.notifications);
                        Ok(executed.order_id)
                    }
                    Err(e) => {
                        warn!(
                            %origin,
                            kind = %command.kind,
                            code = e.code(),
                            error = %e,
                            "Command rejected"
                        );
                        let failure = Event::request_failed(command.kind, &e);
                        self.kitchen.dispatch(vec![Notification::to(origin, failure)]);
                        Err(KitchenError::Rejected(e))
                    }
                };
                let _ = respond_to.send(result);
            }
            KitchenRequest::RankingSnapshot { respond_to } => {
                let _ = respond_to.send(Ok(self.kitchen.ranking_snapshot()));
            }
            KitchenRequest::NextDish {
                station,
                respond_to,
            } => {
                let item = self.kitchen.next_dish(&station);
                debug!(station, found = item.is_some(), "Next dish");
                let _ = respond_to.send(Ok(item));
            }
            KitchenRequest::NextOrderForReview { respond_to } => {
                let _ = respond_to.send(Ok(self.kitchen.next_order_for_review()));
            }
            KitchenRequest::GetOrder {
                order_id,
                respond_to,
            } => {
                let order = self.kitchen.order(order_id);
                debug!(%order_id, found = order.is_some(), "Get order");
                let _ = respond_to.send(Ok(order));
            }
            KitchenRequest::Menu { respond_to } => {
                let _ = respond_to.send(Ok(self.kitchen.menu()));
            }
        }
    }
}
