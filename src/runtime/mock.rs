//! # Mock Kitchen
//!
//! Utilities for testing code that talks to a [`KitchenClient`] without spinning up a
//! [`KitchenActor`](super::KitchenActor).
//!
//! [`create_mock_client`] returns a real client plus the receiving end of its channel. The test
//! plays the actor: it pulls requests with the `expect_*` helpers, asserts on them, and answers
//! through the returned responder.
//!
//! ```ignore
//! let (client, mut receiver) = create_mock_client(8);
//! let task = tokio::spawn(async move { client.new_order(ConnectionId(1), &[DishId(7)]).await });
//!
//! let (origin, command, responder) = expect_execute(&mut receiver).await.unwrap();
//! responder.send(Ok(OrderId(1))).unwrap();
//! assert_eq!(task.await.unwrap(), Ok(OrderId(1)));
//! ```

use super::{KitchenClient, KitchenRequest, Response};
use crate::model::{ActorRole, ConnectionId, OrderId};
use crate::protocol::{Command, Event};
use crate::ranking::RankingEntry;
use crate::scheduler::WorkItem;
use tokio::sync::mpsc;

pub fn create_mock_client(buffer_size: usize) -> (KitchenClient, mpsc::Receiver<KitchenRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (KitchenClient::new(sender), receiver)
}

/// Next message must be `Execute`.
pub async fn expect_execute(
    receiver: &mut mpsc::Receiver<KitchenRequest>,
) -> Option<(ConnectionId, Command, Response<OrderId>)> {
    match receiver.recv().await {
        Some(KitchenRequest::Execute {
            origin,
            command,
            respond_to,
        }) => Some((origin, command, respond_to)),
        _ => None,
    }
}

/// Next message must be `Register`.
pub async fn expect_register(
    receiver: &mut mpsc::Receiver<KitchenRequest>,
) -> Option<(ActorRole, mpsc::UnboundedSender<Event>, Response<ConnectionId>)> {
    match receiver.recv().await {
        Some(KitchenRequest::Register {
            role,
            outbox,
            respond_to,
        }) => Some((role, outbox, respond_to)),
        _ => None,
    }
}

/// Next message must be `NextDish`.
pub async fn expect_next_dish(
    receiver: &mut mpsc::Receiver<KitchenRequest>,
) -> Option<(String, Response<Option<WorkItem>>)> {
    match receiver.recv().await {
        Some(KitchenRequest::NextDish {
            station,
            respond_to,
        }) => Some((station, respond_to)),
        _ => None,
    }
}

/// Next message must be `RankingSnapshot`.
pub async fn expect_ranking_snapshot(
    receiver: &mut mpsc::Receiver<KitchenRequest>,
) -> Option<Response<Vec<RankingEntry>>> {
    match receiver.recv().await {
        Some(KitchenRequest::RankingSnapshot { respond_to }) => Some(respond_to),
        _ => None,
    }
}
