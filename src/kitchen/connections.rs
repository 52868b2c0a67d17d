//! Live connections and fan-out of events to them.

use crate::model::{ActorRole, ConnectionId};
use crate::pipeline::Origin;
use crate::protocol::Event;
use std::collections::HashMap;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

/// One event and the connections that should receive it.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub recipients: Vec<ConnectionId>,
    pub event: Event,
}

impl Notification {
    pub fn new(recipients: Vec<ConnectionId>, event: Event) -> Self {
        Self { recipients, event }
    }

    pub fn to(recipient: ConnectionId, event: Event) -> Self {
        Self::new(vec![recipient], event)
    }
}

#[derive(Debug)]
pub struct Connection {
    pub id: ConnectionId,
    pub role: ActorRole,
    outbox: UnboundedSender<Event>,
}

impl Connection {
    /// Fire-and-forget. A closed outbox means the peer is going away; deregistration follows.
    pub fn deliver(&self, event: Event) {
        if self.outbox.send(event).is_err() {
            debug!(connection_id = %self.id, "Outbox closed, event dropped");
        }
    }
}

#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: HashMap<ConnectionId, Connection>,
    next_id: u64,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, role: ActorRole, outbox: UnboundedSender<Event>) -> ConnectionId {
        self.next_id += 1;
        let id = ConnectionId(self.next_id);
        info!(connection_id = %id, %role, "Connection registered");
        self.connections.insert(id, Connection { id, role, outbox });
        id
    }

    pub fn deregister(&mut self, id: ConnectionId) -> bool {
        let removed = self.connections.remove(&id);
        if let Some(connection) = &removed {
            info!(connection_id = %id, role = %connection.role, "Connection deregistered");
        }
        removed.is_some()
    }

    pub fn origin(&self, id: ConnectionId) -> Option<Origin> {
        self.connections.get(&id).map(|c| Origin {
            connection_id: c.id,
            role: c.role.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn all(&self) -> Vec<ConnectionId> {
        self.matching(|_| true)
    }

    pub fn with_role(&self, role: &ActorRole) -> Vec<ConnectionId> {
        self.matching(|r| r == role)
    }

    fn matching(&self, mut keep: impl FnMut(&ActorRole) -> bool) -> Vec<ConnectionId> {
        let mut ids: Vec<ConnectionId> = self
            .connections
            .values()
            .filter(|c| keep(&c.role))
            .map(|c| c.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Delivers each notification to its recipients that are still connected, in order.
    pub fn dispatch(&self, notifications: Vec<Notification>) {
        for Notification { recipients, event } in notifications {
            debug!(event = event.kind(), recipients = recipients.len(), "Dispatch");
            for id in recipients {
                if let Some(connection) = self.connections.get(&id) {
                    connection.deliver(event.clone());
                }
            }
        }
    }
}
