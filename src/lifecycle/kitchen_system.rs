use crate::config::KitchenConfig;
use crate::model::{InMemoryMenu, MenuCatalog};
use crate::runtime::{KitchenActor, KitchenClient};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Kitchen actor task failed: {0}")]
    ActorTask(#[from] tokio::task::JoinError),
}

/// A running kitchen: the actor task plus the client used to reach it.
///
/// Systems are independent. Several can run side by side in one process, each with its own
/// orders, queues and ranking.
///
/// # Example
///
/// ```ignore
/// let system = KitchenSystem::new(KitchenConfig::default());
/// let front = system.client.connect(ActorRole::Receptionist).await?;
/// let order_id = system.client.new_order(front.connection_id, &[DishId(7)]).await?;
/// system.shutdown().await?;
/// ```
pub struct KitchenSystem {
    pub client: KitchenClient,
    /// Shared with the actor. Edits are visible to the kitchen immediately.
    pub menu: Arc<InMemoryMenu>,
    handle: JoinHandle<()>,
}

impl KitchenSystem {
    /// Builds the menu from `config` and spawns the kitchen actor. Must be called inside a Tokio
    /// runtime.
    pub fn new(config: KitchenConfig) -> Self {
        let menu = Arc::new(config.build_menu());
        let catalog: Arc<dyn MenuCatalog> = menu.clone();
        let (actor, client) = KitchenActor::new(config.channel_capacity, catalog);
        let handle = tokio::spawn(actor.run());
        info!(dishes = menu.len(), capacity = config.channel_capacity, "Kitchen system started");

        Self {
            client,
            menu,
            handle,
        }
    }

    /// Drops this system's client and waits for the actor to drain.
    ///
    /// Clones of the client held elsewhere keep the actor alive; drop them first.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down kitchen...");
        drop(self.client);

        if let Err(e) = self.handle.await {
            error!("Kitchen actor task failed: {:?}", e);
            return Err(e.into());
        }

        info!("Kitchen shutdown complete.");
        Ok(())
    }
}
