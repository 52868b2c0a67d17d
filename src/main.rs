//! # Kitchen Orchestrator demo
//!
//! Starts a kitchen, connects one client per role, and walks a table's order through its whole
//! life: placed, reviewed, cooked at two stations, delivered, one dish sent back and re-cooked.
//!
//! ```bash
//! RUST_LOG=info cargo run
//! RUST_LOG=debug cargo run -- menu.json
//! ```

use kitchen_orchestrator::config::{load_config, KitchenConfig};
use kitchen_orchestrator::lifecycle::{setup_tracing, KitchenSystem};
use kitchen_orchestrator::model::{ActorRole, ConnectionId, DishId, OrderId};
use kitchen_orchestrator::runtime::{KitchenClient, KitchenError, Session};
use std::path::Path;
use tracing::{error, info, Instrument};

/// Lets `station` pull and cook everything in its queue.
async fn work_station(client: &KitchenClient, station: &Session) -> Result<usize, KitchenError> {
    let Some(name) = station.role.station_name() else {
        return Ok(0);
    };

    let mut cooked = 0;
    while let Some(item) = client.next_dish(name).await? {
        client
            .start_preparation(station.connection_id, item.order_id, item.instance_id)
            .await?;
        client
            .mark_dish_done(station.connection_id, item.order_id, item.instance_id)
            .await?;
        cooked += 1;
    }
    Ok(cooked)
}

async fn serve_table(
    client: &KitchenClient,
    front: ConnectionId,
    chef: ConnectionId,
    stations: &[Session],
) -> Result<OrderId, KitchenError> {
    let order_id = client.new_order(front, &[DishId(7), DishId(7), DishId(3)]).await?;

    if let Some(reviewed) = client.next_order_for_review().await? {
        info!(%reviewed, %chef, "Chef reviewed order");
    }

    for station in stations {
        let cooked = work_station(client, station).await?;
        info!(station = %station.role, cooked, "Station idle");
    }
    client.confirm_delivery(front, order_id).await?;

    // The table sends the fries back.
    let order = client.order(order_id).await?;
    let fries = order
        .as_ref()
        .and_then(|o| o.dishes.iter().find(|d| d.dish_id == DishId(3)))
        .map(|d| d.instance_id);
    if let Some(fries) = fries {
        client.return_dish(front, order_id, fries).await?;
        for station in stations {
            work_station(client, station).await?;
        }
        client.confirm_delivery(front, order_id).await?;
    }

    Ok(order_id)
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = match std::env::args().nth(1) {
        Some(path) => load_config(Path::new(&path)).map_err(|e| e.to_string())?,
        None => KitchenConfig::default(),
    };

    info!("Starting kitchen");
    let system = KitchenSystem::new(config);
    let client = system.client.clone();

    let connect = |role: ActorRole| {
        let client = client.clone();
        async move { client.connect(role).await.map_err(|e| e.to_string()) }
    };
    let front = connect(ActorRole::Receptionist).await?;
    let chef = connect(ActorRole::ChefManager).await?;
    let mut display = connect(ActorRole::RankingDisplay).await?;
    let stations = vec![
        connect(ActorRole::station("grill")).await?,
        connect(ActorRole::station("fry")).await?,
    ];

    let span = tracing::info_span!("table_service");
    let result = serve_table(&client, front.connection_id, chef.connection_id, &stations)
        .instrument(span)
        .await;

    match result {
        Ok(order_id) => info!(%order_id, "Table served"),
        Err(e) => error!(error = %e, "Table service failed"),
    }

    let ranking = client.ranking_snapshot().await.map_err(|e| e.to_string())?;
    for (position, entry) in ranking.iter().enumerate() {
        println!("{:>2}. {:<20} {}", position + 1, entry.name, entry.count);
    }

    while let Ok(event) = display.events.try_recv() {
        info!(event = event.kind(), "Ranking display received");
    }

    drop(client);
    system.shutdown().await.map_err(|e| e.to_string())?;

    info!("Kitchen closed");
    Ok(())
}
