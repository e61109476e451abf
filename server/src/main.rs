mod config;
mod shutdown;

use std::sync::{Arc, RwLock};
use std::time::Duration;

use chat::ChannelBus;
use mud::{NpcSpawn, World};
use player_store::JsonFileStore;
use session::ActorRegistry;
use space::{RoomDirectory, RoomRegistry};

use crate::config::{load_skill_book, parse_cli_args, ServerConfig};
use crate::shutdown::{shutdown_channel, wait_for_signal};

#[tokio::main]
async fn main() {
    observability::init_logging();

    let config = parse_cli_args();
    tracing::info!("Ashfall server starting...");

    let (shutdown_tx, shutdown_rx) = shutdown_channel();

    // Channels between transport, router, and supervisor
    let (conn_tx, conn_rx) = tokio::sync::mpsc::unbounded_channel();
    let (output_tx, output_rx) = tokio::sync::mpsc::unbounded_channel();
    let (register_tx, register_rx) = tokio::sync::mpsc::unbounded_channel();
    let (unregister_tx, unregister_rx) = tokio::sync::mpsc::unbounded_channel();

    tokio::spawn(net::output_router::run_output_router(
        output_rx,
        register_rx,
        unregister_rx,
    ));

    let world = build_world(&config);

    // TCP front end
    let listen_addr = config.net.listen_addr.clone();
    let tcp_shutdown = shutdown_rx.clone().into_inner();
    tokio::spawn(async move {
        if let Err(e) =
            net::server::run_tcp_server(listen_addr, conn_tx, register_tx, unregister_tx, tcp_shutdown)
                .await
        {
            tracing::error!("TCP server error: {}", e);
        }
    });
    tracing::info!("Server listening on {}", config.net.listen_addr);

    // Session supervisor
    let supervisor = tokio::spawn(mud::run_supervisor(
        conn_rx,
        output_tx,
        world,
        shutdown_rx.into_inner(),
    ));

    wait_for_signal().await;
    tracing::info!("Shutdown signal received, stopping server...");
    shutdown_tx.trigger();
    let _ = supervisor.await;
    // Give session actors a beat to flush their saves.
    tokio::time::sleep(Duration::from_millis(200)).await;

    tracing::info!("Server stopped.");
}

fn build_world(config: &ServerConfig) -> Arc<World> {
    let book = Arc::new(load_skill_book(&config.game.skills_file));

    let rooms = Arc::new(RoomDirectory::new());
    seed_rooms(&rooms);
    if rooms.room_name(config.game.start_room).is_none() {
        tracing::warn!(start_room = config.game.start_room, "configured start room missing");
    }

    let mut bus = ChannelBus::new();
    for name in &config.chat.channels {
        bus.create(name.to_lowercase());
    }
    let bus = Arc::new(RwLock::new(bus));

    let registry = Arc::new(ActorRegistry::new());
    let store = Arc::new(JsonFileStore::new(&config.persistence.save_dir));

    let rooms_dyn: Arc<dyn RoomRegistry> = rooms;
    let _npc_host = mud::spawn_npc_host(seed_npcs(), rooms_dyn.clone(), registry.clone());

    Arc::new(World {
        book,
        rooms: rooms_dyn,
        bus,
        registry,
        store,
        start_room: config.game.start_room,
        regen_interval: config.regen_interval(),
    })
}

fn seed_rooms(rooms: &RoomDirectory) {
    rooms.register_room(1, "Town Square");
    rooms.register_room(2, "Training Yard");
}

fn seed_npcs() -> Vec<NpcSpawn> {
    vec![
        NpcSpawn {
            id: 1,
            name: "Goblin".to_string(),
            room_id: 1,
            health: 30,
        },
        NpcSpawn {
            id: 2,
            name: "Training Dummy".to_string(),
            room_id: 2,
            health: 500,
        },
    ]
}
