use std::collections::HashMap;
use std::sync::Arc;

use net::channels::{ConnEvent, ConnRx, OutputTx};
use net::Socket;
use session::{SessionHandle, SessionId, SessionMsg};
use tokio::sync::watch;

use crate::actor::{spawn_session, World};

/// Bridge between the transport and the per-session actors: spawns an
/// actor per connection, forwards lines, and fans out disconnects on
/// connection close and on server shutdown.
pub async fn run_supervisor(
    mut conn_rx: ConnRx,
    output_tx: OutputTx,
    world: Arc<World>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut handles: HashMap<SessionId, SessionHandle> = HashMap::new();

    loop {
        tokio::select! {
            event = conn_rx.recv() => {
                let Some(event) = event else { break };
                match event {
                    ConnEvent::Opened { session_id } => {
                        let socket = Socket::new(session_id, output_tx.clone());
                        let handle = spawn_session(session_id, socket, world.clone());
                        handles.insert(session_id, handle);
                    }
                    ConnEvent::Line { session_id, line } => {
                        if let Some(handle) = handles.get(&session_id) {
                            let _ = handle.send(SessionMsg::Input(line));
                        }
                    }
                    ConnEvent::Closed { session_id } => {
                        if let Some(handle) = handles.remove(&session_id) {
                            let _ = handle.send(SessionMsg::Disconnect);
                        }
                    }
                }
            }
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    tracing::info!(sessions = handles.len(), "supervisor: disconnecting all sessions");
                    for handle in handles.values() {
                        let _ = handle.send(SessionMsg::Disconnect);
                    }
                    break;
                }
            }
        }
    }

    tracing::info!("supervisor stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat::ChannelBus;
    use game_core::SkillBook;
    use player_store::NullStore;
    use session::ActorRegistry;
    use space::RoomDirectory;
    use std::sync::RwLock;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn world() -> Arc<World> {
        let rooms = Arc::new(RoomDirectory::new());
        rooms.register_room(1, "Town Square");
        Arc::new(World {
            book: Arc::new(SkillBook::builtin()),
            rooms,
            bus: Arc::new(RwLock::new(ChannelBus::new())),
            registry: Arc::new(ActorRegistry::new()),
            store: Arc::new(NullStore),
            start_room: 1,
            regen_interval: Duration::ZERO,
        })
    }

    #[tokio::test]
    async fn supervisor_spawns_actor_and_routes_lines() {
        let (conn_tx, conn_rx) = mpsc::unbounded_channel();
        let (output_tx, mut output_rx) = mpsc::unbounded_channel();
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        tokio::spawn(run_supervisor(conn_rx, output_tx, world(), shutdown_rx));

        let sid = SessionId(1);
        conn_tx.send(ConnEvent::Opened { session_id: sid }).unwrap();

        // The new actor greets with the login prompt.
        let out = output_rx.recv().await.unwrap();
        assert_eq!(out.session_id, sid);
        assert!(out.text.contains("What is your name?"));

        conn_tx
            .send(ConnEvent::Line {
                session_id: sid,
                line: "alice".to_string(),
            })
            .unwrap();
        let out = output_rx.recv().await.unwrap();
        assert!(out.text.contains("Welcome, alice!"));
    }

    #[tokio::test]
    async fn shutdown_disconnects_sessions() {
        let (conn_tx, conn_rx) = mpsc::unbounded_channel();
        let (output_tx, mut output_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let world = world();

        let sup = tokio::spawn(run_supervisor(conn_rx, output_tx, world.clone(), shutdown_rx));

        let sid = SessionId(1);
        conn_tx.send(ConnEvent::Opened { session_id: sid }).unwrap();
        let _ = output_rx.recv().await.unwrap();
        conn_tx
            .send(ConnEvent::Line {
                session_id: sid,
                line: "alice".to_string(),
            })
            .unwrap();
        while let Ok(Some(out)) =
            tokio::time::timeout(Duration::from_millis(200), output_rx.recv()).await
        {
            if out.text.contains("help") {
                break;
            }
        }

        shutdown_tx.send(true).unwrap();
        let _ = sup.await;

        // The actor processed its Disconnect: the registry is empty again.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(world.registry.is_empty());
    }
}
