use std::collections::HashMap;
use std::sync::Arc;

use game_core::{Character, EffectDelta};
use session::{ActorRegistry, SessionHandle, SessionMsg};
use space::RoomRegistry;
use tokio::sync::mpsc;

/// Seed data for one NPC.
#[derive(Debug, Clone)]
pub struct NpcSpawn {
    pub id: u64,
    pub name: String,
    pub room_id: u64,
    pub health: i64,
}

#[derive(Debug)]
struct NpcState {
    name: String,
    room_id: u64,
    health: i64,
}

/// Start the NPC host actor.
///
/// NPCs don't get a session each; one host actor owns their combat state.
/// It registers a handle per NPC in the actor registry, so effect delivery
/// to an NPC looks exactly like delivery to a player: a message, applied
/// by whoever owns the state.
pub fn spawn_npc_host(
    spawns: Vec<NpcSpawn>,
    rooms: Arc<dyn RoomRegistry>,
    registry: Arc<ActorRegistry>,
) -> SessionHandle {
    let (tx, rx) = mpsc::unbounded_channel();

    let mut npcs = HashMap::new();
    for spawn in spawns {
        let who = Character::npc(spawn.id, spawn.name.clone());
        if let Err(e) = rooms.enter(spawn.room_id, who.clone()) {
            tracing::warn!(npc = %spawn.name, "could not place NPC: {}", e);
            continue;
        }
        registry.register(who, tx.clone());
        npcs.insert(
            spawn.id,
            NpcState {
                name: spawn.name,
                room_id: spawn.room_id,
                health: spawn.health,
            },
        );
    }
    tracing::info!(count = npcs.len(), "NPC host started");

    tokio::spawn(run_npc_host(npcs, rx, rooms, registry));
    tx
}

async fn run_npc_host(
    mut npcs: HashMap<u64, NpcState>,
    mut mailbox: mpsc::UnboundedReceiver<SessionMsg>,
    rooms: Arc<dyn RoomRegistry>,
    registry: Arc<ActorRegistry>,
) {
    while let Some(msg) = mailbox.recv().await {
        match msg {
            SessionMsg::Effects {
                to, from, skill, deltas, ..
            } => {
                let Character::Npc { id, .. } = &to else {
                    continue;
                };
                let Some(npc) = npcs.get_mut(id) else {
                    // Already defeated; the cast raced our removal.
                    continue;
                };
                for delta in &deltas {
                    match delta {
                        EffectDelta::Damage(n) => npc.health -= n,
                        EffectDelta::Heal(n) => npc.health += n,
                        // NPCs carry no boostable stat block.
                        EffectDelta::Boost { .. } => {}
                    }
                }
                tracing::info!(
                    npc = %npc.name,
                    from = %from,
                    skill = %skill,
                    health = npc.health,
                    "npc took effects"
                );
                if npc.health <= 0 {
                    rooms.leave(npc.room_id, &to);
                    registry.unregister(&to);
                    tracing::info!(npc = %npc.name, from = %from, "npc defeated");
                    npcs.remove(id);
                }
            }
            SessionMsg::Disconnect => break,
            _ => {}
        }
    }
    tracing::info!("NPC host stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use space::RoomDirectory;

    fn setup() -> (Arc<RoomDirectory>, Arc<ActorRegistry>, SessionHandle) {
        let rooms = Arc::new(RoomDirectory::new());
        rooms.register_room(1, "Town Square");
        let registry = Arc::new(ActorRegistry::new());
        let host = spawn_npc_host(
            vec![NpcSpawn {
                id: 1,
                name: "Goblin".to_string(),
                room_id: 1,
                health: 10,
            }],
            rooms.clone(),
            registry.clone(),
        );
        (rooms, registry, host)
    }

    #[tokio::test]
    async fn npc_appears_in_room_and_registry() {
        let (rooms, registry, _host) = setup();
        let goblin = Character::npc(1, "Goblin");
        assert!(rooms.lookup(1).find(&goblin).is_some());
        assert!(registry.contains(&goblin));
    }

    #[tokio::test]
    async fn lethal_damage_removes_npc() {
        let (rooms, registry, _host) = setup();
        let goblin = Character::npc(1, "Goblin");

        registry.deliver(
            &goblin,
            SessionMsg::Effects {
                to: goblin.clone(),
                from: Character::player(10, "Alice"),
                skill: "Slash".to_string(),
                deltas: vec![EffectDelta::Damage(12)],
            },
        );

        // Give the host a moment to process.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(rooms.lookup(1).find(&goblin).is_none());
        assert!(!registry.contains(&goblin));
    }

    #[tokio::test]
    async fn survivable_damage_keeps_npc_present() {
        let (rooms, registry, _host) = setup();
        let goblin = Character::npc(1, "Goblin");

        registry.deliver(
            &goblin,
            SessionMsg::Effects {
                to: goblin.clone(),
                from: Character::player(10, "Alice"),
                skill: "Slash".to_string(),
                deltas: vec![EffectDelta::Damage(4)],
            },
        );

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(rooms.lookup(1).find(&goblin).is_some());
    }
}
