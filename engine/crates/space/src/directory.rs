use std::collections::BTreeMap;
use std::sync::RwLock;

use game_core::Character;

use crate::error::SpaceError;
use crate::snapshot::RoomSnapshot;

/// The room-membership authority, as the session layer sees it.
///
/// Reads return snapshots that may already be stale when acted on; writes
/// are best effort. `leave` tolerates characters that are already gone,
/// which is the normal disconnect race rather than an error.
pub trait RoomRegistry: Send + Sync {
    fn lookup(&self, room_id: u64) -> RoomSnapshot;
    fn enter(&self, room_id: u64, who: Character) -> Result<(), SpaceError>;
    fn leave(&self, room_id: u64, who: &Character);
}

#[derive(Debug, Default)]
struct RoomMembers {
    name: String,
    players: Vec<Character>,
    npcs: Vec<Character>,
}

/// In-memory implementation of the room authority.
#[derive(Debug, Default)]
pub struct RoomDirectory {
    rooms: RwLock<BTreeMap<u64, RoomMembers>>,
}

impl RoomDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_room(&self, room_id: u64, name: impl Into<String>) {
        let mut rooms = self.rooms.write().expect("room directory lock poisoned");
        rooms.entry(room_id).or_default().name = name.into();
    }

    pub fn room_name(&self, room_id: u64) -> Option<String> {
        let rooms = self.rooms.read().expect("room directory lock poisoned");
        rooms.get(&room_id).map(|r| r.name.clone())
    }

    pub fn room_ids(&self) -> Vec<u64> {
        let rooms = self.rooms.read().expect("room directory lock poisoned");
        rooms.keys().copied().collect()
    }
}

impl RoomRegistry for RoomDirectory {
    fn lookup(&self, room_id: u64) -> RoomSnapshot {
        let rooms = self.rooms.read().expect("room directory lock poisoned");
        match rooms.get(&room_id) {
            Some(members) => RoomSnapshot {
                room_id,
                players: members.players.clone(),
                npcs: members.npcs.clone(),
            },
            None => RoomSnapshot::empty(room_id),
        }
    }

    fn enter(&self, room_id: u64, who: Character) -> Result<(), SpaceError> {
        let mut rooms = self.rooms.write().expect("room directory lock poisoned");
        let members = rooms
            .get_mut(&room_id)
            .ok_or(SpaceError::UnknownRoom(room_id))?;
        let list = if who.is_player() {
            &mut members.players
        } else {
            &mut members.npcs
        };
        // Re-entry refreshes the stored copy (name may have changed).
        list.retain(|c| c != &who);
        list.push(who);
        Ok(())
    }

    fn leave(&self, room_id: u64, who: &Character) {
        let mut rooms = self.rooms.write().expect("room directory lock poisoned");
        if let Some(members) = rooms.get_mut(&room_id) {
            let list = if who.is_player() {
                &mut members.players
            } else {
                &mut members.npcs
            };
            let before = list.len();
            list.retain(|c| c != who);
            if list.len() == before {
                tracing::debug!(room_id, who = %who, "leave for character not present");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> RoomDirectory {
        let dir = RoomDirectory::new();
        dir.register_room(1, "Town Square");
        dir
    }

    #[test]
    fn lookup_unknown_room_is_empty() {
        let dir = directory();
        let snap = dir.lookup(99);
        assert_eq!(snap.room_id, 99);
        assert!(snap.is_empty());
    }

    #[test]
    fn enter_then_lookup() {
        let dir = directory();
        dir.enter(1, Character::player(10, "Alice")).unwrap();
        dir.enter(1, Character::npc(1, "Goblin")).unwrap();

        let snap = dir.lookup(1);
        assert_eq!(snap.players, vec![Character::player(10, "Alice")]);
        assert_eq!(snap.npcs, vec![Character::npc(1, "Goblin")]);
    }

    #[test]
    fn enter_unknown_room_errors() {
        let dir = directory();
        let err = dir.enter(5, Character::player(1, "Bob")).unwrap_err();
        assert!(matches!(err, SpaceError::UnknownRoom(5)));
    }

    #[test]
    fn reenter_replaces_stale_copy() {
        let dir = directory();
        dir.enter(1, Character::player(10, "Alice")).unwrap();
        dir.enter(1, Character::player(10, "Alice the Bold")).unwrap();

        let snap = dir.lookup(1);
        assert_eq!(snap.players.len(), 1);
        assert_eq!(snap.players[0].name(), "Alice the Bold");
    }

    #[test]
    fn leave_removes_only_that_character() {
        let dir = directory();
        dir.enter(1, Character::npc(1, "Goblin")).unwrap();
        dir.enter(1, Character::npc(2, "Wolf")).unwrap();

        dir.leave(1, &Character::npc(1, "Goblin"));
        let snap = dir.lookup(1);
        assert_eq!(snap.npcs, vec![Character::npc(2, "Wolf")]);
    }

    #[test]
    fn leave_absent_character_is_quiet() {
        let dir = directory();
        dir.leave(1, &Character::player(3, "Ghost"));
        dir.leave(42, &Character::player(3, "Ghost"));
    }

    #[test]
    fn snapshot_is_detached_from_later_writes() {
        let dir = directory();
        dir.enter(1, Character::npc(1, "Goblin")).unwrap();
        let snap = dir.lookup(1);
        dir.leave(1, &Character::npc(1, "Goblin"));
        // The earlier read still shows the goblin; staleness is expected.
        assert_eq!(snap.npcs.len(), 1);
    }
}
