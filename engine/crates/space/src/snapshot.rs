use game_core::Character;

/// Point-in-time view of a room's occupants.
///
/// Snapshots are copies taken from the room authority; by the time a
/// snapshot is acted on, anyone in it may have left. Callers treat absence
/// as an ordinary "not found", never a fault.
#[derive(Debug, Clone, Default)]
pub struct RoomSnapshot {
    pub room_id: u64,
    pub players: Vec<Character>,
    pub npcs: Vec<Character>,
}

impl RoomSnapshot {
    pub fn empty(room_id: u64) -> Self {
        Self {
            room_id,
            players: Vec::new(),
            npcs: Vec::new(),
        }
    }

    /// Re-find a previously resolved character in this snapshot, by
    /// variant + id equality. Returns the snapshot's own copy so the
    /// caller picks up the current display name.
    pub fn find(&self, who: &Character) -> Option<&Character> {
        match who {
            Character::Player { .. } => self.players.iter().find(|c| *c == who),
            Character::Npc { .. } => self.npcs.iter().find(|c| *c == who),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty() && self.npcs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_matches_variant_and_id() {
        let snapshot = RoomSnapshot {
            room_id: 1,
            players: vec![Character::player(10, "Alice")],
            npcs: vec![Character::npc(10, "Goblin")],
        };

        let found = snapshot.find(&Character::npc(10, "whatever")).unwrap();
        assert_eq!(found.name(), "Goblin");

        let found = snapshot.find(&Character::player(10, "")).unwrap();
        assert_eq!(found.name(), "Alice");
    }

    #[test]
    fn find_misses_absent_character() {
        let snapshot = RoomSnapshot::empty(1);
        assert!(snapshot.find(&Character::npc(2, "Wolf")).is_none());
    }
}
