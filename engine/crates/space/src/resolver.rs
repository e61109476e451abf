use game_core::Character;

use crate::snapshot::RoomSnapshot;

/// Resolve a cast target against a room snapshot.
///
/// A non-empty `fragment` is matched case-insensitively as a substring of
/// occupant names, players before NPCs, first match wins. It takes
/// precedence over any stored target. An empty fragment re-resolves the
/// stored target's identity against the current snapshot, which is how a
/// target that left the room turns into `None` instead of a stale
/// reference.
pub fn resolve_target(
    snapshot: &RoomSnapshot,
    current: Option<&Character>,
    fragment: &str,
) -> Option<Character> {
    if fragment.is_empty() {
        return current.and_then(|c| snapshot.find(c)).cloned();
    }

    let needle = fragment.to_lowercase();
    snapshot
        .players
        .iter()
        .chain(snapshot.npcs.iter())
        .find(|c| c.name().to_lowercase().contains(&needle))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> RoomSnapshot {
        RoomSnapshot {
            room_id: 1,
            players: vec![
                Character::player(10, "Alice"),
                Character::player(11, "Goblinsbane"),
            ],
            npcs: vec![
                Character::npc(1, "Goblin Scout"),
                Character::npc(2, "Wolf"),
            ],
        }
    }

    #[test]
    fn fragment_matches_substring_case_insensitively() {
        let found = resolve_target(&snapshot(), None, "WOLF").unwrap();
        assert_eq!(found, Character::npc(2, ""));
    }

    #[test]
    fn players_are_searched_before_npcs() {
        // "goblin" appears in a player name and an NPC name; player wins.
        let found = resolve_target(&snapshot(), None, "goblin").unwrap();
        assert_eq!(found, Character::player(11, ""));
    }

    #[test]
    fn no_match_is_none() {
        assert!(resolve_target(&snapshot(), None, "dragon").is_none());
    }

    #[test]
    fn fragment_overrides_stored_target() {
        let stored = Character::npc(2, "Wolf");
        let found = resolve_target(&snapshot(), Some(&stored), "scout").unwrap();
        assert_eq!(found, Character::npc(1, ""));
    }

    #[test]
    fn empty_fragment_reresolves_stored_target() {
        let stored = Character::npc(2, "stale name");
        let found = resolve_target(&snapshot(), Some(&stored), "").unwrap();
        assert_eq!(found.name(), "Wolf");
    }

    #[test]
    fn stored_target_gone_is_none() {
        let stored = Character::npc(9, "Departed");
        assert!(resolve_target(&snapshot(), Some(&stored), "").is_none());
    }

    #[test]
    fn no_stored_target_and_no_fragment_is_none() {
        assert!(resolve_target(&snapshot(), None, "").is_none());
    }
}
