use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A reference to someone present in the world: an NPC or a player.
///
/// Identity is the variant plus the numeric id. Display names ride along
/// for formatting but never participate in equality, so a reference held
/// across a rename (or a stale room read) still compares correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Character {
    Npc { id: u64, name: String },
    Player { id: u64, name: String },
}

impl Character {
    pub fn npc(id: u64, name: impl Into<String>) -> Self {
        Self::Npc {
            id,
            name: name.into(),
        }
    }

    pub fn player(id: u64, name: impl Into<String>) -> Self {
        Self::Player {
            id,
            name: name.into(),
        }
    }

    pub fn id(&self) -> u64 {
        match self {
            Self::Npc { id, .. } | Self::Player { id, .. } => *id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Npc { name, .. } | Self::Player { name, .. } => name,
        }
    }

    pub fn is_npc(&self) -> bool {
        matches!(self, Self::Npc { .. })
    }

    pub fn is_player(&self) -> bool {
        matches!(self, Self::Player { .. })
    }
}

// Variant + id equality only; names are cosmetic.
impl PartialEq for Character {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Npc { id: a, .. }, Self::Npc { id: b, .. }) => a == b,
            (Self::Player { id: a, .. }, Self::Player { id: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl Eq for Character {}

impl Hash for Character {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        self.id().hash(state);
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn equality_is_variant_and_id() {
        let a = Character::npc(1, "Goblin");
        let b = Character::npc(1, "Renamed Goblin");
        let c = Character::npc(2, "Goblin");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn npc_and_player_never_equal() {
        let npc = Character::npc(7, "Seven");
        let player = Character::player(7, "Seven");
        assert_ne!(npc, player);
    }

    #[test]
    fn hash_matches_equality() {
        let mut set = HashSet::new();
        set.insert(Character::player(3, "Alice"));
        assert!(set.contains(&Character::player(3, "alice renamed")));
        assert!(!set.contains(&Character::npc(3, "Alice")));
    }

    #[test]
    fn display_is_name() {
        assert_eq!(Character::npc(1, "Goblin").to_string(), "Goblin");
    }

    #[test]
    fn serde_roundtrip() {
        let c = Character::player(42, "Alice");
        let json = serde_json::to_string(&c).unwrap();
        assert!(json.contains(r#""kind":"player""#));
        let back: Character = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
    }
}
