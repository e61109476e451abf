use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::effect::Effect;
use crate::skill::SkillId;
use crate::stats::CharacterStats;

/// Player-tunable toggles carried in the save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub hints: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self { hints: true }
    }
}

/// An equipped item contributing passive effects to casts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquippedItem {
    pub name: String,
    #[serde(default)]
    pub passives: Vec<Effect>,
}

/// The persisted snapshot of a character: everything a session needs to
/// restore a player, and everything the store writes back on disconnect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Save {
    pub user_id: u64,
    pub level: i64,
    pub room_id: u64,
    pub stats: CharacterStats,
    pub known_skills: BTreeSet<SkillId>,
    pub channels: BTreeSet<String>,
    pub equipment: Vec<EquippedItem>,
    pub prefs: Preferences,
    /// Successful casts per skill, for progression bookkeeping.
    pub skill_usage: BTreeMap<SkillId, u32>,
}

impl Default for Save {
    fn default() -> Self {
        Self {
            user_id: 0,
            level: 1,
            room_id: 0,
            stats: CharacterStats::default(),
            known_skills: BTreeSet::new(),
            channels: BTreeSet::new(),
            equipment: Vec::new(),
            prefs: Preferences::default(),
            skill_usage: BTreeMap::new(),
        }
    }
}

impl Save {
    /// A fresh level-1 character placed in `room_id`.
    pub fn starting(user_id: u64, room_id: u64) -> Self {
        Self {
            user_id,
            room_id,
            known_skills: BTreeSet::from([SkillId(1), SkillId(2)]),
            ..Self::default()
        }
    }

    pub fn knows(&self, id: SkillId) -> bool {
        self.known_skills.contains(&id)
    }

    /// All passive effects contributed by currently equipped items.
    pub fn passive_effects(&self) -> Vec<Effect> {
        self.equipment
            .iter()
            .flat_map(|item| item.passives.iter().cloned())
            .collect()
    }

    pub fn record_skill_use(&mut self, id: SkillId) {
        *self.skill_usage.entry(id).or_insert(0) += 1;
    }
}
