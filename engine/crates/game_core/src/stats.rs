use std::fmt;

use serde::{Deserialize, Serialize};

use crate::effect::EffectDelta;

/// Stats a magnitude or boost can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Health,
    SkillPoints,
    Strength,
    Wisdom,
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatKind::Health => write!(f, "health"),
            StatKind::SkillPoints => write!(f, "skill points"),
            StatKind::Strength => write!(f, "strength"),
            StatKind::Wisdom => write!(f, "wisdom"),
        }
    }
}

/// Live numeric state of a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterStats {
    pub health: i64,
    pub max_health: i64,
    pub skill_points: i64,
    pub max_skill_points: i64,
    pub strength: i64,
    pub wisdom: i64,
}

impl Default for CharacterStats {
    fn default() -> Self {
        Self {
            health: 50,
            max_health: 50,
            skill_points: 10,
            max_skill_points: 10,
            strength: 10,
            wisdom: 10,
        }
    }
}

impl CharacterStats {
    pub fn value_of(&self, stat: StatKind) -> i64 {
        match stat {
            StatKind::Health => self.health,
            StatKind::SkillPoints => self.skill_points,
            StatKind::Strength => self.strength,
            StatKind::Wisdom => self.wisdom,
        }
    }

    /// Deduct `cost` skill points, all or nothing. Returns false and leaves
    /// the stats untouched when the balance is insufficient.
    pub fn spend_skill_points(&mut self, cost: i64) -> bool {
        if cost > self.skill_points {
            return false;
        }
        self.skill_points -= cost;
        true
    }

    /// Restore skill points up to the maximum.
    pub fn regen_skill_points(&mut self, amount: i64) {
        self.skill_points = (self.skill_points + amount).min(self.max_skill_points);
    }

    /// Apply one concrete delta. Health clamps into `0..=max_health`.
    pub fn apply(&mut self, delta: &EffectDelta) {
        match delta {
            EffectDelta::Damage(amount) => {
                self.health = (self.health - amount).max(0);
            }
            EffectDelta::Heal(amount) => {
                self.health = (self.health + amount).min(self.max_health);
            }
            EffectDelta::Boost { stat, amount } => match stat {
                StatKind::Health => {
                    self.max_health += amount;
                    self.health = (self.health + amount).clamp(0, self.max_health);
                }
                StatKind::SkillPoints => {
                    self.skill_points =
                        (self.skill_points + amount).clamp(0, self.max_skill_points);
                }
                StatKind::Strength => self.strength += amount,
                StatKind::Wisdom => self.wisdom += amount,
            },
        }
    }
}
