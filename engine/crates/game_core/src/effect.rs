use serde::{Deserialize, Serialize};

use crate::stats::{CharacterStats, StatKind};

/// Symbolic size of an effect, resolved against caster stats at cast time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Magnitude {
    Flat(i64),
    PercentOfStat { stat: StatKind, percent: i64 },
}

/// Abstract effect descriptor, as declared by a skill or an item passive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Effect {
    Damage { amount: Magnitude },
    Heal { amount: Magnitude },
    Boost { stat: StatKind, amount: Magnitude },
}

/// Discriminant used when composing item passives with skill effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Damage,
    Heal,
    Boost,
}

impl Effect {
    pub fn kind(&self) -> EffectKind {
        match self {
            Effect::Damage { .. } => EffectKind::Damage,
            Effect::Heal { .. } => EffectKind::Heal,
            Effect::Boost { .. } => EffectKind::Boost,
        }
    }
}

/// Concrete numeric outcome of one effect descriptor. Lives in actor
/// messages only, so it carries no serde representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectDelta {
    Damage(i64),
    Heal(i64),
    Boost { stat: StatKind, amount: i64 },
}

fn magnitude_value(stats: &CharacterStats, magnitude: &Magnitude) -> i64 {
    match magnitude {
        Magnitude::Flat(amount) => *amount,
        Magnitude::PercentOfStat { stat, percent } => stats.value_of(*stat) * percent / 100,
    }
}

/// Resolve abstract effects into fixed deltas using the caster's stats as
/// they are right now. The returned deltas are plain numbers; later stat
/// changes never alter them.
pub fn resolve(stats: &CharacterStats, effects: &[Effect]) -> Vec<EffectDelta> {
    effects
        .iter()
        .map(|effect| match effect {
            Effect::Damage { amount } => EffectDelta::Damage(magnitude_value(stats, amount)),
            Effect::Heal { amount } => EffectDelta::Heal(magnitude_value(stats, amount)),
            Effect::Boost { stat, amount } => EffectDelta::Boost {
                stat: *stat,
                amount: magnitude_value(stats, amount),
            },
        })
        .collect()
}
