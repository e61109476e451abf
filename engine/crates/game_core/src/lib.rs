pub mod character;
pub mod cooldown;
pub mod effect;
pub mod save;
pub mod skill;
pub mod stats;

pub use character::Character;
pub use cooldown::{CooldownState, CooldownTracker};
pub use effect::{Effect, EffectDelta, EffectKind, Magnitude};
pub use save::{EquippedItem, Preferences, Save};
pub use skill::{Skill, SkillBook, SkillId};
pub use stats::{CharacterStats, StatKind};
