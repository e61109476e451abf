use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::skill::{Skill, SkillId};

/// Gate decision for one skill at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownState {
    Ready,
    Cooling { remaining: Duration },
}

/// Last-use timestamps per skill, one tracker per session.
///
/// This map is the authority on cooldown gating. Deferred "ready again"
/// wake-ups are advisory and must re-check here before trusting their own
/// firing.
#[derive(Debug, Default)]
pub struct CooldownTracker {
    last_used: BTreeMap<SkillId, Instant>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A skill is ready once strictly more than its cooldown has elapsed
    /// since the recorded last use. No record means ready.
    pub fn check(&self, skill: &Skill, now: Instant) -> CooldownState {
        match self.last_used.get(&skill.id) {
            None => CooldownState::Ready,
            Some(&used_at) => {
                let elapsed = now.saturating_duration_since(used_at);
                if elapsed > skill.cooldown() {
                    CooldownState::Ready
                } else {
                    CooldownState::Cooling {
                        remaining: skill.cooldown() - elapsed,
                    }
                }
            }
        }
    }

    pub fn is_ready(&self, skill: &Skill, now: Instant) -> bool {
        self.check(skill, now) == CooldownState::Ready
    }

    pub fn record(&mut self, id: SkillId, now: Instant) {
        self.last_used.insert(id, now);
    }

    pub fn last_used(&self, id: SkillId) -> Option<Instant> {
        self.last_used.get(&id).copied()
    }
}
