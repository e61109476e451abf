use std::time::{Duration, Instant};

use game_core::{
    effect, Character, CooldownState, CooldownTracker, Effect, EffectDelta, Save, Skill,
};
use space::{resolve_target, RoomSnapshot};

/// Everything a cast reads and may mutate, borrowed from the owning
/// session. The session actor is the only execution context constructing
/// one of these, so no locking happens here.
pub struct CastContext<'a> {
    pub save: &'a mut Save,
    pub target: &'a mut Option<Character>,
    pub cooldowns: &'a mut CooldownTracker,
    pub snapshot: &'a RoomSnapshot,
    pub now: Instant,
}

/// A check that stopped the cast. All of these are terminal, non-fatal,
/// and leave skill points and cooldowns untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CastRefusal {
    NotKnown,
    LevelTooLow { required: i64 },
    TargetNotFound,
    CooldownActive { remaining: Duration },
    InsufficientPoints { needed: i64 },
}

/// A cast that went through: what to deliver, to whom, and when the skill
/// comes off cooldown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastSuccess {
    pub skill_name: String,
    pub target: Character,
    pub deltas: Vec<EffectDelta>,
    pub cooldown: Duration,
}

/// Result of running the full cast pipeline: the lines to echo at the
/// caster, plus the outcome. Target-switch echoes appear even when the
/// cast is later refused.
#[derive(Debug)]
pub struct CastResolution {
    pub echoes: Vec<String>,
    pub outcome: Result<CastSuccess, CastRefusal>,
}

impl CastResolution {
    fn refused(echoes: Vec<String>, refusal: CastRefusal) -> Self {
        Self {
            echoes,
            outcome: Err(refusal),
        }
    }
}

/// Item passives may only scale effect kinds the skill itself declares;
/// they never add new kinds. Order: passives first, then the skill's own
/// effects, with undeclared kinds filtered out.
pub fn compose_effects(passives: &[Effect], skill_effects: &[Effect]) -> Vec<Effect> {
    let declared: Vec<_> = skill_effects.iter().map(Effect::kind).collect();
    passives
        .iter()
        .filter(|e| declared.contains(&e.kind()))
        .chain(skill_effects.iter())
        .cloned()
        .collect()
}

/// Run the cast pipeline for one already-looked-up skill.
///
/// Check order is part of the game's observable behavior: known, level,
/// target, cooldown, payment. In particular the level check runs before
/// the cooldown check, so an under-leveled cast never reveals cooldown
/// state.
pub fn cast(skill: &Skill, fragment: &str, ctx: CastContext<'_>) -> CastResolution {
    let mut echoes = Vec::new();

    if !ctx.save.knows(skill.id) {
        echoes.push(format!("You do not know {}.", skill.name));
        return CastResolution::refused(echoes, CastRefusal::NotKnown);
    }

    if skill.level > ctx.save.level {
        echoes.push(format!(
            "You must be level {} to use {}.",
            skill.level, skill.name
        ));
        return CastResolution::refused(
            echoes,
            CastRefusal::LevelTooLow {
                required: skill.level,
            },
        );
    }

    // An explicit fragment always wins over the stored target.
    let resolved = resolve_target(ctx.snapshot, ctx.target.as_ref(), fragment);
    let Some(target) = resolved else {
        echoes.push(if fragment.is_empty() {
            "You don't have a target in sight.".to_string()
        } else {
            format!("You don't see \"{}\" here.", fragment)
        });
        return CastResolution::refused(echoes, CastRefusal::TargetNotFound);
    };

    // Visible side effect even if a later check refuses the cast.
    if ctx.target.as_ref() != Some(&target) {
        echoes.push(format!("You are now targeting {}.", target));
        *ctx.target = Some(target.clone());
    }

    if let CooldownState::Cooling { remaining } = ctx.cooldowns.check(skill, ctx.now) {
        echoes.push(format!("{} is not ready yet.", skill.name));
        return CastResolution::refused(echoes, CastRefusal::CooldownActive { remaining });
    }

    if !ctx.save.stats.spend_skill_points(skill.points) {
        echoes.push(format!(
            "You don't have enough skill points to use {}.",
            skill.name
        ));
        return CastResolution::refused(
            echoes,
            CastRefusal::InsufficientPoints {
                needed: skill.points,
            },
        );
    }

    let composed = compose_effects(&ctx.save.passive_effects(), &skill.effects);
    let deltas = effect::resolve(&ctx.save.stats, &composed);

    ctx.cooldowns.record(skill.id, ctx.now);
    ctx.save.record_skill_use(skill.id);
    echoes.push(format!("You use {} on {}.", skill.name, target));

    tracing::debug!(skill = %skill.name, target = %target, "cast applied");

    CastResolution {
        echoes,
        outcome: Ok(CastSuccess {
            skill_name: skill.name.clone(),
            target,
            deltas,
            cooldown: skill.cooldown(),
        }),
    }
}
