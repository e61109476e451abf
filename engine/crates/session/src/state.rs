use game_core::{Character, CooldownTracker, EffectDelta, Save, SkillId};

use crate::SessionId;

/// What the session's command grammar is currently parsing for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Waiting for a character name.
    Login,
    /// Normal play.
    Commands,
}

/// Everything an actor may find in its mailbox.
///
/// Cross-session interaction happens only through these messages; delivery
/// is at-most-once and best effort: sends to a terminated actor fail
/// silently on the sender's side.
#[derive(Debug)]
pub enum SessionMsg {
    /// A line of player input.
    Input(String),
    /// Effects cast at `to` by another character's session.
    Effects {
        to: Character,
        from: Character,
        skill: String,
        deltas: Vec<EffectDelta>,
    },
    /// Advisory wake-up: a cooldown window may have elapsed. The handler
    /// re-checks the tracker rather than trusting the timer.
    CooldownReady(SkillId),
    /// Periodic skill point regeneration tick.
    Regen,
    /// Connection closed or server shutting down.
    Disconnect,
}

/// Live state of one connected player, exclusively owned by its actor.
///
/// Handlers consume the value and return the replacement, so every message
/// applies a whole-state transition rather than an in-place diff.
#[derive(Debug)]
pub struct Session {
    pub id: SessionId,
    pub mode: Mode,
    /// Set once login completes.
    pub player: Option<Character>,
    pub save: Save,
    pub target: Option<Character>,
    pub cooldowns: CooldownTracker,
}

impl Session {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            mode: Mode::Login,
            player: None,
            save: Save::default(),
            target: None,
            cooldowns: CooldownTracker::new(),
        }
    }
}
