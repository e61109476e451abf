use game_core::Save;

/// Supplementary help moments the engine can decorate with an extra line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintKey {
    /// A cast was refused on cooldown; context is the remaining time.
    CooldownRemaining,
    /// Input parsed to nothing recognizable.
    UnknownCommand,
}

/// Conditionally produce a hint line. Purely cosmetic: whether a hint is
/// emitted never affects cast correctness, and players can switch them off
/// in their save preferences.
pub fn gate(save: &Save, key: HintKey, context: &str) -> Option<String> {
    if !save.prefs.hints {
        return None;
    }
    let text = match key {
        HintKey::CooldownRemaining => format!("(hint: ready again in {})", context),
        HintKey::UnknownCommand => "(hint: type \"help\" for commands)".to_string(),
    };
    Some(text)
}

/// Render a duration the way players read it: tenths of a second.
pub fn format_remaining(remaining: std::time::Duration) -> String {
    format!("{:.1}s", remaining.as_secs_f64())
}
