use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use chat::{ChannelBus, JoinReply, LeaveReply, SendReply};
use game_core::{Character, EffectDelta, Save, SkillBook, SkillId};
use net::Socket;
use observability::SessionMetrics;
use player_store::PlayerStore;
use session::{ActorRegistry, Mode, Session, SessionHandle, SessionId, SessionMsg};
use skills::{CastContext, CastRefusal};
use space::RoomRegistry;
use tokio::sync::mpsc;

use crate::dispatcher::{self, Command};
use crate::hint::{self, HintKey};

const HELP_TEXT: &str = "\
Commands:
  skills               list skills you know
  skills all           list every skill
  <skill> [target]     use a skill, e.g. \"slash goblin\"
  channels             list channels
  channels on <name>   join a channel
  channels off <name>  leave a channel
  <channel> <text>     talk on a channel
  quit                 save and leave";

// The cooldown gate requires strictly more than the window to have
// elapsed, so the advisory wake-up sleeps a touch past it.
const COOLDOWN_NOTICE_PAD: Duration = Duration::from_millis(25);

/// Shared collaborators every session actor works against. Handles only;
/// no session ever touches another session's state through these.
pub struct World {
    pub book: Arc<SkillBook>,
    pub rooms: Arc<dyn RoomRegistry>,
    pub bus: Arc<RwLock<ChannelBus>>,
    pub registry: Arc<ActorRegistry>,
    pub store: Arc<dyn PlayerStore>,
    pub start_room: u64,
    /// Zero disables skill point regeneration.
    pub regen_interval: Duration,
}

/// Start a session actor and its timers; returns the mailbox handle.
pub fn spawn_session(id: SessionId, socket: Socket, world: Arc<World>) -> SessionHandle {
    let (tx, rx) = mpsc::unbounded_channel();

    if !world.regen_interval.is_zero() {
        let regen_tx = tx.clone();
        let interval = world.regen_interval;
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                if regen_tx.send(SessionMsg::Regen).is_err() {
                    break;
                }
            }
        });
    }

    let self_handle = tx.clone();
    tokio::spawn(run_session(Session::new(id), socket, world, self_handle, rx));
    tx
}

enum Step {
    Next(Session),
    Stop,
}

/// The actor loop: one message at a time, to completion, against a state
/// value that each handler consumes and replaces wholesale.
async fn run_session(
    mut session: Session,
    socket: Socket,
    world: Arc<World>,
    self_handle: SessionHandle,
    mut mailbox: mpsc::UnboundedReceiver<SessionMsg>,
) {
    let mut metrics = SessionMetrics::new(session.id.0);
    socket.echo("Welcome to Ashfall.\nWhat is your name?");

    while let Some(msg) = mailbox.recv().await {
        match handle_message(session, msg, &socket, &world, &self_handle, &mut metrics) {
            Step::Next(next) => session = next,
            Step::Stop => return,
        }
    }
}

fn handle_message(
    mut session: Session,
    msg: SessionMsg,
    socket: &Socket,
    world: &Arc<World>,
    self_handle: &SessionHandle,
    metrics: &mut SessionMetrics,
) -> Step {
    match msg {
        SessionMsg::Input(line) => {
            metrics.commands += 1;
            handle_input(session, &line, socket, world, self_handle, metrics)
        }
        SessionMsg::Effects {
            from,
            skill,
            deltas,
            ..
        } => {
            apply_effects(&mut session, &from, &skill, &deltas, socket);
            Step::Next(session)
        }
        SessionMsg::CooldownReady(id) => {
            notice_cooldown_ready(&session, id, socket, world);
            Step::Next(session)
        }
        SessionMsg::Regen => {
            if session.mode == Mode::Commands {
                session.save.stats.regen_skill_points(1);
            }
            Step::Next(session)
        }
        SessionMsg::Disconnect => {
            finish_session(session, world, metrics);
            Step::Stop
        }
    }
}

fn handle_input(
    session: Session,
    line: &str,
    socket: &Socket,
    world: &Arc<World>,
    self_handle: &SessionHandle,
    metrics: &mut SessionMetrics,
) -> Step {
    let channel_names = {
        let bus = world.bus.read().expect("channel bus lock poisoned");
        bus.names()
    };

    match dispatcher::parse(session.mode, line, &channel_names, &world.book) {
        Command::Noop => Step::Next(session),
        Command::Login(name) => handle_login(session, &name, socket, world, self_handle),
        Command::BadParse(original) => {
            socket.echo(format!("I don't know what \"{}\" means.", original));
            if let Some(h) = hint::gate(&session.save, HintKey::UnknownCommand, "") {
                socket.echo(h);
            }
            Step::Next(session)
        }
        Command::Help => {
            socket.echo(HELP_TEXT);
            Step::Next(session)
        }
        Command::Quit => {
            socket.disconnect("Goodbye!");
            finish_session(session, world, metrics);
            Step::Stop
        }
        Command::Skills { all } => {
            socket.echo(render_skills(&session, &world.book, all));
            Step::Next(session)
        }
        Command::Channels => {
            let bus = world.bus.read().expect("channel bus lock poisoned");
            let mut lines = vec!["Channels:".to_string()];
            for name in bus.names() {
                let marker = if bus.is_subscribed(&name, session.id) {
                    " (joined)"
                } else {
                    ""
                };
                lines.push(format!("  {}{}", name, marker));
            }
            socket.echo(lines.join("\n"));
            Step::Next(session)
        }
        Command::ChannelOn(name) => handle_channel_on(session, &name, socket, world),
        Command::ChannelOff(name) => handle_channel_off(session, &name, socket, world),
        Command::ChannelSend { channel, message } => {
            handle_channel_send(session, &channel, &message, socket, world, metrics)
        }
        Command::Cast { skill, target } => {
            metrics.casts += 1;
            handle_cast(session, skill, &target, socket, world, self_handle)
        }
    }
}

/// Derive a stable player id from a character name (FNV-1a).
pub fn player_id(name: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    name.trim()
        .to_lowercase()
        .bytes()
        .fold(OFFSET, |hash, byte| (hash ^ byte as u64).wrapping_mul(PRIME))
}

fn handle_login(
    mut session: Session,
    name: &str,
    socket: &Socket,
    world: &Arc<World>,
    self_handle: &SessionHandle,
) -> Step {
    let mut save = match world.store.load(name) {
        Ok(Some(save)) => save,
        Ok(None) => Save::starting(player_id(name), world.start_room),
        Err(e) => {
            tracing::warn!(name, "failed to load save: {}", e);
            socket.echo("That name cannot be used here. Try another:");
            return Step::Next(session);
        }
    };

    let player = Character::player(save.user_id, name);
    if world.registry.contains(&player) {
        socket.echo("That character is already in the world. Try another name:");
        return Step::Next(session);
    }

    if world.rooms.enter(save.room_id, player.clone()).is_err() {
        // The saved room disappeared between sessions; start over.
        save.room_id = world.start_room;
        if let Err(e) = world.rooms.enter(save.room_id, player.clone()) {
            tracing::warn!("start room unavailable: {}", e);
        }
    }

    {
        let mut bus = world.bus.write().expect("channel bus lock poisoned");
        for channel in &save.channels {
            let _ = bus.join(channel, session.id, socket.clone());
        }
    }
    world.registry.register(player.clone(), self_handle.clone());

    socket.echo(format!("Welcome, {}!", player));
    let snapshot = world.rooms.lookup(save.room_id);
    let others: Vec<&str> = snapshot
        .players
        .iter()
        .filter(|c| **c != player)
        .chain(snapshot.npcs.iter())
        .map(|c| c.name())
        .collect();
    if !others.is_empty() {
        socket.echo(format!("Also here: {}.", others.join(", ")));
    }
    socket.echo("Type \"help\" for commands.");
    tracing::info!(session_id = session.id.0, player = %player, "player logged in");

    session.mode = Mode::Commands;
    session.player = Some(player);
    session.save = save;
    Step::Next(session)
}

fn handle_cast(
    mut session: Session,
    skill_id: SkillId,
    fragment: &str,
    socket: &Socket,
    world: &Arc<World>,
    self_handle: &SessionHandle,
) -> Step {
    let Some(player) = session.player.clone() else {
        return Step::Next(session);
    };
    let Some(skill) = world.book.get(skill_id) else {
        tracing::warn!(?skill_id, "cast routed for unknown skill id");
        return Step::Next(session);
    };

    let snapshot = world.rooms.lookup(session.save.room_id);
    let resolution = skills::cast(
        skill,
        fragment,
        CastContext {
            save: &mut session.save,
            target: &mut session.target,
            cooldowns: &mut session.cooldowns,
            snapshot: &snapshot,
            now: Instant::now(),
        },
    );

    for line in &resolution.echoes {
        socket.echo(line.clone());
    }

    match resolution.outcome {
        Ok(success) => {
            // The target applies the deltas in its own actor; delivery to a
            // character that just vanished simply goes nowhere.
            let delivered = world.registry.deliver(
                &success.target,
                SessionMsg::Effects {
                    to: success.target.clone(),
                    from: player,
                    skill: success.skill_name,
                    deltas: success.deltas,
                },
            );
            if !delivered {
                tracing::debug!(target = %success.target, "effects dropped: no live actor");
            }

            if !success.cooldown.is_zero() {
                let notify = self_handle.clone();
                let sleep_for = success.cooldown + COOLDOWN_NOTICE_PAD;
                tokio::spawn(async move {
                    tokio::time::sleep(sleep_for).await;
                    let _ = notify.send(SessionMsg::CooldownReady(skill_id));
                });
            }
        }
        Err(CastRefusal::CooldownActive { remaining }) => {
            if let Some(h) = hint::gate(
                &session.save,
                HintKey::CooldownRemaining,
                &hint::format_remaining(remaining),
            ) {
                socket.echo(h);
            }
        }
        Err(_) => {}
    }

    Step::Next(session)
}

fn handle_channel_on(
    mut session: Session,
    name: &str,
    socket: &Socket,
    world: &Arc<World>,
) -> Step {
    let reply = {
        let mut bus = world.bus.write().expect("channel bus lock poisoned");
        bus.join(name, session.id, socket.clone())
    };
    match reply {
        JoinReply::Joined => {
            session.save.channels.insert(name.to_string());
            socket.echo(format!("You join [{}].", name));
        }
        JoinReply::AlreadyJoined => {
            socket.echo("You are already part of this channel.");
        }
        JoinReply::NoSuchChannel => {
            socket.echo(format!("There is no channel called \"{}\".", name));
        }
    }
    Step::Next(session)
}

fn handle_channel_off(
    mut session: Session,
    name: &str,
    socket: &Socket,
    world: &Arc<World>,
) -> Step {
    let reply = {
        let mut bus = world.bus.write().expect("channel bus lock poisoned");
        bus.leave(name, session.id)
    };
    match reply {
        LeaveReply::Left => {
            session.save.channels.remove(name);
            socket.echo(format!("You leave [{}].", name));
        }
        LeaveReply::NotJoined => {
            socket.echo("You are not part of that channel.");
        }
        LeaveReply::NoSuchChannel => {
            socket.echo(format!("There is no channel called \"{}\".", name));
        }
    }
    Step::Next(session)
}

fn handle_channel_send(
    session: Session,
    channel: &str,
    message: &str,
    socket: &Socket,
    world: &Arc<World>,
    metrics: &mut SessionMetrics,
) -> Step {
    let sender = session
        .player
        .as_ref()
        .map(|p| p.name().to_string())
        .unwrap_or_default();
    let reply = {
        let bus = world.bus.read().expect("channel bus lock poisoned");
        bus.send(channel, session.id, &sender, message)
    };
    match reply {
        SendReply::Sent => metrics.broadcasts += 1,
        SendReply::NotJoined => socket.echo("You are not part of this channel."),
        SendReply::NoSuchChannel => {
            socket.echo(format!("There is no channel called \"{}\".", channel));
        }
    }
    Step::Next(session)
}

fn apply_effects(
    session: &mut Session,
    from: &Character,
    skill: &str,
    deltas: &[EffectDelta],
    socket: &Socket,
) {
    if session.mode != Mode::Commands {
        return;
    }
    for delta in deltas {
        session.save.stats.apply(delta);
        match delta {
            EffectDelta::Damage(n) => {
                socket.echo(format!("{}'s {} hits you for {}.", from, skill, n));
            }
            EffectDelta::Heal(n) => {
                socket.echo(format!("{}'s {} restores {} health.", from, skill, n));
            }
            EffectDelta::Boost { stat, amount } => {
                socket.echo(format!(
                    "{}'s {} changes your {} by {}.",
                    from, skill, stat, amount
                ));
            }
        }
    }
    if session.save.stats.health == 0 {
        socket.echo("You collapse... and wake up whole again.");
        session.save.stats.health = session.save.stats.max_health;
        tracing::info!(session_id = session.id.0, from = %from, "player defeated and revived");
    }
}

fn notice_cooldown_ready(session: &Session, id: SkillId, socket: &Socket, world: &Arc<World>) {
    if session.mode != Mode::Commands {
        return;
    }
    let Some(skill) = world.book.get(id) else {
        return;
    };
    // The timer is only a wake-up; the tracker decides. A cast re-armed
    // after this timer was scheduled leaves the notice silently dropped.
    if session.cooldowns.is_ready(skill, Instant::now()) {
        socket.echo(format!("{} is ready again.", skill.name));
    }
}

fn render_skills(session: &Session, book: &SkillBook, all: bool) -> String {
    let stats = &session.save.stats;
    let mut out = format!(
        "Skill points: {}/{}",
        stats.skill_points, stats.max_skill_points
    );
    for skill in book.iter() {
        let known = session.save.knows(skill.id);
        if !known && !all {
            continue;
        }
        out.push_str(&format!(
            "\n  {:<10} {} ({} SP, {} cooldown)",
            skill.command,
            skill.name,
            skill.points,
            hint::format_remaining(skill.cooldown()),
        ));
        if !known {
            out.push_str(" [not learned]");
        } else if skill.level > session.save.level {
            out.push_str(&format!(" [requires level {}]", skill.level));
        }
    }
    out
}

fn finish_session(session: Session, world: &Arc<World>, metrics: &SessionMetrics) {
    if let Some(player) = &session.player {
        world.rooms.leave(session.save.room_id, player);
        {
            let mut bus = world.bus.write().expect("channel bus lock poisoned");
            bus.leave_all(session.id);
        }
        world.registry.unregister(player);
        if let Err(e) = world.store.save(player.name(), &session.save) {
            tracing::warn!(player = %player, "failed to persist save: {}", e);
        }
        tracing::info!(session_id = session.id.0, player = %player, "player left the world");
    }
    metrics.log();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_id_is_stable_and_case_insensitive() {
        assert_eq!(player_id("Alice"), player_id("alice"));
        assert_eq!(player_id(" alice "), player_id("alice"));
        assert_ne!(player_id("alice"), player_id("bob"));
    }

    #[test]
    fn render_skills_shows_points_and_filters_unknown() {
        let mut session = Session::new(SessionId(1));
        session.save = Save::starting(1, 1);
        session.save.stats.skill_points = 8;
        let book = SkillBook::builtin();

        let known_only = render_skills(&session, &book, false);
        assert!(known_only.contains("Skill points: 8/10"));
        assert!(known_only.contains("Slash"));
        assert!(!known_only.contains("Crushing Blow"));

        let all = render_skills(&session, &book, true);
        assert!(all.contains("Crushing Blow"));
        assert!(all.contains("[not learned]"));
    }

    #[test]
    fn render_skills_marks_underleveled_known_skills() {
        let mut session = Session::new(SessionId(1));
        session.save = Save::starting(1, 1);
        session.save.known_skills.insert(SkillId(3)); // requires level 3
        let book = SkillBook::builtin();

        let out = render_skills(&session, &book, false);
        assert!(out.contains("[requires level 3]"));
    }
}
