use game_core::{SkillBook, SkillId};
use session::Mode;

/// A parsed line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Name entered at the login prompt.
    Login(String),
    Skills { all: bool },
    Channels,
    ChannelOn(String),
    ChannelOff(String),
    ChannelSend { channel: String, message: String },
    Cast { skill: SkillId, target: String },
    Help,
    Quit,
    /// Blank input; handled as a no-op.
    Noop,
    /// Anything no grammar accepted, carrying the original text so it can
    /// be echoed back verbatim. Never mutates state.
    BadParse(String),
}

/// Map one raw line to a typed command, using the grammar the current mode
/// selects.
pub fn parse(mode: Mode, line: &str, channels: &[String], book: &SkillBook) -> Command {
    let input = line.trim();
    if input.is_empty() {
        return Command::Noop;
    }
    match mode {
        Mode::Login => Command::Login(input.to_string()),
        Mode::Commands => parse_play(input, channels, book),
    }
}

fn parse_play(input: &str, channels: &[String], book: &SkillBook) -> Command {
    let bad = || Command::BadParse(input.to_string());

    let (first, rest) = match input.split_once(char::is_whitespace) {
        Some((first, rest)) => (first, rest.trim()),
        None => (input, ""),
    };
    let first_lower = first.to_lowercase();

    // Argument-free and fixed-shape commands match by literal prefix.
    match first_lower.as_str() {
        "skills" => {
            return match rest {
                "" => Command::Skills { all: false },
                "all" => Command::Skills { all: true },
                _ => bad(),
            };
        }
        "channels" => {
            let mut words = rest.split_whitespace();
            return match (words.next(), words.next(), words.next()) {
                (None, _, _) => Command::Channels,
                (Some("on"), Some(name), None) => Command::ChannelOn(name.to_lowercase()),
                (Some("off"), Some(name), None) => Command::ChannelOff(name.to_lowercase()),
                _ => bad(),
            };
        }
        "help" => return if rest.is_empty() { Command::Help } else { bad() },
        "quit" => return if rest.is_empty() { Command::Quit } else { bad() },
        _ => {}
    }

    // A leading channel name sends to that channel.
    if channels.iter().any(|c| c == &first_lower) {
        if rest.is_empty() {
            return bad();
        }
        return Command::ChannelSend {
            channel: first_lower,
            message: rest.to_string(),
        };
    }

    // Otherwise try skill keywords, in catalog declaration order.
    if let Some((skill, fragment)) = book.find_command(input) {
        return Command::Cast {
            skill: skill.id,
            target: fragment.to_string(),
        };
    }

    bad()
}
