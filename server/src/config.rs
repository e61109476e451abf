use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use game_core::{Skill, SkillBook};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetConfig {
    pub listen_addr: String,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:4000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameSection {
    pub start_room: u64,
    /// Seconds between skill point regeneration ticks; 0 disables.
    pub regen_interval_secs: u64,
    pub skills_file: String,
}

impl Default for GameSection {
    fn default() -> Self {
        Self {
            start_room: 1,
            regen_interval_secs: 8,
            skills_file: "data/skills.toml".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChatSection {
    pub channels: Vec<String>,
}

impl Default for ChatSection {
    fn default() -> Self {
        Self {
            channels: vec!["gossip".to_string(), "trade".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PersistSection {
    pub save_dir: String,
}

impl Default for PersistSection {
    fn default() -> Self {
        Self {
            save_dir: "data/players".to_string(),
        }
    }
}

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub net: NetConfig,
    pub game: GameSection,
    pub chat: ChatSection,
    pub persistence: PersistSection,
}

impl ServerConfig {
    /// Load configuration from an optional TOML file path.
    pub fn load(config_path: Option<&str>) -> Result<Self, Box<dyn std::error::Error>> {
        let config = match config_path {
            Some(path) if Path::new(path).exists() => {
                let content = std::fs::read_to_string(path)?;
                toml::from_str(&content)?
            }
            _ => Self::default(),
        };
        Ok(config)
    }

    pub fn regen_interval(&self) -> Duration {
        Duration::from_secs(self.game.regen_interval_secs)
    }
}

/// Parse CLI arguments and load config.
/// Supports: --config <path>
pub fn parse_cli_args() -> ServerConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<&str> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                if let Some(val) = args.get(i + 1) {
                    config_path = Some(val.as_str());
                    i += 2;
                } else {
                    eprintln!("--config requires a path argument");
                    std::process::exit(1);
                }
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                std::process::exit(1);
            }
        }
    }

    match ServerConfig::load(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    }
}

#[derive(Debug, Deserialize)]
struct SkillCatalog {
    skills: Vec<Skill>,
}

/// Load the skill catalog, falling back to the built-in set when the file
/// is absent or malformed. A broken data file should degrade, not prevent
/// the server from coming up.
pub fn load_skill_book(path: &str) -> SkillBook {
    if !Path::new(path).exists() {
        tracing::info!(path, "no skill catalog file, using built-in skills");
        return SkillBook::builtin();
    }
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str::<SkillCatalog>(&content) {
            Ok(catalog) => {
                tracing::info!(path, count = catalog.skills.len(), "skill catalog loaded");
                SkillBook::new(catalog.skills)
            }
            Err(e) => {
                tracing::warn!(path, "bad skill catalog, using built-in skills: {}", e);
                SkillBook::builtin()
            }
        },
        Err(e) => {
            tracing::warn!(path, "unreadable skill catalog, using built-in skills: {}", e);
            SkillBook::builtin()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_config_values() {
        let config = ServerConfig::default();
        assert_eq!(config.net.listen_addr, "0.0.0.0:4000");
        assert_eq!(config.game.start_room, 1);
        assert_eq!(config.game.regen_interval_secs, 8);
        assert_eq!(config.chat.channels, vec!["gossip", "trade"]);
        assert_eq!(config.persistence.save_dir, "data/players");
    }

    #[test]
    fn load_nonexistent_file_returns_defaults() {
        let config = ServerConfig::load(Some("/tmp/nonexistent_config_98765.toml")).unwrap();
        assert_eq!(config.game.start_room, 1);
    }

    #[test]
    fn load_partial_toml_keeps_other_defaults() {
        let mut f = NamedTempFile::new().unwrap();
        write!(
            f,
            r#"
[game]
regen_interval_secs = 0

[chat]
channels = ["gossip", "trade", "newbie"]
"#
        )
        .unwrap();

        let config = ServerConfig::load(Some(f.path().to_str().unwrap())).unwrap();
        assert_eq!(config.game.regen_interval_secs, 0);
        assert_eq!(config.chat.channels.len(), 3);
        assert_eq!(config.net.listen_addr, "0.0.0.0:4000");
    }

    #[test]
    fn missing_skill_file_falls_back_to_builtin() {
        let book = load_skill_book("/tmp/no_such_skills_12345.toml");
        assert!(!book.is_empty());
        assert!(book.find_command("slash").is_some());
    }

    #[test]
    fn skill_catalog_parses_from_toml() {
        let mut f = NamedTempFile::new().unwrap();
        write!(
            f,
            r#"
[[skills]]
id = 7
name = "Jab"
command = "jab"
level = 1
points = 1
cooldown_ms = 250

[[skills.effects]]
op = "damage"
amount = {{ flat = 3 }}
"#
        )
        .unwrap();

        let book = load_skill_book(f.path().to_str().unwrap());
        assert_eq!(book.len(), 1);
        let (skill, _) = book.find_command("jab").unwrap();
        assert_eq!(skill.name, "Jab");
        assert_eq!(skill.cooldown_ms, 250);
    }

    #[test]
    fn broken_skill_catalog_falls_back_to_builtin() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "this is not toml [[[").unwrap();

        let book = load_skill_book(f.path().to_str().unwrap());
        assert!(book.find_command("slash").is_some());
    }
}
