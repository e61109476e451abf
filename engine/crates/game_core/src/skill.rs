use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::effect::Effect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SkillId(pub u32);

/// Immutable skill definition. Loaded once at startup, read-only during play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
    /// Keyword players type to cast the skill.
    pub command: String,
    /// Minimum character level.
    pub level: i64,
    /// Skill point cost per cast.
    pub points: i64,
    pub cooldown_ms: u64,
    pub effects: Vec<Effect>,
}

impl Skill {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

/// The full skill catalog, in declaration order.
///
/// Declaration order is load-bearing: command matching scans front to back
/// and the first keyword match wins, so catalogs that share prefixes must
/// list the intended winner first.
#[derive(Debug, Clone, Default)]
pub struct SkillBook {
    skills: Vec<Skill>,
}

impl SkillBook {
    pub fn new(mut skills: Vec<Skill>) -> Self {
        // Keywords are matched lowercased, so store them that way.
        for skill in &mut skills {
            skill.command.make_ascii_lowercase();
        }
        Self { skills }
    }

    pub fn get(&self, id: SkillId) -> Option<&Skill> {
        self.skills.iter().find(|s| s.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Skill> {
        self.skills.iter()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Match `input` against skill command keywords, first declaration wins.
    ///
    /// The keyword must be the whole input or be followed by a space; the
    /// remainder (trimmed) is returned as the target fragment. Matching is
    /// case-insensitive.
    pub fn find_command<'a>(&self, input: &'a str) -> Option<(&Skill, &'a str)> {
        for skill in &self.skills {
            let keyword = skill.command.as_str();
            if input.len() < keyword.len() || !input.is_char_boundary(keyword.len()) {
                continue;
            }
            if !input[..keyword.len()].eq_ignore_ascii_case(keyword) {
                continue;
            }
            let rest = &input[keyword.len()..];
            if rest.is_empty() {
                return Some((skill, ""));
            }
            if rest.starts_with(' ') {
                return Some((skill, rest.trim()));
            }
        }
        None
    }

    /// Built-in catalog used when no data file is configured.
    pub fn builtin() -> Self {
        use crate::effect::Magnitude;
        use crate::stats::StatKind;

        Self::new(vec![
            Skill {
                id: SkillId(1),
                name: "Slash".to_string(),
                command: "slash".to_string(),
                level: 1,
                points: 2,
                cooldown_ms: 500,
                effects: vec![Effect::Damage {
                    amount: Magnitude::PercentOfStat {
                        stat: StatKind::Strength,
                        percent: 70,
                    },
                }],
            },
            Skill {
                id: SkillId(2),
                name: "Mend".to_string(),
                command: "mend".to_string(),
                level: 1,
                points: 3,
                cooldown_ms: 2_000,
                effects: vec![Effect::Heal {
                    amount: Magnitude::PercentOfStat {
                        stat: StatKind::Wisdom,
                        percent: 100,
                    },
                }],
            },
            Skill {
                id: SkillId(3),
                name: "Crushing Blow".to_string(),
                command: "crush".to_string(),
                level: 3,
                points: 5,
                cooldown_ms: 4_000,
                effects: vec![Effect::Damage {
                    amount: Magnitude::PercentOfStat {
                        stat: StatKind::Strength,
                        percent: 150,
                    },
                }],
            },
            Skill {
                id: SkillId(4),
                name: "War Cry".to_string(),
                command: "warcry".to_string(),
                level: 5,
                points: 4,
                cooldown_ms: 10_000,
                effects: vec![Effect::Boost {
                    stat: StatKind::Strength,
                    amount: Magnitude::Flat(3),
                }],
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::Magnitude;

    fn skill(id: u32, command: &str) -> Skill {
        Skill {
            id: SkillId(id),
            name: command.to_string(),
            command: command.to_string(),
            level: 1,
            points: 1,
            cooldown_ms: 0,
            effects: vec![Effect::Damage {
                amount: Magnitude::Flat(1),
            }],
        }
    }

    #[test]
    fn exact_keyword_matches_with_empty_fragment() {
        let book = SkillBook::new(vec![skill(1, "slash")]);
        let (found, fragment) = book.find_command("slash").unwrap();
        assert_eq!(found.id, SkillId(1));
        assert_eq!(fragment, "");
    }

    #[test]
    fn keyword_with_suffix_yields_target_fragment() {
        let book = SkillBook::new(vec![skill(1, "slash")]);
        let (found, fragment) = book.find_command("slash goblin").unwrap();
        assert_eq!(found.id, SkillId(1));
        assert_eq!(fragment, "goblin");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let book = SkillBook::new(vec![skill(1, "slash")]);
        assert!(book.find_command("SLASH Goblin").is_some());
    }

    #[test]
    fn keyword_must_end_at_token_boundary() {
        let book = SkillBook::new(vec![skill(1, "slash")]);
        assert!(book.find_command("slashing wildly").is_none());
    }

    #[test]
    fn first_declared_wins_on_shared_prefix() {
        // "cure" declared before "cure all": declaration order is the tiebreak.
        let book = SkillBook::new(vec![skill(1, "cure"), skill(2, "cure all")]);
        let (found, fragment) = book.find_command("cure all").unwrap();
        assert_eq!(found.id, SkillId(1));
        assert_eq!(fragment, "all");
    }

    #[test]
    fn no_match_for_unknown_keyword() {
        let book = SkillBook::new(vec![skill(1, "slash")]);
        assert!(book.find_command("dance").is_none());
    }

    #[test]
    fn builtin_catalog_ids_are_unique() {
        let book = SkillBook::builtin();
        let mut ids: Vec<_> = book.iter().map(|s| s.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), book.len());
    }
}
