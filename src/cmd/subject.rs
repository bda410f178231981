/*!
Subject enum for the `list` subcommand.

Variants:
  commands (runnable commands of the built-in command files)
  hooks    (registered hook targets)
*/

use std::fmt;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Subject {
    /// Runnable commands
    #[default]
    Commands,
    /// Registered hooks, by target key
    Hooks,
}

impl Subject {
    pub const fn variants() -> &'static [Subject] {
        &[Subject::Commands, Subject::Hooks]
    }

    /// Case-insensitive parser; singular forms accepted.
    pub fn from_str_ci(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "commands" | "command" => Some(Subject::Commands),
            "hooks" | "hook" => Some(Subject::Hooks),
            _ => None,
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Subject::Commands => "commands",
            Subject::Hooks => "hooks",
        })
    }
}

/* --------------------------------- Tests ---------------------------------- */

#[cfg(test)]
mod tests {
    use super::Subject;

    #[test]
    fn parse_case_insensitive() {
        assert_eq!(Subject::from_str_ci("COMMANDS"), Some(Subject::Commands));
        assert_eq!(Subject::from_str_ci(" hook "), Some(Subject::Hooks));
        assert_eq!(Subject::from_str_ci("tools"), None);
    }

    #[test]
    fn display_round_trips_through_parser() {
        for s in Subject::variants() {
            assert_eq!(Subject::from_str_ci(&s.to_string()), Some(*s));
        }
    }
}
