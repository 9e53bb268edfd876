//! Per-command limits.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::command_name;

/// Limits for one command, in seconds (ticks). A missing value means no
/// limit of that kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandLimits {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooldown: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warmup: Option<u32>,
}

/// Configuration for the cooldown engine.
///
/// ```json
/// { "commands": { "home": { "cooldown": 30 }, "heal": { "warmup": 5 } } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CooldownConfig {
    pub commands: BTreeMap<String, CommandLimits>,
}

impl Default for CooldownConfig {
    fn default() -> Self {
        let both = CommandLimits {
            cooldown: Some(50),
            warmup: Some(50),
        };
        Self {
            commands: BTreeMap::from([
                (
                    "command-with-warmup".to_owned(),
                    CommandLimits {
                        warmup: Some(50),
                        ..CommandLimits::default()
                    },
                ),
                (
                    "command-with-cooldown".to_owned(),
                    CommandLimits {
                        cooldown: Some(50),
                        ..CommandLimits::default()
                    },
                ),
                ("command-with-warmup-and-cooldown".to_owned(), both),
            ]),
        }
    }
}

impl CooldownConfig {
    /// A config with no limits at all.
    pub fn empty() -> Self {
        Self {
            commands: BTreeMap::new(),
        }
    }

    /// Adds or replaces the limits for `command`.
    pub fn with_command(mut self, command: &str, limits: CommandLimits) -> Self {
        self.commands.insert(command_name(command), limits);
        self
    }

    /// Normalises command keys (leading `/` stripped, lowercased) so they
    /// match [`command_name`].
    pub fn validated(self) -> Self {
        Self {
            commands: self
                .commands
                .into_iter()
                .map(|(name, limits)| (command_name(&name), limits))
                .filter(|(name, _)| !name.is_empty())
                .collect(),
        }
    }

    pub fn cooldown_for(&self, command: &str) -> Option<u32> {
        self.commands.get(command).and_then(|limits| limits.cooldown)
    }

    pub fn warmup_for(&self, command: &str) -> Option<u32> {
        self.commands.get(command).and_then(|limits| limits.warmup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_sample_commands() {
        let config = CooldownConfig::default();
        assert_eq!(config.warmup_for("command-with-warmup"), Some(50));
        assert_eq!(config.cooldown_for("command-with-warmup"), None);
        assert_eq!(config.cooldown_for("command-with-cooldown"), Some(50));
        assert_eq!(config.cooldown_for("command-with-warmup-and-cooldown"), Some(50));
        assert_eq!(config.warmup_for("command-with-warmup-and-cooldown"), Some(50));
    }

    #[test]
    fn test_validated_normalises_keys() {
        let config: CooldownConfig =
            serde_json::from_str(r#"{ "commands": { "/Home": { "cooldown": 30 } } }"#).unwrap();

        let config = config.validated();

        assert_eq!(config.cooldown_for("home"), Some(30));
        assert_eq!(config.warmup_for("home"), None);
    }

    #[test]
    fn test_serialize_skips_missing_limits() {
        let config = CooldownConfig::empty().with_command(
            "heal",
            CommandLimits {
                warmup: Some(3),
                ..CommandLimits::default()
            },
        );

        let json = serde_json::to_string(&config).unwrap();

        assert_eq!(json, r#"{"commands":{"heal":{"warmup":3}}}"#);
    }
}
