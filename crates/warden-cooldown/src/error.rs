//! Error types for the cooldown layer.

use std::fmt;

/// The two kinds of command limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    Cooldown,
    Warmup,
}

impl LimitKind {
    /// Capitalised name, for the start of a sentence.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Cooldown => "Cooldown",
            Self::Warmup => "Warmup",
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cooldown => "cooldown",
            Self::Warmup => "warmup",
        })
    }
}

/// Errors from the management operations (`/cooldown cancel`,
/// `/warmup cancel`).
#[derive(Debug, thiserror::Error)]
pub enum CooldownError {
    /// Nothing of that kind was tracked for the command.
    #[error("No {kind} for input {command}")]
    NoneActive { kind: LimitKind, command: String },
}
