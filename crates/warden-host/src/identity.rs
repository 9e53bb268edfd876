//! The key that every Warden session is stored under.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Reserved name of the console actor.
///
/// No player can hold this name on a real server (`#` is not a legal
/// name character), so it is safe to use as a sentinel in config files
/// and logs.
pub const CONSOLE_NAME: &str = "#console";

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Who a session belongs to: a connected player or the console.
///
/// Players are identified by their exact name. Equality and hashing are
/// by name, so two `Identity::player("Steve")` values always refer to the
/// same sessions.
///
/// The name is held in an `Arc<str>` so cloning an identity (which the
/// engines do constantly when collecting sweep decisions) is a pointer
/// copy rather than a string allocation.
///
/// On the wire and in config files an identity is a plain string:
/// `"Steve"` or `"#console"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Identity {
    /// The server console. Never disconnects, never reaped, never AFK.
    Console,
    /// A player, keyed by exact name.
    Player(Arc<str>),
}

impl Identity {
    /// Creates a player identity. A name equal to [`CONSOLE_NAME`] yields
    /// [`Identity::Console`].
    pub fn player(name: impl AsRef<str>) -> Self {
        let name = name.as_ref();
        if name == CONSOLE_NAME {
            Self::Console
        } else {
            Self::Player(Arc::from(name))
        }
    }

    /// The console identity.
    pub fn console() -> Self {
        Self::Console
    }

    /// Returns `true` for the console sentinel.
    pub fn is_console(&self) -> bool {
        matches!(self, Self::Console)
    }

    /// The display name: the player name, or [`CONSOLE_NAME`].
    pub fn name(&self) -> &str {
        match self {
            Self::Console => CONSOLE_NAME,
            Self::Player(name) => name.as_ref(),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for Identity {
    fn from(name: String) -> Self {
        Self::player(name)
    }
}

impl From<&str> for Identity {
    fn from(name: &str) -> Self {
        Self::player(name)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.name().to_owned()
    }
}
