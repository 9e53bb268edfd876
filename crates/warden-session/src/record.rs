//! Session records: the data every per-player state type shares.
//!
//! A "session" here is not a network connection. It is a typed bag of
//! transient state (AFK timers, cooldown counters, last message
//! recipient) that outlives brief disconnects. Each record tracks:
//! - WHETHER its owner is currently connected
//! - WHEN it was last touched (creation or disconnect)
//! - HOW LONG it may linger after the owner leaves (`MAX_AGE`)

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for the session layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// How often (in seconds) the reaper sweeps for stale sessions.
    ///
    /// Default: 60 seconds. Set to 0 to disable reaping.
    pub reap_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reap_interval_secs: 60,
        }
    }
}

impl SessionConfig {
    /// The reap interval as a `Duration` (zero disables the reaper).
    pub fn reap_interval(&self) -> Duration {
        Duration::from_secs(self.reap_interval_secs)
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Whether the owner of a record is present.
///
/// ```text
///   Connected ──(disconnect)──→ Disconnected ──(reaper, once stale)──→ removed
///       ↑                            │
///       └────────(reconnect)─────────┘
/// ```
///
/// Records start out `Connected`: they are created on first access, and
/// the first access always comes from the actor itself (a join, a chat
/// line, a command).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connected,
    Disconnected { since: Instant },
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Connection state and staleness clock embedded in every record.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    state: SessionState,
    last_update: Instant,
}

impl Lifecycle {
    pub fn new(now: Instant) -> Self {
        Self {
            state: SessionState::Connected,
            last_update: now,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.state, SessionState::Connected)
    }

    /// Creation time, or the instant of the most recent disconnect.
    pub fn last_update(&self) -> Instant {
        self.last_update
    }

    /// How long it has been since [`last_update`](Self::last_update).
    pub fn gone_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_update)
    }

    pub(crate) fn disconnect(&mut self, now: Instant) {
        self.state = SessionState::Disconnected { since: now };
        self.last_update = now;
    }

    /// Marks the owner present again and returns how long they were away
    /// (zero if they never left).
    pub(crate) fn reconnect(&mut self, now: Instant) -> Duration {
        let away = match self.state {
            SessionState::Disconnected { since } => {
                now.saturating_duration_since(since)
            }
            SessionState::Connected => Duration::ZERO,
        };
        self.state = SessionState::Connected;
        away
    }
}

// ---------------------------------------------------------------------------
// SessionRecord
// ---------------------------------------------------------------------------

/// A typed per-identity state record stored in a
/// [`SessionStore`](crate::SessionStore).
///
/// Implementors embed a [`Lifecycle`] and expose it; the store drives it
/// on connect/disconnect and the reaper reads it.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use tokio::time::Instant;
/// use warden_session::{Lifecycle, SessionRecord};
///
/// struct MuteSession {
///     lifecycle: Lifecycle,
///     muted: bool,
/// }
///
/// impl SessionRecord for MuteSession {
///     const KIND: &'static str = "mute";
///     const MAX_AGE: Duration = Duration::from_secs(3600);
///
///     fn create(now: Instant) -> Self {
///         Self { lifecycle: Lifecycle::new(now), muted: false }
///     }
///
///     fn lifecycle(&self) -> &Lifecycle {
///         &self.lifecycle
///     }
///
///     fn lifecycle_mut(&mut self) -> &mut Lifecycle {
///         &mut self.lifecycle
///     }
/// }
/// ```
pub trait SessionRecord: Send + 'static {
    /// Short name used in logs ("afk", "cooldown", ...).
    const KIND: &'static str;

    /// How long the record survives after its owner disconnects.
    const MAX_AGE: Duration;

    /// Builds a fresh record. Called at most once per identity.
    fn create(now: Instant) -> Self;

    fn lifecycle(&self) -> &Lifecycle;

    fn lifecycle_mut(&mut self) -> &mut Lifecycle;

    /// Hook run after the owner disconnects.
    fn on_disconnect(&mut self) {}

    /// Hook run after the owner reconnects, with the time they were away.
    fn on_reconnect(&mut self, _away: Duration) {}

    /// `now − last_update < MAX_AGE`.
    fn is_recent(&self, now: Instant) -> bool {
        self.lifecycle().gone_for(now) < Self::MAX_AGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_new_is_connected() {
        let lifecycle = Lifecycle::new(Instant::now());
        assert!(lifecycle.is_connected());
    }

    #[test]
    fn test_lifecycle_disconnect_stamps_last_update() {
        let start = Instant::now();
        let mut lifecycle = Lifecycle::new(start);
        let later = start + Duration::from_secs(5);

        lifecycle.disconnect(later);

        assert_eq!(lifecycle.last_update(), later);
        assert_eq!(
            lifecycle.state(),
            SessionState::Disconnected { since: later }
        );
    }

    #[test]
    fn test_lifecycle_reconnect_reports_time_away() {
        let start = Instant::now();
        let mut lifecycle = Lifecycle::new(start);
        lifecycle.disconnect(start + Duration::from_secs(10));

        let away = lifecycle.reconnect(start + Duration::from_secs(40));

        assert_eq!(away, Duration::from_secs(30));
        assert!(lifecycle.is_connected());
    }

    #[test]
    fn test_lifecycle_reconnect_when_connected_is_zero() {
        let start = Instant::now();
        let mut lifecycle = Lifecycle::new(start);

        assert_eq!(lifecycle.reconnect(start), Duration::ZERO);
    }

    #[test]
    fn test_session_config_default() {
        let config = SessionConfig::default();
        assert_eq!(config.reap_interval(), Duration::from_secs(60));
    }

    #[test]
    fn test_session_config_zero_disables_reaping() {
        let config: SessionConfig = serde_json::from_str(r#"{ "reap_interval_secs": 0 }"#).unwrap();
        assert!(config.reap_interval().is_zero());
    }
}
