//! The per-player AFK record.

use std::time::Duration;

use tokio::time::Instant;
use warden_session::{Lifecycle, SessionRecord};

/// Where a player is in the AFK cycle.
///
/// ```text
///              idle ≥ afk, or /afk          idle ≥ kick threshold
///   Active ─────────────────────────→ Afk ─────────────────────→ KickPending
///     ↑                                │                              │
///     └──── activity, then a tick ─────┘                              │
///                                      ↑                              │
///                                      └──── activity or reconnect ───┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AfkState {
    #[default]
    Active,
    Afk,
    /// A kick has been decided. Sweeps leave the record alone so the kick
    /// is issued once.
    KickPending,
}

/// AFK bookkeeping for one player.
#[derive(Debug)]
pub struct AfkSession {
    lifecycle: Lifecycle,
    pub(crate) last_activity: Instant,
    /// `Some` while the player asked to be away; the text may be empty.
    pub(crate) requested_status: Option<String>,
    pub(crate) state: AfkState,
    /// We turned on sleep-ignore and must turn it off again.
    pub(crate) sleep_ignored_by_us: bool,
    /// We turned on protection and must turn it off again.
    pub(crate) protected_by_us: bool,
}

impl AfkSession {
    pub fn state(&self) -> AfkState {
        self.state
    }

    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    pub fn requested_status(&self) -> Option<&str> {
        self.requested_status.as_deref()
    }

    pub fn is_requested(&self) -> bool {
        self.requested_status.is_some()
    }

    pub fn sleep_ignored_by_us(&self) -> bool {
        self.sleep_ignored_by_us
    }

    pub fn protected_by_us(&self) -> bool {
        self.protected_by_us
    }

    pub(crate) fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_activity)
    }
}

impl SessionRecord for AfkSession {
    const KIND: &'static str = "afk";
    const MAX_AGE: Duration = Duration::from_secs(30 * 60);

    fn create(now: Instant) -> Self {
        Self {
            lifecycle: Lifecycle::new(now),
            last_activity: now,
            requested_status: None,
            state: AfkState::Active,
            sleep_ignored_by_us: false,
            protected_by_us: false,
        }
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    // Ownership flags survive: the host may keep sleep-ignore, protection
    // and the list name across a relog, and only the machine may clear
    // what it set. A pending kick drops back to Afk so the next sweep
    // restores the player.
    fn on_reconnect(&mut self, _away: Duration) {
        self.last_activity = Instant::now();
        if self.state == AfkState::KickPending {
            self.state = AfkState::Afk;
        }
    }
}
