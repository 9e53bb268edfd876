//! The per-player cooldown record.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;
use warden_session::{Lifecycle, SessionRecord};

/// A command held back by its warmup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingWarmup {
    /// Ticks counted so far.
    pub(crate) elapsed: u32,
    /// The full line to replay, without the leading `/`.
    pub(crate) command_line: String,
}

/// Cooldown and warmup counters for one player, keyed by command name.
#[derive(Debug)]
pub struct CooldownState {
    lifecycle: Lifecycle,
    pub(crate) cooldowns: HashMap<String, u32>,
    pub(crate) warmups: HashMap<String, PendingWarmup>,
}

impl CooldownState {
    /// Ticks counted for `command`'s cooldown, if one is tracked.
    pub fn cooldown_elapsed(&self, command: &str) -> Option<u32> {
        self.cooldowns.get(command).copied()
    }

    /// Ticks counted for `command`'s warmup, if one is pending.
    pub fn warmup_elapsed(&self, command: &str) -> Option<u32> {
        self.warmups.get(command).map(|warmup| warmup.elapsed)
    }

    /// Whether nothing is tracked for this player.
    pub fn is_idle(&self) -> bool {
        self.cooldowns.is_empty() && self.warmups.is_empty()
    }
}

impl SessionRecord for CooldownState {
    const KIND: &'static str = "cooldown";
    const MAX_AGE: Duration = Duration::from_secs(30 * 60);

    fn create(now: Instant) -> Self {
        Self {
            lifecycle: Lifecycle::new(now),
            cooldowns: HashMap::new(),
            warmups: HashMap::new(),
        }
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }
}
