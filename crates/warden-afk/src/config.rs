//! AFK thresholds and policy toggles.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Configuration for the AFK state machine.
///
/// The `*_sleep_ignored` and `*_protection` toggles come in pairs:
/// `general_*` applies to players who went idle on their own,
/// `command_*` to players who asked to be away with `/afk`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AfkConfig {
    /// Idle minutes before a player is marked AFK.
    pub afk_minutes: u64,
    /// Idle minutes before an AFK player is kicked on an empty server.
    /// The effective threshold shrinks as the server fills up.
    /// 0 disables kicking.
    pub afk_kick_minutes: u64,
    pub general_sleep_ignored: bool,
    pub command_sleep_ignored: bool,
    pub general_protection: bool,
    pub command_protection: bool,
    /// Whether movement counts as activity at all.
    pub use_movement_event: bool,
    /// Squared horizontal distance a move must exceed to count.
    pub movement_threshold: f64,
    /// Same, while sneaking.
    pub sneak_movement_threshold: f64,
    /// Prepended to the list name of AFK players.
    pub idle_name_prefix: String,
    /// The player name is truncated to this many characters before the
    /// prefix is added.
    pub idle_name_max_chars: usize,
}

impl Default for AfkConfig {
    fn default() -> Self {
        Self {
            afk_minutes: 3,
            afk_kick_minutes: 60,
            general_sleep_ignored: true,
            command_sleep_ignored: false,
            general_protection: true,
            command_protection: false,
            use_movement_event: true,
            movement_threshold: 0.04,
            sneak_movement_threshold: 0.004,
            idle_name_prefix: "§7".to_owned(),
            idle_name_max_chars: 14,
        }
    }
}

impl AfkConfig {
    /// Upper bound for `afk_minutes` and `afk_kick_minutes` (one year).
    pub const MAX_MINUTES: u64 = 365 * 24 * 60;

    /// Clamp out-of-range values.
    ///
    /// - `afk_minutes` raised to at least 1.
    /// - `afk_minutes` and `afk_kick_minutes` capped at [`MAX_MINUTES`](Self::MAX_MINUTES).
    /// - Negative or NaN movement thresholds reset to their defaults.
    pub fn validated(mut self) -> Self {
        if self.afk_minutes == 0 {
            warn!("afk_minutes is 0 — clamping to 1");
            self.afk_minutes = 1;
        }
        if self.afk_minutes > Self::MAX_MINUTES {
            warn!(value = self.afk_minutes, max = Self::MAX_MINUTES, "afk_minutes too large — clamping");
            self.afk_minutes = Self::MAX_MINUTES;
        }
        if self.afk_kick_minutes > Self::MAX_MINUTES {
            warn!(
                value = self.afk_kick_minutes,
                max = Self::MAX_MINUTES,
                "afk_kick_minutes too large — clamping"
            );
            self.afk_kick_minutes = Self::MAX_MINUTES;
        }
        let defaults = Self::default();
        if !(self.movement_threshold >= 0.0) {
            warn!(value = self.movement_threshold, "invalid movement_threshold — using default");
            self.movement_threshold = defaults.movement_threshold;
        }
        if !(self.sneak_movement_threshold >= 0.0) {
            warn!(
                value = self.sneak_movement_threshold,
                "invalid sneak_movement_threshold — using default"
            );
            self.sneak_movement_threshold = defaults.sneak_movement_threshold;
        }
        self
    }

    pub fn afk_after(&self) -> Duration {
        Duration::from_secs(self.afk_minutes.saturating_mul(60))
    }

    /// List name shown while `name` is AFK.
    pub fn idle_display_name(&self, name: &str) -> String {
        let short: String = name.chars().take(self.idle_name_max_chars).collect();
        format!("{}{short}", self.idle_name_prefix)
    }

    /// Whether an AFK player may be excluded from the sleep check.
    pub(crate) fn allows_sleep_ignore(&self, requested: bool, idle_passed: bool) -> bool {
        (requested && self.command_sleep_ignored) || (idle_passed && self.general_sleep_ignored)
    }

    /// Whether an AFK player may be put in protective mode.
    pub(crate) fn allows_protection(&self, requested: bool, idle_passed: bool) -> bool {
        (requested && self.command_protection) || (idle_passed && self.general_protection)
    }
}
