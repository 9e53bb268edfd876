//! The AFK state machine.
//!
//! Activity resets a player's idle clock ([`AfkMachine::update`]); the
//! tick ([`AfkMachine::sweep_now`]) looks at every connected player's idle
//! time and moves them between [`AfkState`]s.
//!
//! # Ownership of host flags
//!
//! Sleep-ignore and protection may also be set by other components (a
//! `/god` command, another plugin). The machine only turns a flag off if
//! it was the one that turned it on, and it records that in the session
//! (`sleep_ignored_by_us`, `protected_by_us`).

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};
use warden_host::{Host, Identity};
use warden_session::{SessionRecord, SessionRegistry, SessionStore};
use warden_tick::{Sweep, TickInfo};

use crate::{ActivityEvent, AfkConfig, AfkError, AfkSession, AfkState};

const NOW_AFK: &str = "You are now marked as AFK.";
const NO_LONGER_AFK: &str = "You are no longer marked as AFK.";

/// Idle minutes after which a player is kicked, given the server's
/// population. `None` when kicking is disabled (`kick_minutes == 0`).
///
/// The configured kick time applies on an empty server and shrinks as
/// the server fills up, down to a fifth of it on a full server, but never
/// below `afk_minutes + 2`.
///
/// ```rust
/// use warden_afk::kick_threshold_minutes;
///
/// assert_eq!(kick_threshold_minutes(3, 60, 20, 20), Some(12));
/// assert_eq!(kick_threshold_minutes(3, 60, 20, 0), Some(60));
/// assert_eq!(kick_threshold_minutes(3, 0, 20, 20), None);
/// ```
pub fn kick_threshold_minutes(
    afk_minutes: u64,
    kick_minutes: u64,
    max_players: usize,
    online: usize,
) -> Option<u64> {
    if kick_minutes < 1 {
        return None;
    }
    if max_players == 0 {
        return Some(kick_minutes.max(afk_minutes.saturating_add(2)));
    }

    let max = max_players as f64;
    let cur = online as f64;
    let fraction = ((max - cur) + max * 0.2) / max;
    let kick = kick_minutes as f64;
    let floor = afk_minutes.saturating_add(2) as f64;
    // Not `clamp`: the floor may exceed the configured kick time.
    Some(kick.min(kick * fraction).max(floor) as u64)
}

/// A kick decided during a sweep, issued once the sweep is over.
struct PendingKick {
    identity: Identity,
    idle: Duration,
}

/// AFK detection and auto-kick over a [`SessionStore<AfkSession>`].
pub struct AfkMachine<H: Host> {
    host: Arc<H>,
    store: Arc<SessionStore<AfkSession>>,
    config: RwLock<Arc<AfkConfig>>,
}

impl<H: Host> AfkMachine<H> {
    pub fn new(registry: &SessionRegistry, host: Arc<H>, config: AfkConfig) -> Self {
        Self {
            host,
            store: registry.store::<AfkSession>(),
            config: RwLock::new(Arc::new(config.validated())),
        }
    }

    /// Current configuration.
    pub fn config(&self) -> Arc<AfkConfig> {
        self.config.read().clone()
    }

    /// Swaps in a new configuration. Takes effect on the next sweep.
    pub fn reload(&self, config: AfkConfig) {
        *self.config.write() = Arc::new(config.validated());
        info!("afk config reloaded");
    }

    // -----------------------------------------------------------------------
    // Activity
    // -----------------------------------------------------------------------

    /// Records activity: resets the idle clock, drops any requested away
    /// status and gives back protection the machine granted.
    ///
    /// The AFK flag itself is cleared by the next sweep, which also
    /// restores the list name and sends the notice.
    pub fn update(&self, identity: &Identity) {
        if identity.is_console() {
            return;
        }
        let handle = self.store.get_or_create(identity);
        let mut session = handle.lock();

        session.last_activity = Instant::now();
        session.requested_status = None;
        if session.state == AfkState::KickPending {
            session.state = AfkState::Afk;
        }
        if session.protected_by_us {
            if self.host.has_protection(identity) {
                self.host.disable_protection(identity);
            }
            session.protected_by_us = false;
        }
    }

    /// Feeds an [`ActivityEvent`]. Returns `true` if it counted as
    /// activity.
    pub fn record(&self, identity: &Identity, event: &ActivityEvent) -> bool {
        let counts = event.counts(&self.config());
        if counts {
            self.update(identity);
        }
        counts
    }

    /// `/afk [status]`: marks the player as away until their next
    /// activity. They are flagged AFK on the next sweep.
    ///
    /// # Errors
    /// [`AfkError::NotAPlayer`] for the console.
    pub fn set_away(&self, identity: &Identity, status: Option<&str>) -> Result<(), AfkError> {
        if identity.is_console() {
            return Err(AfkError::NotAPlayer(identity.clone()));
        }

        let status = match status.map(str::trim) {
            None | Some("null") => "",
            Some(text) => text,
        };
        self.store.get_or_create(identity).lock().requested_status = Some(status.to_owned());

        let reply = if status.is_empty() {
            "Set as away.".to_owned()
        } else {
            format!("Set away status to \"{status}\".")
        };
        self.host.send_message(identity, &reply);
        debug!(%identity, status, "away requested");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Away status text of an AFK player (empty if they gave none).
    /// `None` if the player is not AFK.
    pub fn away_status(&self, identity: &Identity) -> Option<String> {
        let handle = self.store.get(identity)?;
        let session = handle.lock();
        if session.state == AfkState::Active {
            return None;
        }
        Some(session.requested_status.clone().unwrap_or_default())
    }

    pub fn is_afk(&self, identity: &Identity) -> bool {
        self.store
            .get(identity)
            .is_some_and(|handle| handle.lock().state != AfkState::Active)
    }

    /// Whether the player has been idle past the current kick threshold.
    pub fn should_kick(&self, identity: &Identity) -> bool {
        let Some(threshold) = self.kick_threshold() else {
            return false;
        };
        let now = Instant::now();
        self.store
            .get(identity)
            .is_some_and(|handle| handle.lock().idle_for(now) >= threshold)
    }

    /// Whether the player may be excluded from the sleep check right now.
    pub fn can_ignore_sleep(&self, identity: &Identity) -> bool {
        let config = self.config();
        self.policy_inputs(identity, &config)
            .is_some_and(|(requested, passed)| config.allows_sleep_ignore(requested, passed))
    }

    /// Whether the player may be protected right now. Hosts also use this
    /// to cancel mobs targeting the player.
    pub fn can_protect(&self, identity: &Identity) -> bool {
        let config = self.config();
        self.policy_inputs(identity, &config)
            .is_some_and(|(requested, passed)| config.allows_protection(requested, passed))
    }

    /// Current kick threshold from live population, `None` if kicking is
    /// disabled.
    pub fn kick_threshold(&self) -> Option<Duration> {
        let config = self.config();
        kick_threshold_minutes(
            config.afk_minutes,
            config.afk_kick_minutes,
            self.host.max_players(),
            self.host.online_count(),
        )
        .map(|minutes| Duration::from_secs(minutes.saturating_mul(60)))
    }

    /// `(requested, idle past afk threshold)` for a known player.
    fn policy_inputs(&self, identity: &Identity, config: &AfkConfig) -> Option<(bool, bool)> {
        let handle = self.store.get(identity)?;
        let session = handle.lock();
        let passed = session.idle_for(Instant::now()) >= config.afk_after();
        Some((session.is_requested(), passed))
    }

    // -----------------------------------------------------------------------
    // Sweep
    // -----------------------------------------------------------------------

    /// Runs one AFK pass over every connected player.
    ///
    /// Kicks are collected while iterating and issued afterwards, with no
    /// session lock held. Returns the number of players kicked.
    pub fn sweep_now(&self) -> usize {
        let now = Instant::now();
        let config = self.config();
        let afk_after = config.afk_after();
        let kick_after = self.kick_threshold();
        let mut kicks = Vec::new();

        for (identity, handle) in self.store.all() {
            if identity.is_console() {
                continue;
            }
            let mut session = handle.lock();
            if !session.lifecycle().is_connected() || session.state == AfkState::KickPending {
                continue;
            }

            let idle = session.idle_for(now);
            let passed = idle >= afk_after;
            let requested = session.is_requested();

            if requested || passed {
                if kick_after.is_some_and(|threshold| idle >= threshold) {
                    self.restore_sleep(&identity, &mut session);
                    session.state = AfkState::KickPending;
                    kicks.push(PendingKick { identity, idle });
                    continue;
                }

                if session.state == AfkState::Active {
                    let name = config.idle_display_name(identity.name());
                    self.host.set_display_name(&identity, Some(&name));
                    session.state = AfkState::Afk;
                    self.host.send_message(&identity, NOW_AFK);
                    info!(%identity, idle_secs = idle.as_secs(), requested, "player is afk");
                }

                if config.allows_sleep_ignore(requested, passed)
                    && !self.host.is_sleep_ignored(&identity)
                {
                    self.host.set_sleep_ignored(&identity, true);
                    session.sleep_ignored_by_us = true;
                }
                if config.allows_protection(requested, passed)
                    && !self.host.has_protection(&identity)
                {
                    self.host.enable_protection(&identity);
                    session.protected_by_us = true;
                }
            } else if session.state == AfkState::Afk {
                self.host.set_display_name(&identity, None);
                self.restore_sleep(&identity, &mut session);
                if session.protected_by_us {
                    self.host.disable_protection(&identity);
                    session.protected_by_us = false;
                }
                session.state = AfkState::Active;
                self.host.send_message(&identity, NO_LONGER_AFK);
                info!(%identity, "player is no longer afk");
            }
        }

        let kicked = kicks.len();
        for PendingKick { identity, idle } in kicks {
            let minutes = idle.as_secs() / 60;
            info!(%identity, minutes, "kicking idle player");
            self.host.kick(&identity, &format!("Inactivity - {minutes} Minutes"));
        }
        kicked
    }

    fn restore_sleep(&self, identity: &Identity, session: &mut AfkSession) {
        if session.sleep_ignored_by_us {
            self.host.set_sleep_ignored(identity, false);
            session.sleep_ignored_by_us = false;
        }
    }
}

impl<H: Host> Sweep for AfkMachine<H> {
    fn name(&self) -> &'static str {
        "afk"
    }

    fn sweep(&self, _tick: &TickInfo) {
        self.sweep_now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kick_threshold_full_server_is_twelve() {
        assert_eq!(kick_threshold_minutes(3, 60, 20, 20), Some(12));
    }

    #[test]
    fn test_kick_threshold_empty_server_is_configured_time() {
        assert_eq!(kick_threshold_minutes(3, 60, 20, 0), Some(60));
    }

    #[test]
    fn test_kick_threshold_half_full_server() {
        // ((20 - 10) + 4) / 20 = 0.7 → 42
        assert_eq!(kick_threshold_minutes(3, 60, 20, 10), Some(42));
    }

    #[test]
    fn test_kick_threshold_floor_is_afk_plus_two() {
        assert_eq!(kick_threshold_minutes(3, 10, 20, 20), Some(5));
        // Floor wins even over a tiny configured kick time.
        assert_eq!(kick_threshold_minutes(3, 1, 20, 0), Some(5));
    }

    #[test]
    fn test_kick_threshold_disabled_below_one() {
        assert_eq!(kick_threshold_minutes(3, 0, 20, 5), None);
    }

    #[test]
    fn test_kick_threshold_zero_slots_uses_full_time() {
        assert_eq!(kick_threshold_minutes(3, 60, 0, 0), Some(60));
    }

    #[test]
    fn test_kick_threshold_huge_minutes_do_not_overflow() {
        assert_eq!(kick_threshold_minutes(u64::MAX, 60, 20, 20), Some(u64::MAX));
        assert_eq!(kick_threshold_minutes(3, u64::MAX, 0, 0), Some(u64::MAX));
    }

    #[test]
    fn test_kick_threshold_truncates() {
        // ((7 - 1) + 1.4) / 7 ≈ 1.057 → min(60, 63.4) = 60
        assert_eq!(kick_threshold_minutes(3, 60, 7, 1), Some(60));
        // ((7 - 6) + 1.4) / 7 ≈ 0.343 → 20.57 → 20
        assert_eq!(kick_threshold_minutes(3, 60, 7, 6), Some(20));
    }
}
