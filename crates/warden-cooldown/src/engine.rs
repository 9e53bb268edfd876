//! The cooldown/warmup engine.
//!
//! # Counters
//!
//! ```text
//! cooldown:  refused ─ tick ─ tick ─ … ─ (elapsed ≥ required) ─ next use passes, counter removed
//! warmup:    held ─ tick ─ tick ─ … ─ (elapsed = required) ─ replayed once, record removed
//! ```
//!
//! Every admission check runs under the player's session lock, so two
//! commands racing for the same player see a consistent counter. Warmup
//! replays are collected during the sweep and dispatched after all locks
//! are released: the host may run the replayed command on this thread and
//! call back into the engine.

use std::collections::hash_map::Entry;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};
use warden_host::{Host, Identity};
use warden_session::{SessionRecord, SessionRegistry, SessionStore};
use warden_tick::{Sweep, TickInfo};

use crate::state::PendingWarmup;
use crate::{
    CooldownConfig, CooldownError, CooldownState, LimitKind, command_line, command_name,
    format_remaining,
};

/// Permission node prefix that bypasses a command's cooldown.
const COOLDOWN_OVERRIDE: &str = "warden.cooldown.override.";
/// Permission node prefix that bypasses a command's warmup.
const WARMUP_OVERRIDE: &str = "warden.warmup.override.";

/// A warmup that completed during a sweep.
struct Firing {
    identity: Identity,
    command_line: String,
}

/// Admission gates and tick counters over a [`SessionStore<CooldownState>`].
pub struct CooldownEngine<H: Host> {
    host: Arc<H>,
    store: Arc<SessionStore<CooldownState>>,
    config: RwLock<Arc<CooldownConfig>>,
}

impl<H: Host> CooldownEngine<H> {
    pub fn new(registry: &SessionRegistry, host: Arc<H>, config: CooldownConfig) -> Self {
        Self {
            host,
            store: registry.store::<CooldownState>(),
            config: RwLock::new(Arc::new(config.validated())),
        }
    }

    pub fn config(&self) -> Arc<CooldownConfig> {
        self.config.read().clone()
    }

    /// Swaps in a new configuration. Counters for commands that lost
    /// their limit are pruned on the next sweep.
    pub fn reload(&self, config: CooldownConfig) {
        let config = config.validated();
        info!(commands = config.commands.len(), "cooldown config reloaded");
        *self.config.write() = Arc::new(config);
    }

    // -----------------------------------------------------------------------
    // Admission
    // -----------------------------------------------------------------------

    /// Cooldown then warmup; stops at the first gate that refuses.
    pub fn admit(&self, identity: &Identity, raw: &str) -> bool {
        self.check_cooldown(identity, raw) && self.check_warmup(identity, raw)
    }

    /// Returns `true` if `raw`'s command is off cooldown for `identity`.
    ///
    /// The first use of a limited command starts the counter and is
    /// refused. Once enough ticks have passed (or with the override
    /// permission) the use passes and the counter is removed.
    pub fn check_cooldown(&self, identity: &Identity, raw: &str) -> bool {
        let command = command_name(raw);
        let Some(required) = self.config().cooldown_for(&command) else {
            return true;
        };
        let overridden = self
            .host
            .has_permission(identity, &format!("{COOLDOWN_OVERRIDE}{command}"));

        let handle = self.store.get_or_create(identity);
        let elapsed = {
            let mut state = handle.lock();
            let elapsed = *state.cooldowns.entry(command.clone()).or_insert(0);
            if elapsed >= required || overridden {
                state.cooldowns.remove(&command);
                debug!(%identity, command, overridden, "cooldown passed");
                return true;
            }
            elapsed
        };

        debug!(%identity, command, elapsed, required, "cooldown refused");
        self.host.send_message(
            identity,
            &format!(
                "The command '{command}' has a remaining cooldown of {} seconds.",
                format_remaining(required - elapsed)
            ),
        );
        false
    }

    /// Returns `true` if `raw`'s command has no warmup to wait for.
    ///
    /// The first use records the line and is refused; the sweep replays
    /// it later. Repeating the same line while it is pending is refused
    /// silently. A different line for the same command is refused with a
    /// hint to cancel the pending one.
    pub fn check_warmup(&self, identity: &Identity, raw: &str) -> bool {
        let line = command_line(raw);
        let command = command_name(line);
        let Some(required) = self.config().warmup_for(&command) else {
            return true;
        };
        if self
            .host
            .has_permission(identity, &format!("{WARMUP_OVERRIDE}{command}"))
        {
            return true;
        }

        let handle = self.store.get_or_create(identity);
        let reply = {
            let mut state = handle.lock();
            match state.warmups.entry(command.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(PendingWarmup {
                        elapsed: 0,
                        command_line: line.to_owned(),
                    });
                    debug!(%identity, command, required, "warmup started");
                    Some(format!(
                        "Warmup started for command '{command}', time remaining: {} seconds",
                        format_remaining(required)
                    ))
                }
                Entry::Occupied(pending) if pending.get().command_line == line => None,
                Entry::Occupied(_) => Some(format!(
                    "You are trying to use the command '{line}', which already has a warmup \
                     in progress. Type /warmup cancel {command} to cancel the existing warmup"
                )),
            }
        };

        if let Some(reply) = reply {
            self.host.send_message(identity, &reply);
        }
        false
    }

    // -----------------------------------------------------------------------
    // Management
    // -----------------------------------------------------------------------

    /// `/cooldown list`: `(command, remaining seconds)`, sorted by command.
    pub fn active_cooldowns(&self, identity: &Identity) -> Vec<(String, u32)> {
        let config = self.config();
        let Some(handle) = self.store.get(identity) else {
            return Vec::new();
        };
        let mut active: Vec<_> = handle
            .lock()
            .cooldowns
            .iter()
            .filter_map(|(command, &elapsed)| {
                let required = config.cooldown_for(command)?;
                Some((command.clone(), required.saturating_sub(elapsed)))
            })
            .collect();
        active.sort();
        active
    }

    /// `/warmup list`: `(command, remaining seconds)`, sorted by command.
    pub fn active_warmups(&self, identity: &Identity) -> Vec<(String, u32)> {
        let config = self.config();
        let Some(handle) = self.store.get(identity) else {
            return Vec::new();
        };
        let mut active: Vec<_> = handle
            .lock()
            .warmups
            .iter()
            .filter_map(|(command, pending)| {
                let required = config.warmup_for(command)?;
                Some((command.clone(), required.saturating_sub(pending.elapsed)))
            })
            .collect();
        active.sort();
        active
    }

    /// `/cooldown cancel <cmd>`.
    ///
    /// # Errors
    /// [`CooldownError::NoneActive`] if no cooldown was tracked.
    pub fn cancel_cooldown(&self, identity: &Identity, command: &str) -> Result<(), CooldownError> {
        self.cancel(identity, command, LimitKind::Cooldown)
    }

    /// `/warmup cancel <cmd>`. The held command is never replayed.
    ///
    /// # Errors
    /// [`CooldownError::NoneActive`] if no warmup was pending.
    pub fn cancel_warmup(&self, identity: &Identity, command: &str) -> Result<(), CooldownError> {
        self.cancel(identity, command, LimitKind::Warmup)
    }

    fn cancel(&self, identity: &Identity, input: &str, kind: LimitKind) -> Result<(), CooldownError> {
        let command = command_name(input);
        let removed = self.store.get(identity).is_some_and(|handle| {
            let mut state = handle.lock();
            match kind {
                LimitKind::Cooldown => state.cooldowns.remove(&command).is_some(),
                LimitKind::Warmup => state.warmups.remove(&command).is_some(),
            }
        });

        if !removed {
            return Err(CooldownError::NoneActive {
                kind,
                command: input.trim().to_owned(),
            });
        }
        debug!(%identity, command, %kind, "limit cancelled");
        self.host.send_message(
            identity,
            &format!("{} for command '{command}' removed.", kind.title()),
        );
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Sweep
    // -----------------------------------------------------------------------

    /// Advances every counter by one tick and replays completed warmups.
    ///
    /// Counters for commands that no longer have a limit are dropped.
    /// A completed warmup whose owner is offline is dropped without
    /// replay. Returns the number of commands replayed.
    pub fn sweep_now(&self) -> usize {
        let config = self.config();
        let mut firings = Vec::new();

        for (identity, handle) in self.store.all() {
            let mut state = handle.lock();
            let connected = state.lifecycle().is_connected();

            state.cooldowns.retain(|command, elapsed| {
                let Some(required) = config.cooldown_for(command) else {
                    return false;
                };
                if *elapsed < required {
                    *elapsed += 1;
                }
                true
            });

            state.warmups.retain(|command, pending| {
                let Some(required) = config.warmup_for(command) else {
                    return false;
                };
                if pending.elapsed < required {
                    pending.elapsed += 1;
                }
                if pending.elapsed < required {
                    return true;
                }
                if connected {
                    firings.push(Firing {
                        identity: identity.clone(),
                        command_line: std::mem::take(&mut pending.command_line),
                    });
                } else {
                    debug!(%identity, command, "owner offline — warmup discarded");
                }
                false
            });
        }

        let fired = firings.len();
        for Firing { identity, command_line } in firings {
            info!(%identity, command_line, "warmup complete — replaying");
            if !self.host.dispatch(&identity, &command_line) {
                warn!(%identity, command_line, "host did not run replayed command");
            }
        }
        fired
    }
}

impl<H: Host> Sweep for CooldownEngine<H> {
    fn name(&self) -> &'static str {
        "cooldown"
    }

    fn sweep(&self, _tick: &TickInfo) {
        self.sweep_now();
    }
}
