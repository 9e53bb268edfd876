//! The `Warden` runtime: wires the layers together and runs the drivers.
//!
//! ```text
//! Warden::builder().config(..).host(..).start()
//!     ├─ SessionRegistry (shared)
//!     ├─ AfkMachine ─────┐
//!     ├─ CooldownEngine ─┴─→ TickDriver "sweeps" (1 s: afk, then cooldowns)
//!     └─ Reaper ────────────→ TickDriver "reaper"  (60 s)
//! ```
//!
//! The game server forwards its events through the adapter methods
//! ([`Warden::player_joined`], [`Warden::player_quit`],
//! [`Warden::activity`], [`Warden::command_preprocess`]) and calls the
//! engines directly for everything else.

use std::sync::Arc;

use tracing::info;
use warden_afk::{ActivityEvent, AfkMachine};
use warden_cooldown::CooldownEngine;
use warden_host::{Host, Identity};
use warden_session::{Reaper, SessionHandle, SessionRegistry, UserSession};
use warden_tick::TickDriver;

use crate::{ConfigError, WardenConfig, WardenError};

/// Builder for [`Warden`].
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use warden::prelude::*;
///
/// # async fn run() -> Result<(), WardenError> {
/// let host = Arc::new(InMemoryHost::new(20));
/// let mut warden = Warden::builder()
///     .config(WardenConfig::load("warden.json")?)
///     .host(host)
///     .start()?;
/// // ... forward server events ...
/// warden.shutdown().await?;
/// # Ok(())
/// # }
/// ```
pub struct WardenBuilder<H: Host> {
    config: WardenConfig,
    host: Option<Arc<H>>,
}

impl<H: Host> WardenBuilder<H> {
    pub fn config(mut self, config: WardenConfig) -> Self {
        self.config = config;
        self
    }

    /// The game server's collaborators. Required.
    pub fn host(mut self, host: Arc<H>) -> Self {
        self.host = Some(host);
        self
    }

    /// Validates the config, builds the engines and starts both drivers.
    /// Must be called inside a Tokio runtime.
    ///
    /// # Errors
    /// - [`ConfigError::Invalid`] if no host was set or the config is
    ///   unusable.
    /// - [`TickError::NoRuntime`](warden_tick::TickError::NoRuntime)
    ///   outside a runtime.
    pub fn start(self) -> Result<Warden<H>, WardenError> {
        let host = self
            .host
            .ok_or_else(|| ConfigError::Invalid("a host is required".into()))?;
        let config = self.config.validated()?;

        let registry = Arc::new(SessionRegistry::new());
        let afk = Arc::new(AfkMachine::new(&registry, Arc::clone(&host), config.afk.clone()));
        let cooldowns = Arc::new(CooldownEngine::new(
            &registry,
            Arc::clone(&host),
            config.cooldowns.clone(),
        ));
        let reaper = Arc::new(Reaper::new(Arc::clone(&registry), Arc::clone(&host)));

        let mut sweeps = TickDriver::new("sweeps", config.tick.clone())
            .with_sweep(afk.clone())
            .with_sweep(cooldowns.clone());
        let mut reaping = TickDriver::new("reaper", config.reaper_tick()).with_sweep(reaper);

        sweeps.start()?;
        reaping.start()?;

        info!(
            tick_ms = config.tick.interval_ms,
            reap_secs = config.sessions.reap_interval_secs,
            "warden started"
        );
        Ok(Warden {
            host,
            registry,
            afk,
            cooldowns,
            sweeps,
            reaping,
        })
    }
}

/// A running Warden instance.
///
/// Dropping it aborts the drivers; prefer [`shutdown`](Self::shutdown),
/// which lets an in-flight sweep finish.
pub struct Warden<H: Host> {
    host: Arc<H>,
    registry: Arc<SessionRegistry>,
    afk: Arc<AfkMachine<H>>,
    cooldowns: Arc<CooldownEngine<H>>,
    sweeps: TickDriver,
    reaping: TickDriver,
}

impl<H: Host> Warden<H> {
    pub fn builder() -> WardenBuilder<H> {
        WardenBuilder {
            config: WardenConfig::default(),
            host: None,
        }
    }

    /// Stops both drivers. Sessions stay queryable; timed transitions
    /// simply stop happening.
    pub async fn shutdown(&mut self) -> Result<(), WardenError> {
        let sweeps = self.sweeps.shutdown().await;
        let reaping = self.reaping.shutdown().await;
        sweeps?;
        reaping?;
        info!("warden stopped");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.sweeps.is_running() && self.reaping.is_running()
    }

    /// Freezes timed transitions (AFK marking, kicks, cooldown counters,
    /// warmups, reaping) without losing state. Admission checks keep
    /// working; held commands simply wait longer.
    pub fn pause(&self) -> Result<(), WardenError> {
        self.sweeps.pause()?;
        self.reaping.pause()?;
        info!("warden paused");
        Ok(())
    }

    pub fn resume(&self) -> Result<(), WardenError> {
        self.sweeps.resume()?;
        self.reaping.resume()?;
        info!("warden resumed");
        Ok(())
    }

    pub fn is_paused(&self) -> bool {
        self.sweeps.is_paused()
    }

    /// Hot-swaps the AFK and cooldown settings.
    ///
    /// Tick and session settings only apply to a fresh [`start`](WardenBuilder::start).
    pub fn reload(&self, config: WardenConfig) -> Result<(), WardenError> {
        let config = config.validated()?;
        self.afk.reload(config.afk);
        self.cooldowns.reload(config.cooldowns);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Server events
    // -----------------------------------------------------------------------

    /// A player connected (first time or again).
    pub fn player_joined(&self, identity: &Identity) {
        self.registry.handle_reconnect(identity);
        self.registry.get_or_create::<UserSession>(identity);
        self.afk.record(identity, &ActivityEvent::Join);
        info!(%identity, "player joined");
    }

    /// A player disconnected. Their sessions linger until reaped.
    pub fn player_quit(&self, identity: &Identity) {
        self.registry.handle_disconnect(identity);
        info!(%identity, "player quit");
    }

    /// Any other activity. Returns `true` if it reset the idle clock.
    pub fn activity(&self, identity: &Identity, event: ActivityEvent) -> bool {
        self.afk.record(identity, &event)
    }

    /// A command is about to run. Counts as activity, then goes through
    /// the cooldown and warmup gates. The host must cancel the command
    /// when this returns `false`.
    pub fn command_preprocess(&self, identity: &Identity, command_line: &str) -> bool {
        self.afk.record(identity, &ActivityEvent::Command);
        self.cooldowns.admit(identity, command_line)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn afk(&self) -> &AfkMachine<H> {
        &self.afk
    }

    pub fn cooldowns(&self) -> &CooldownEngine<H> {
        &self.cooldowns
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    pub fn host(&self) -> &Arc<H> {
        &self.host
    }

    /// The player's messaging session (reply target).
    pub fn user_session(&self, identity: &Identity) -> SessionHandle<UserSession> {
        self.registry.get_or_create::<UserSession>(identity)
    }
}
